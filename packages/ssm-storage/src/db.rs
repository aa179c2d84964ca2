use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Error, Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &ssm_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Creates the maps table when missing. Exports never call this; it exists for fixtures and
	/// fresh databases.
	pub async fn ensure_schema(&self, table: &str) -> Result<()> {
		ensure_identifier(table)?;

		let sql = schema::render_schema(table);
		let mut tx = self.pool.begin().await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

pub(crate) fn ensure_identifier(name: &str) -> Result<()> {
	if !ssm_config::is_sql_identifier(name) {
		return Err(Error::InvalidArgument(format!("{name:?} is not a plain SQL identifier.")));
	}

	Ok(())
}
