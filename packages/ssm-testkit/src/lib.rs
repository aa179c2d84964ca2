//! Scratch Postgres databases holding one maps table, for tests that need a real store.
//!
//! Each [`MapsDatabase`] lives next to the database `SSM_PG_DSN` points at and is dropped when
//! the test calls [`MapsDatabase::cleanup`] or, failing that, when the value goes out of scope.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use serde_json::Value;
use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use time::{PrimitiveDateTime, macros::datetime};
use tokio::runtime::Builder;
use uuid::Uuid;

use ssm_config::Postgres;
use ssm_storage::{db::Db, maps::MapTable, models::MapRecord};

/// Table created in every scratch database.
pub const MAPS_TABLE: &str = "maps";

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];
const SEED_CREATED_AT: PrimitiveDateTime = datetime!(2015-01-01 00:00);

/// The base DSN, when the environment provides one.
pub fn env_dsn() -> Option<String> {
	env::var(ssm_config::PG_DSN_VAR).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// A map row ready for [`MapsDatabase::seed`]. The id is assigned on insert.
pub fn map_record(
	owner: i64,
	document: Value,
	modified_at: PrimitiveDateTime,
	name: Option<&str>,
) -> MapRecord {
	MapRecord {
		id: 0,
		owner,
		document,
		created_at: SEED_CREATED_AT,
		modified_at,
		name: name.map(str::to_string),
	}
}

/// A connected [`Db`] over a freshly created database with an empty [`MAPS_TABLE`].
pub struct MapsDatabase {
	db: Db,
	name: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl MapsDatabase {
	pub async fn create(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::InvalidDsn(base_dsn.to_string(), err))?;
		let (admin, mut admin_conn) = connect_admin(&base).await?;
		let name = format!("ssm_test_{}", Uuid::new_v4().simple());

		admin_conn
			.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|source| Error::Scratch { name: name.clone(), source })?;

		let cfg = Postgres {
			dsn: base.database(&name).to_url_lossy().to_string(),
			pool_max_conns: 1,
		};

		match open_maps(&cfg).await {
			Ok(db) => Ok(Self { db, name, admin, dropped: false }),
			Err(err) => {
				let _ = drop_database(&name, &admin).await;

				Err(err)
			},
		}
	}

	pub fn db(&self) -> &Db {
		&self.db
	}

	pub fn maps(&self) -> Result<MapTable<'_>> {
		Ok(MapTable::new(&self.db, MAPS_TABLE)?)
	}

	/// Inserts `records` in order and returns the ids the database assigned to them.
	pub async fn seed(&self, records: &[MapRecord]) -> Result<Vec<i64>> {
		let maps = self.maps()?;
		let mut ids = Vec::with_capacity(records.len());

		for record in records {
			let id = maps
				.insert_map(
					record.owner,
					&record.document,
					record.created_at,
					record.modified_at,
					record.name.as_deref(),
				)
				.await?;

			ids.push(id);
		}

		Ok(ids)
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.db.pool.close().await;

		drop_database(&self.name, &self.admin).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for MapsDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		// Drop may run outside any runtime.
		let worker = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime.block_on(drop_database(&name, &admin)).map_err(|err| err.to_string())
				});

			if let Err(err) = result {
				eprintln!("Scratch database {name} was left behind: {err}");
			}
		});
		let _ = worker.join();
	}
}

async fn open_maps(cfg: &Postgres) -> Result<Db> {
	let db = Db::connect(cfg).await?;

	db.ensure_schema(MAPS_TABLE).await?;

	Ok(db)
}

async fn connect_admin(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => last_err = Some(err),
		}
	}

	let err = last_err.unwrap_or(sqlx::Error::PoolClosed);

	Err(Error::NoAdminDatabase(base.to_url_lossy().to_string(), err))
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	let scratch = |source| Error::Scratch { name: name.to_string(), source };
	let mut conn = PgConnection::connect_with(admin).await.map_err(scratch)?;

	// Open sessions block DROP DATABASE.
	let _ = sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.execute(&mut conn)
	.await;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await.map_err(scratch)?;

	Ok(())
}
