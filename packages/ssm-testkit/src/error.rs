pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} is not a usable Postgres DSN.")]
	InvalidDsn(String, #[source] sqlx::Error),
	#[error("No admin database is reachable through {0:?}.")]
	NoAdminDatabase(String, #[source] sqlx::Error),
	#[error("Failed to create or drop scratch database {name}.")]
	Scratch { name: String, source: sqlx::Error },
	#[error(transparent)]
	Storage(#[from] ssm_storage::Error),
}
