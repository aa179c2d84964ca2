mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Export, Postgres, Service, Storage};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

/// Optional path of a TOML config file.
pub const CONFIG_PATH_VAR: &str = "SSM_EXPORT_CONFIG";
/// Overrides `storage.postgres.dsn`.
pub const PG_DSN_VAR: &str = "SSM_PG_DSN";

pub fn load(path: &Path) -> Result<Config> {
	let mut cfg = read(path)?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn from_env() -> Result<Config> {
	from_vars(|key| env::var(key).ok())
}

/// Resolves the config the same way as [`from_env`], reading variables through `var`.
pub fn from_vars<F>(var: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let mut cfg = match var(CONFIG_PATH_VAR).filter(|path| !path.trim().is_empty()) {
		Some(path) => read(&PathBuf::from(path))?,
		None => Config::default(),
	};

	if let Some(dsn) = var(PG_DSN_VAR) {
		cfg.storage.postgres.dsn = dsn;
	}

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.is_empty() {
		return Err(invalid(
			"storage.postgres.dsn",
			format!("must be non-empty; set it or {PG_DSN_VAR}."),
		));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(invalid("storage.postgres.pool_max_conns", "must be greater than zero."));
	}
	if !is_sql_identifier(&cfg.export.table) {
		return Err(invalid(
			"export.table",
			format!("{:?} is not a plain SQL identifier.", cfg.export.table),
		));
	}
	if cfg.export.state.is_empty() {
		return Err(invalid("export.state", "must be non-empty."));
	}

	Ok(())
}

fn invalid(field: &'static str, message: impl Into<String>) -> Error {
	Error::Validation { field, message: message.into() }
}

fn read(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	toml::from_str(&raw).map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })
}

fn normalize(cfg: &mut Config) {
	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();
	cfg.export.table = cfg.export.table.trim().to_string();
	cfg.export.state = cfg.export.state.trim().to_string();

	cfg.export.excluded_owners.sort_unstable();
	cfg.export.excluded_owners.dedup();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}

pub fn is_sql_identifier(name: &str) -> bool {
	let mut chars = name.chars();

	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {},
		_ => return false,
	}

	chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
