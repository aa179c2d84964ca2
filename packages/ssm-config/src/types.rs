use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub export: Export,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	/// `EnvFilter` directive for diagnostics written to stderr.
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}
impl Default for Postgres {
	fn default() -> Self {
		Self { dsn: String::new(), pool_max_conns: 1 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Export {
	/// Table holding the maps. Interpolated into SQL, so it must be a plain identifier.
	pub table: String,
	/// Value the document's `state` key must hold for the map to be exported.
	pub state: String,
	/// Owners whose maps are never exported.
	pub excluded_owners: Vec<i64>,
}
impl Default for Export {
	fn default() -> Self {
		Self { table: "maps".to_string(), state: "NY".to_string(), excluded_owners: vec![2] }
	}
}
