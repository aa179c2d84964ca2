use serde_json::Value;
use time::PrimitiveDateTime;

/// One row of the maps table. Timestamps are wall-clock values in the session time zone.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MapRecord {
	pub id: i64,
	pub owner: i64,
	pub document: Value,
	pub created_at: PrimitiveDateTime,
	pub modified_at: PrimitiveDateTime,
	pub name: Option<String>,
}
