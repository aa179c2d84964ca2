use std::future::Future;

use serde_json::Value;
use time::PrimitiveDateTime;

use crate::{Result, db, db::Db, models::MapRecord};

/// Columns a map listing can be ordered by. The discriminants follow the row tuple layout
/// `(id, owner, document, created_at, modified_at, name)`; the document is not sortable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
	Id,
	Owner,
	CreatedAt,
	ModifiedAt,
	Name,
}
impl SortColumn {
	pub fn from_index(index: usize) -> Option<Self> {
		match index {
			0 => Some(Self::Id),
			1 => Some(Self::Owner),
			3 => Some(Self::CreatedAt),
			4 => Some(Self::ModifiedAt),
			5 => Some(Self::Name),
			_ => None,
		}
	}

	pub fn column(self) -> &'static str {
		match self {
			Self::Id => "id",
			Self::Owner => "owner",
			Self::CreatedAt => "created_at",
			Self::ModifiedAt => "modified_at",
			Self::Name => "name",
		}
	}
}

/// Anything that can list every stored map in ascending `order_by` order.
pub trait MapSource {
	fn fetch_maps(
		&self,
		order_by: SortColumn,
	) -> impl Future<Output = Result<Vec<MapRecord>>> + Send;
}

/// A maps table in Postgres.
pub struct MapTable<'a> {
	db: &'a Db,
	table: String,
}
impl<'a> MapTable<'a> {
	pub fn new(db: &'a Db, table: &str) -> Result<Self> {
		db::ensure_identifier(table)?;

		Ok(Self { db, table: table.to_string() })
	}

	pub async fn insert_map(
		&self,
		owner: i64,
		document: &Value,
		created_at: PrimitiveDateTime,
		modified_at: PrimitiveDateTime,
		name: Option<&str>,
	) -> Result<i64> {
		let sql = format!(
			"\
INSERT INTO {} (owner, document, created_at, modified_at, name)
VALUES ($1, $2, $3, $4, $5)
RETURNING id::int8",
			self.table
		);
		let id: i64 = sqlx::query_scalar(&sql)
			.bind(owner)
			.bind(document)
			.bind(created_at)
			.bind(modified_at)
			.bind(name)
			.fetch_one(&self.db.pool)
			.await?;

		Ok(id)
	}
}
impl MapSource for MapTable<'_> {
	async fn fetch_maps(&self, order_by: SortColumn) -> Result<Vec<MapRecord>> {
		let sql = list_sql(&self.table, order_by);
		let rows = sqlx::query_as::<_, MapRecord>(&sql).fetch_all(&self.db.pool).await?;

		tracing::debug!(
			table = %self.table,
			order_by = order_by.column(),
			rows = rows.len(),
			"Fetched maps."
		);

		Ok(rows)
	}
}

/// Maps held in memory, served in the same order a [`MapTable`] would return them.
#[derive(Clone, Debug, Default)]
pub struct MemoryMaps {
	records: Vec<MapRecord>,
}
impl MemoryMaps {
	pub fn new(records: Vec<MapRecord>) -> Self {
		Self { records }
	}
}
impl MapSource for MemoryMaps {
	async fn fetch_maps(&self, order_by: SortColumn) -> Result<Vec<MapRecord>> {
		let mut records = self.records.clone();

		sort_records(&mut records, order_by);

		Ok(records)
	}
}

/// Ascending by `order_by`, `id` breaking ties, NULL names last.
pub fn sort_records(records: &mut [MapRecord], order_by: SortColumn) {
	match order_by {
		SortColumn::Id => records.sort_by_key(|record| record.id),
		SortColumn::Owner => records.sort_by_key(|record| (record.owner, record.id)),
		SortColumn::CreatedAt => records.sort_by_key(|record| (record.created_at, record.id)),
		SortColumn::ModifiedAt => records.sort_by_key(|record| (record.modified_at, record.id)),
		SortColumn::Name => records.sort_by(|a, b| {
			(a.name.is_none(), &a.name, a.id).cmp(&(b.name.is_none(), &b.name, b.id))
		}),
	}
}

fn list_sql(table: &str, order_by: SortColumn) -> String {
	format!(
		"\
SELECT
	id::int8 AS id,
	owner::int8 AS owner,
	document::jsonb AS document,
	created_at::timestamp AS created_at,
	modified_at::timestamp AS modified_at,
	name::text AS name
FROM {table}
ORDER BY {} ASC, id ASC",
		order_by.column()
	)
}
