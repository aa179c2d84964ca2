/// DDL for a maps table named `table`. Callers validate `table` as an identifier first.
pub fn render_schema(table: &str) -> String {
	include_str!("../../../sql/maps.sql").replace("<TABLE>", table)
}
