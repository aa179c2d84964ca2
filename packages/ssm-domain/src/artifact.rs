use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

const INDENT: &[u8] = b"    ";

/// Rebuilds `value` with every object's keys in lexicographic order.
///
/// `serde_json` already keeps keys sorted unless `preserve_order` is enabled somewhere in the
/// build; rebuilding keeps the output stable either way.
pub fn canonicalize(value: &Value) -> Value {
	match value {
		Value::Object(map) => {
			let mut entries = map.iter().collect::<Vec<_>>();

			entries.sort_by(|(a, _), (b, _)| a.cmp(b));

			let mut sorted = Map::new();

			for (key, child) in entries {
				sorted.insert(key.clone(), canonicalize(child));
			}

			Value::Object(sorted)
		},
		Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
		other => other.clone(),
	}
}

/// Renders a document as sorted-key JSON indented by four spaces, without a trailing newline.
pub fn render(document: &Value) -> serde_json::Result<Vec<u8>> {
	let mut out = Vec::new();
	let mut serializer =
		serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));

	canonicalize(document).serialize(&mut serializer)?;

	Ok(out)
}

/// Byte length of the compact JSON text, used for progress reporting.
pub fn compact_len(document: &Value) -> serde_json::Result<usize> {
	Ok(serde_json::to_vec(document)?.len())
}
