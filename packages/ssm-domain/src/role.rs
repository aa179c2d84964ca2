use serde_json::Value;

/// Role reported for maps without a usable role node.
pub const NO_ROLE: &str = "no role";

/// Returns the `name` of the first node whose `type` is `"role"`.
///
/// Missing or oddly shaped `nodes` are treated as "no role node" rather than errors, so one
/// malformed map cannot abort an export.
pub fn role_of(document: &Value) -> &str {
	let Some(nodes) = document.get("nodes").and_then(Value::as_array) else {
		return NO_ROLE;
	};
	let Some(role_node) =
		nodes.iter().find(|node| node.get("type").and_then(Value::as_str) == Some("role"))
	else {
		return NO_ROLE;
	};

	role_node.get("name").and_then(Value::as_str).unwrap_or(NO_ROLE)
}
