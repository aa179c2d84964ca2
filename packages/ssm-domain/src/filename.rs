use std::path::{Path, PathBuf};

const FILL: char = '_';

/// Reduces a role to `[A-Za-z0-9]` words joined by single underscores.
///
/// Every character outside ASCII alphanumerics (punctuation, whitespace, non-ASCII) becomes a
/// separator. Separators never lead, trail, or repeat.
pub fn sanitize_role(role: &str) -> String {
	let mut out = String::with_capacity(role.len());

	for ch in role.chars() {
		if ch.is_ascii_alphanumeric() {
			out.push(ch);
		} else if !out.is_empty() && !out.ends_with(FILL) {
			out.push(FILL);
		}
	}

	if out.ends_with(FILL) {
		out.pop();
	}

	out
}

pub fn artifact_file_name(role: &str, record_id: i64) -> String {
	format!("{}-{record_id}.json", sanitize_role(role))
}

/// `{output_dir}/{sanitized_role}-{record_id}.json`.
///
/// Trailing separators on `output_dir` are dropped; the directory is otherwise kept as given so
/// the path always lands in the directory the exporter created.
pub fn build_path(output_dir: &Path, role: &str, record_id: i64) -> PathBuf {
	let dir: PathBuf = output_dir.components().collect();

	dir.join(artifact_file_name(role, record_id))
}
