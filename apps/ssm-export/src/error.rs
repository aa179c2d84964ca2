use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Storage(#[from] ssm_storage::Error),
	#[error("Failed to create output directory {path:?}.")]
	CreateDir { path: PathBuf, source: std::io::Error },
	#[error("Failed to write artifact {path:?}.")]
	WriteArtifact { path: PathBuf, source: std::io::Error },
	#[error("Failed to render map {map_id} as JSON.")]
	Render { map_id: i64, source: serde_json::Error },
	#[error("Failed to format modified_at of map {map_id}.")]
	Timestamp { map_id: i64, source: time::error::Format },
	#[error("Failed to write progress to the console.")]
	Console(#[source] std::io::Error),
}
