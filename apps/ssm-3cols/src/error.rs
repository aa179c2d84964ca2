use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to list code matrices in {path:?}.")]
	ReadDir { path: PathBuf, source: std::io::Error },
	#[error("Failed to create output directory {path:?}.")]
	CreateDir { path: PathBuf, source: std::io::Error },
	#[error("Failed to read code matrix {path:?}.")]
	ReadMatrix { path: PathBuf, source: csv::Error },
	#[error("Code matrix {path:?} has no header row.")]
	MissingHeader { path: PathBuf },
	#[error("Code matrix {path:?}, row {row:?}, column {column:?}: {value:?} is not an integer.")]
	InvalidCell { path: PathBuf, row: String, column: String, value: String },
	#[error("Failed to write 3cols file {path:?}.")]
	WriteOutput { path: PathBuf, source: csv::Error },
	#[error("Failed to write progress to the console.")]
	Console(#[source] std::io::Error),
}
