use std::{
	fs,
	io::Write,
	path::{Path, PathBuf},
};

use csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};

use crate::{Error, Result};

pub const CM_SUFFIX: &str = "-CM.csv";

const DELIMITER: u8 = b'\t';
const HEADER: [&str; 3] = ["From:", "To:", "Value:"];

/// A square-ish table of edge counts: `rows[i].1[j]` edges go from `columns[j]` to `rows[i].0`.
/// Empty cells are `None`.
#[derive(Debug, PartialEq, Eq)]
pub struct CodeMatrix {
	pub columns: Vec<String>,
	pub rows: Vec<(String, Vec<Option<i64>>)>,
}
impl CodeMatrix {
	/// `(from, to, value)` for every cell holding at least `min_val`, row by row.
	pub fn edges(&self, min_val: i64) -> impl Iterator<Item = (&str, &str, i64)> + '_ {
		self.rows.iter().flat_map(move |(row, values)| {
			self.columns.iter().zip(values).filter_map(move |(column, value)| match value {
				Some(value) if *value >= min_val => Some((column.as_str(), row.as_str(), *value)),
				_ => None,
			})
		})
	}
}

#[derive(Debug, PartialEq, Eq)]
pub struct Conversion {
	pub source: PathBuf,
	pub output: PathBuf,
	pub edges: usize,
}

/// File names in `dir` ending in [`CM_SUFFIX`], sorted.
pub fn list_code_matrices(dir: &Path) -> Result<Vec<String>> {
	let read_err = |source| Error::ReadDir { path: dir.to_path_buf(), source };
	let mut names = Vec::new();

	for entry in fs::read_dir(dir).map_err(read_err)? {
		let entry = entry.map_err(read_err)?;
		let Ok(name) = entry.file_name().into_string() else {
			tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name.");

			continue;
		};

		if name.ends_with(CM_SUFFIX) {
			names.push(name);
		}
	}

	names.sort();

	Ok(names)
}

/// `<name>-CM.csv` becomes `<output_dir>/<name>-3cols_get<min_val>.csv`.
pub fn three_cols_path(output_dir: &Path, cm_file_name: &str, min_val: i64) -> Option<PathBuf> {
	let stem = cm_file_name.strip_suffix(CM_SUFFIX)?;

	Some(output_dir.join(format!("{stem}-3cols_get{min_val}.csv")))
}

pub fn read_code_matrix(path: &Path) -> Result<CodeMatrix> {
	let read_err = |source| Error::ReadMatrix { path: path.to_path_buf(), source };
	let mut reader = ReaderBuilder::new()
		.delimiter(DELIMITER)
		.has_headers(false)
		.trim(Trim::All)
		.from_path(path)
		.map_err(read_err)?;
	let mut records = reader.records();
	let header = records
		.next()
		.transpose()
		.map_err(read_err)?
		.ok_or_else(|| Error::MissingHeader { path: path.to_path_buf() })?;
	let columns = header.iter().skip(1).map(str::to_string).collect::<Vec<_>>();
	let mut rows = Vec::new();

	for record in records {
		let record = record.map_err(read_err)?;
		let mut cells = record.iter();
		let row = cells.next().unwrap_or_default().to_string();
		let mut values = Vec::with_capacity(columns.len());

		for (column, cell) in columns.iter().zip(cells) {
			values.push(parse_cell(path, &row, column, cell)?);
		}

		rows.push((row, values));
	}

	Ok(CodeMatrix { columns, rows })
}

/// Writes the 3cols file and returns the number of edge lines.
pub fn write_three_cols(matrix: &CodeMatrix, path: &Path, min_val: i64) -> Result<usize> {
	let write_err = |source| Error::WriteOutput { path: path.to_path_buf(), source };
	let mut writer = WriterBuilder::new()
		.delimiter(DELIMITER)
		.quote_style(QuoteStyle::Never)
		.terminator(Terminator::Any(b'\n'))
		.from_path(path)
		.map_err(write_err)?;
	let mut edges = 0;

	writer.write_record(HEADER).map_err(write_err)?;

	for (from, to, value) in matrix.edges(min_val) {
		writer.write_record([from, to, value.to_string().as_str()]).map_err(write_err)?;

		edges += 1;
	}

	writer.flush().map_err(|err| write_err(err.into()))?;

	Ok(edges)
}

/// Converts every code matrix in `cm_dir`, listing each conversion on `console`.
pub fn convert_all<W>(
	cm_dir: &Path,
	output_dir: &Path,
	min_val: i64,
	console: &mut W,
) -> Result<Vec<Conversion>>
where
	W: Write,
{
	if !output_dir.is_dir() {
		fs::create_dir_all(output_dir)
			.map_err(|source| Error::CreateDir { path: output_dir.to_path_buf(), source })?;

		writeln!(console, "Created {}", output_dir.display()).map_err(Error::Console)?;
	}

	let mut conversions = Vec::new();

	for (idx, name) in list_code_matrices(cm_dir)?.into_iter().enumerate() {
		let Some(output) = three_cols_path(output_dir, &name, min_val) else {
			continue;
		};
		let source = cm_dir.join(&name);

		writeln!(console, "{idx:>3}: {}\t->\t{}", source.display(), output.display())
			.map_err(Error::Console)?;

		let matrix = read_code_matrix(&source)?;
		let edges = write_three_cols(&matrix, &output, min_val)?;

		tracing::debug!(source = %source.display(), edges, "Wrote 3cols file.");

		conversions.push(Conversion { source, output, edges });
	}

	Ok(conversions)
}

fn parse_cell(path: &Path, row: &str, column: &str, cell: &str) -> Result<Option<i64>> {
	if cell.is_empty() {
		return Ok(None);
	}

	cell.parse().map(Some).map_err(|_| Error::InvalidCell {
		path: path.to_path_buf(),
		row: row.to_string(),
		column: column.to_string(),
		value: cell.to_string(),
	})
}
