use std::{fs, io::Write, path::PathBuf};

use ssm_domain::{
	artifact, filename,
	filter::{FilterDecision, StateFilter},
	role,
};
use ssm_storage::{
	maps::{MapSource, SortColumn},
	models::MapRecord,
};

use crate::{
	Error, Result,
	console::{self, ProgressTable},
};

/// What happened to a single map during a run.
#[derive(Debug, PartialEq, Eq)]
pub enum RecordOutcome {
	Skipped(FilterDecision),
	Emitted(PathBuf),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
	pub scanned: usize,
	pub exported: usize,
	/// Written paths, in the order the maps were listed.
	pub artifacts: Vec<PathBuf>,
}

/// Lists every map, keeps those the filter accepts, and writes each one to its own JSON file.
///
/// A run is a full rescan with no state carried between runs. Paths are deterministic, so a
/// rerun overwrites the same files with the same bytes.
pub struct Exporter<'a, S> {
	source: &'a S,
	filter: StateFilter,
	output_dir: PathBuf,
	order_by: SortColumn,
}
impl<'a, S> Exporter<'a, S>
where
	S: MapSource,
{
	pub fn new(source: &'a S, filter: StateFilter, output_dir: impl Into<PathBuf>) -> Self {
		Self { source, filter, output_dir: output_dir.into(), order_by: SortColumn::ModifiedAt }
	}

	pub fn order_by(mut self, order_by: SortColumn) -> Self {
		self.order_by = order_by;

		self
	}

	pub async fn run<W>(&self, progress: &mut ProgressTable<W>) -> Result<ExportSummary>
	where
		W: Write,
	{
		tracing::info!(
			output_dir = %self.output_dir.display(),
			order_by = self.order_by.column(),
			state = self.filter.state(),
			"Export started."
		);

		let records = self.source.fetch_maps(self.order_by).await?;

		tracing::info!(rows = records.len(), "Fetched maps.");

		progress.header().map_err(Error::Console)?;

		let mut summary = ExportSummary::default();

		for record in &records {
			summary.scanned += 1;

			match self.process(record, summary.exported + 1, progress)? {
				RecordOutcome::Skipped(decision) => {
					tracing::debug!(map_id = record.id, reason = decision.as_str(), "Skipped map.");
				},
				RecordOutcome::Emitted(path) => {
					summary.exported += 1;
					summary.artifacts.push(path);
				},
			}
		}

		tracing::info!(scanned = summary.scanned, exported = summary.exported, "Export finished.");

		Ok(summary)
	}

	fn process<W>(
		&self,
		record: &MapRecord,
		count: usize,
		progress: &mut ProgressTable<W>,
	) -> Result<RecordOutcome>
	where
		W: Write,
	{
		let decision = self.filter.evaluate(&record.document, record.owner);

		if !decision.is_export() {
			return Ok(RecordOutcome::Skipped(decision));
		}

		let size = artifact::compact_len(&record.document)
			.map_err(|source| Error::Render { map_id: record.id, source })?;
		let last_modified = console::format_last_modified(record.modified_at)
			.map_err(|source| Error::Timestamp { map_id: record.id, source })?;

		progress.row(count, size, &last_modified).map_err(Error::Console)?;

		let path = self.write_artifact(record)?;

		tracing::debug!(
			map_id = record.id,
			name = record.name.as_deref().unwrap_or_default(),
			path = %path.display(),
			"Wrote artifact."
		);

		Ok(RecordOutcome::Emitted(path))
	}

	fn write_artifact(&self, record: &MapRecord) -> Result<PathBuf> {
		fs::create_dir_all(&self.output_dir)
			.map_err(|source| Error::CreateDir { path: self.output_dir.clone(), source })?;

		let path =
			filename::build_path(&self.output_dir, role::role_of(&record.document), record.id);
		let bytes = artifact::render(&record.document)
			.map_err(|source| Error::Render { map_id: record.id, source })?;

		fs::write(&path, bytes)
			.map_err(|source| Error::WriteArtifact { path: path.clone(), source })?;

		Ok(path)
	}
}
