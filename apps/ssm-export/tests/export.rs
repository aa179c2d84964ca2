use std::{fs, path::PathBuf};

use serde_json::{Value, json};
use time::{PrimitiveDateTime, macros::datetime};

use ssm_config::Export;
use ssm_domain::{artifact, filter::StateFilter};
use ssm_export::{
	Error,
	console::{HEADER, ProgressTable, RULE_WIDTH},
	export::{ExportSummary, Exporter},
};
use ssm_storage::{
	maps::{MapSource, MemoryMaps, SortColumn},
	models::MapRecord,
};

struct UnreachableStore;
impl MapSource for UnreachableStore {
	async fn fetch_maps(&self, _order_by: SortColumn) -> ssm_storage::Result<Vec<MapRecord>> {
		Err(ssm_storage::Error::InvalidArgument("connection refused".to_string()))
	}
}

fn map(id: i64, owner: i64, document: Value, modified_at: PrimitiveDateTime) -> MapRecord {
	MapRecord {
		id,
		owner,
		document,
		created_at: datetime!(2015-01-01 00:00),
		modified_at,
		name: Some(format!("map {id}")),
	}
}

fn sample_maps() -> MemoryMaps {
	MemoryMaps::new(vec![
		map(
			1,
			5,
			json!({ "state": "NY", "nodes": [{ "type": "role", "name": "Lead Planner" }] }),
			datetime!(2016-01-02 10:00),
		),
		map(2, 5, json!({ "state": "CA" }), datetime!(2016-01-01 08:15)),
		map(3, 2, json!({ "state": "NY" }), datetime!(2016-01-03 12:00)),
		map(4, 7, json!({ "state": "NY" }), datetime!(2015-12-31 23:59:30)),
		map(
			5,
			7,
			json!({ "nodes": [{ "type": "role", "name": "Ghost" }] }),
			datetime!(2016-02-01 00:00),
		),
	])
}

fn default_filter() -> StateFilter {
	StateFilter::from_config(&Export::default())
}

fn progress_lines(progress: ProgressTable<Vec<u8>>) -> Vec<String> {
	String::from_utf8(progress.into_inner())
		.expect("Progress output must be UTF-8.")
		.lines()
		.map(str::to_string)
		.collect()
}

async fn export_into(source: &MemoryMaps, output_dir: PathBuf) -> (ExportSummary, Vec<String>) {
	let exporter = Exporter::new(source, default_filter(), output_dir);
	let mut progress = ProgressTable::new(Vec::new());
	let summary = exporter.run(&mut progress).await.expect("Export must succeed.");

	(summary, progress_lines(progress))
}

#[tokio::test]
async fn exports_qualifying_maps_in_modified_order() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let out = dir.path().join("ny");
	let maps = sample_maps();
	let (summary, lines) = export_into(&maps, out.clone()).await;

	assert_eq!(summary.scanned, 5);
	assert_eq!(summary.exported, 2);
	assert_eq!(
		summary.artifacts,
		vec![out.join("no_role-4.json"), out.join("Lead_Planner-1.json")]
	);

	let no_role_size = artifact::compact_len(&json!({ "state": "NY" })).expect("len");
	let lead_size = artifact::compact_len(
		&json!({ "state": "NY", "nodes": [{ "type": "role", "name": "Lead Planner" }] }),
	)
	.expect("len");

	assert_eq!(lines.len(), 4);
	assert_eq!(lines[0], HEADER);
	assert_eq!(lines[1], "_".repeat(RULE_WIDTH));
	assert_eq!(lines[2], format!("   1. {no_role_size:>12}  2015-12-31 23:59"));
	assert_eq!(lines[3], format!("   2. {lead_size:>12}  2016-01-02 10:00"));

	let mut written = fs::read_dir(&out)
		.expect("Output directory must exist.")
		.map(|entry| entry.expect("entry").file_name().into_string().expect("utf8"))
		.collect::<Vec<_>>();

	written.sort();

	assert_eq!(written, vec!["Lead_Planner-1.json".to_string(), "no_role-4.json".to_string()]);
}

#[tokio::test]
async fn artifacts_hold_sorted_indented_documents() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let maps = sample_maps();
	let (summary, _) = export_into(&maps, dir.path().to_path_buf()).await;
	let lead = fs::read_to_string(&summary.artifacts[1]).expect("Failed to read artifact.");
	let expected = r#"{
    "nodes": [
        {
            "name": "Lead Planner",
            "type": "role"
        }
    ],
    "state": "NY"
}"#;

	assert_eq!(lead, expected);

	let reparsed: Value = serde_json::from_str(&lead).expect("Artifact must be JSON.");

	assert_eq!(artifact::render(&reparsed).expect("Failed to render."), lead.as_bytes());
}

#[tokio::test]
async fn rerun_overwrites_with_identical_bytes() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let maps = sample_maps();
	let stale = dir.path().join("Lead_Planner-1.json");

	fs::write(&stale, "stale content that is longer than the real artifact".repeat(20))
		.expect("Failed to seed stale artifact.");

	let (first, _) = export_into(&maps, dir.path().to_path_buf()).await;
	let first_bytes = first
		.artifacts
		.iter()
		.map(|path| fs::read(path).expect("Failed to read artifact."))
		.collect::<Vec<_>>();
	let (second, _) = export_into(&maps, dir.path().to_path_buf()).await;
	let second_bytes = second
		.artifacts
		.iter()
		.map(|path| fs::read(path).expect("Failed to read artifact."))
		.collect::<Vec<_>>();

	assert_eq!(first, second);
	assert_eq!(first_bytes, second_bytes);
	assert!(!String::from_utf8_lossy(&first_bytes[1]).contains("stale"));
}

#[tokio::test]
async fn nested_output_directory_is_created() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let out = dir.path().join("a").join("b").join("c");
	let maps = sample_maps();
	let (summary, _) = export_into(&maps, out.clone()).await;

	assert!(out.is_dir());
	assert!(summary.artifacts.iter().all(|path| path.starts_with(&out) && path.is_file()));
}

#[tokio::test]
async fn nothing_qualifying_writes_nothing() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let out = dir.path().join("empty");
	let maps = MemoryMaps::new(vec![
		map(1, 5, json!({ "state": "CA" }), datetime!(2016-01-01 00:00)),
		map(2, 2, json!({ "state": "NY" }), datetime!(2016-01-02 00:00)),
		map(3, 5, json!([1, 2, 3]), datetime!(2016-01-03 00:00)),
	]);
	let (summary, lines) = export_into(&maps, out.clone()).await;

	assert_eq!(summary, ExportSummary { scanned: 3, exported: 0, artifacts: Vec::new() });
	assert_eq!(lines.len(), 2);
	assert!(!out.exists());
}

#[tokio::test]
async fn malformed_role_nodes_do_not_abort() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let maps = MemoryMaps::new(vec![
		map(10, 1, json!({ "state": "NY", "nodes": "not a list" }), datetime!(2016-01-01 00:00)),
		map(
			11,
			1,
			json!({ "state": "NY", "nodes": [{ "name": "untyped" }] }),
			datetime!(2016-01-02 00:00),
		),
		map(
			12,
			1,
			json!({ "state": "NY", "nodes": [{ "type": "role", "name": "R&D / Ops!!" }] }),
			datetime!(2016-01-03 00:00),
		),
	]);
	let (summary, _) = export_into(&maps, dir.path().to_path_buf()).await;
	let names = summary
		.artifacts
		.iter()
		.map(|path| path.file_name().and_then(|name| name.to_str()).expect("name").to_string())
		.collect::<Vec<_>>();

	assert_eq!(names, vec!["no_role-10.json", "no_role-11.json", "R_D_Ops-12.json"]);
}

#[tokio::test]
async fn order_can_follow_another_column() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let maps = sample_maps();
	let exporter = Exporter::new(&maps, default_filter(), dir.path()).order_by(SortColumn::Id);
	let mut progress = ProgressTable::new(Vec::new());
	let summary = exporter.run(&mut progress).await.expect("Export must succeed.");

	assert_eq!(
		summary.artifacts,
		vec![dir.path().join("Lead_Planner-1.json"), dir.path().join("no_role-4.json")]
	);
}

#[tokio::test]
async fn unwritable_output_directory_is_fatal() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let blocker = dir.path().join("not-a-dir");

	fs::write(&blocker, "").expect("Failed to create blocking file.");

	let maps = sample_maps();
	let exporter = Exporter::new(&maps, default_filter(), blocker.join("out"));
	let mut progress = ProgressTable::new(Vec::new());
	let err = exporter.run(&mut progress).await.expect_err("Expected a directory error.");

	match err {
		Error::CreateDir { path, .. } => assert_eq!(path, blocker.join("out")),
		other => panic!("Unexpected error: {other:?}"),
	}

	// The first qualifying map was reported before the write failed; nothing after it was.
	assert_eq!(progress_lines(progress).len(), 3);
}

#[tokio::test]
async fn artifact_write_failure_is_fatal() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let out = dir.path().join("out");
	let occupied = out.join("no_role-1.json");

	fs::create_dir_all(&occupied).expect("Failed to create blocking directory.");

	let maps = MemoryMaps::new(vec![
		map(1, 5, json!({ "state": "NY" }), datetime!(2016-01-01 00:00)),
		map(2, 5, json!({ "state": "NY" }), datetime!(2016-01-02 00:00)),
	]);
	let exporter = Exporter::new(&maps, default_filter(), out.clone());
	let mut progress = ProgressTable::new(Vec::new());
	let err = exporter.run(&mut progress).await.expect_err("Expected a write error.");

	match err {
		Error::WriteArtifact { path, .. } => assert_eq!(path, occupied),
		other => panic!("Unexpected error: {other:?}"),
	}

	assert_eq!(progress_lines(progress).len(), 3);
	assert!(occupied.is_dir());
	assert!(!out.join("no_role-2.json").exists());
}

#[tokio::test]
async fn source_failure_stops_before_any_output() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let exporter = Exporter::new(&UnreachableStore, default_filter(), dir.path().join("out"));
	let mut progress = ProgressTable::new(Vec::new());
	let err = exporter.run(&mut progress).await.expect_err("Expected a storage error.");

	assert!(matches!(err, Error::Storage(_)), "Unexpected error: {err:?}");
	assert!(progress.into_inner().is_empty());
	assert!(!dir.path().join("out").exists());
}
