//! Integration tests for the import pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use csvdb_cli::archive::ARCHIVE_TIMESTAMP_FORMAT;
use csvdb_cli::{ImportReport, ImportSettings, ImportStage, Importer, PipelineError};
use csvdb_model::CellValue;
use csvdb_store::Store;
use tempfile::TempDir;

const PEOPLE_DESCRIPTOR: &str = r#"{
    "table_name": "people",
    "csv_settings": {"encoding": "utf-8", "delimiter": ",", "has_header": true},
    "column_mappings": [
        {"csv_column": "name", "db_column": "name", "data_type": "TEXT"},
        {"csv_column": "age", "db_column": "age", "data_type": "INTEGER"}
    ]
}"#;

struct Workspace {
    _root: TempDir,
    import_dir: PathBuf,
    archive_dir: PathBuf,
    database: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let import_dir = root.path().join("import");
        let archive_dir = root.path().join("log");
        let database = root.path().join("db/csvdb.db");
        fs::create_dir_all(&import_dir).unwrap();
        Self {
            _root: root,
            import_dir,
            archive_dir,
            database,
        }
    }

    fn write(&self, name: &str, content: &str) {
        fs::write(self.import_dir.join(name), content).unwrap();
    }

    fn settings(&self) -> ImportSettings {
        ImportSettings::new(&self.import_dir, &self.archive_dir, &self.database)
    }

    fn run(&self) -> ImportReport {
        Importer::new(self.settings()).run().unwrap()
    }

    fn store(&self) -> Store {
        Store::open(&self.database).unwrap()
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn imports_and_archives_a_pair() {
    let ws = Workspace::new();
    ws.write("people.csv", "name,age\nAlice,30\nBob,\n");
    ws.write("people.json", PEOPLE_DESCRIPTOR);

    let report = ws.run();
    assert_eq!(report.total(), 1);
    assert_eq!(report.succeeded(), 1);
    assert!(report.is_success());
    assert_eq!(report.pairs[0].rows, 2);
    assert_eq!(report.pairs[0].table_name.as_deref(), Some("people"));

    let page = ws.store().read_page("people", 100, 0).unwrap();
    assert_eq!(page.columns, vec!["name", "age"]);
    assert_eq!(
        page.rows,
        vec![
            vec![CellValue::from("Alice"), CellValue::Integer(30)],
            vec![CellValue::from("Bob"), CellValue::Integer(0)],
        ]
    );

    assert!(file_names(&ws.import_dir).is_empty());
    let archived = file_names(&ws.archive_dir);
    assert_eq!(archived.len(), 2);
    let csv_name = &archived[0];
    assert!(csv_name.starts_with("people_") && csv_name.ends_with(".csv"));
    // people_YYYYMMDD_HHMMSS.csv
    assert_eq!(csv_name.len(), "people_".len() + 15 + ".csv".len());
    assert_eq!(
        archived[1],
        csv_name.replace(".csv", ".json"),
        "both files share one timestamp"
    );
    assert_eq!(report.pairs[0].archived.len(), 2);
}

#[test]
fn data_file_without_descriptor_is_skipped() {
    let ws = Workspace::new();
    ws.write("people.csv", "name,age\nAlice,30\n");
    ws.write("people.json", PEOPLE_DESCRIPTOR);
    ws.write("orphan.csv", "a\n1\n");

    let report = ws.run();
    assert_eq!(report.total(), 1);
    assert_eq!(report.skipped, vec![ws.import_dir.join("orphan.csv")]);
    assert!(report.is_success());
    assert_eq!(file_names(&ws.import_dir), vec!["orphan.csv"]);
}

#[test]
fn empty_import_dir_succeeds() {
    let ws = Workspace::new();
    let report = ws.run();
    assert_eq!(report.total(), 0);
    assert!(report.is_success());
    assert!(ws.archive_dir.is_dir());
    assert!(ws.database.is_file());
}

#[test]
fn missing_directories_are_created() {
    let root = TempDir::new().unwrap();
    let settings = ImportSettings::new(
        root.path().join("in"),
        root.path().join("out"),
        root.path().join("csvdb.db"),
    );
    let report = Importer::new(settings).run().unwrap();
    assert_eq!(report.total(), 0);
    assert!(root.path().join("in").is_dir());
    assert!(root.path().join("out").is_dir());
}

#[test]
fn insert_failure_keeps_table_and_files() {
    let ws = Workspace::new();
    // Header only: nothing to insert.
    ws.write("people.csv", "name,age\n");
    ws.write("people.json", PEOPLE_DESCRIPTOR);

    let report = ws.run();
    assert_eq!(report.failed(), 1);
    assert_eq!(report.pairs[0].stage(), Some(ImportStage::Insert));

    let store = ws.store();
    assert!(store.table_exists("people").unwrap());
    assert_eq!(store.read_page("people", 10, 0).unwrap().total, 0);
    assert_eq!(file_names(&ws.import_dir), vec!["people.csv", "people.json"]);
    assert!(file_names(&ws.archive_dir).is_empty());
}

#[test]
fn archive_failure_keeps_committed_rows_and_inputs() {
    let ws = Workspace::new();
    ws.write("people.csv", "name,age\nAlice,30\n");
    ws.write("people.json", PEOPLE_DESCRIPTOR);

    // Occupy every archive name the run can pick with a directory so the
    // move fails after the insert has committed.
    fs::create_dir_all(&ws.archive_dir).unwrap();
    let now = chrono::Local::now();
    for offset in -1..=60 {
        let stamp = (now + chrono::Duration::seconds(offset)).format(ARCHIVE_TIMESTAMP_FORMAT);
        fs::create_dir_all(ws.archive_dir.join(format!("people_{stamp}.csv"))).unwrap();
    }

    let report = ws.run();
    assert_eq!(report.failed(), 1);
    assert!(!report.is_success());
    let outcome = &report.pairs[0];
    assert_eq!(outcome.stage(), Some(ImportStage::Archive));
    assert_eq!(outcome.rows, 1);
    assert!(outcome.archived.is_empty());

    let page = ws.store().read_page("people", 10, 0).unwrap();
    assert_eq!(page.rows, vec![vec![CellValue::from("Alice"), CellValue::Integer(30)]]);
    assert_eq!(file_names(&ws.import_dir), vec!["people.csv", "people.json"]);
}

#[test]
fn one_bad_pair_does_not_stop_the_run() {
    let ws = Workspace::new();
    ws.write("a_broken.csv", "x\n1\n");
    ws.write("a_broken.json", r#"{"table_name": "broken"}"#);
    ws.write("b_people.csv", "name,age\nAlice,30\n");
    ws.write("b_people.json", PEOPLE_DESCRIPTOR);

    let report = ws.run();
    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 1);
    assert!(!report.is_success());

    let broken = &report.pairs[0];
    assert_eq!(broken.pair.base_name, "a_broken");
    assert_eq!(broken.stage(), Some(ImportStage::Config));
    assert!(report.pairs[1].is_success());
    assert_eq!(file_names(&ws.import_dir), vec!["a_broken.csv", "a_broken.json"]);
}

#[test]
fn read_and_schema_failures_are_tagged() {
    let ws = Workspace::new();
    ws.write("bad_encoding.csv", "a\n1\n");
    ws.write(
        "bad_encoding.json",
        r#"{"table_name": "t1",
            "csv_settings": {"encoding": "no-such-encoding", "delimiter": ",", "has_header": true},
            "column_mappings": [{"csv_column": "a", "db_column": "a", "data_type": "TEXT"}]}"#,
    );
    ws.write("bad_type.csv", "a\n1\n");
    ws.write(
        "bad_type.json",
        r#"{"table_name": "t2",
            "csv_settings": {"encoding": "utf-8", "delimiter": ",", "has_header": true},
            "column_mappings": [{"csv_column": "a", "db_column": "a", "data_type": "TEXT); DROP TABLE import_tables; --"}]}"#,
    );

    let report = ws.run();
    let stages: Vec<_> = report.pairs.iter().map(|p| p.stage()).collect();
    assert_eq!(stages, vec![Some(ImportStage::Read), Some(ImportStage::Schema)]);
    assert!(ws.store().table_exists("import_tables").unwrap());
}

#[test]
fn headerless_file_maps_by_position() {
    let ws = Workspace::new();
    ws.write("pos.csv", "x;1.5\ny;2\n");
    ws.write(
        "pos.json",
        r#"{"table_name": "pos",
            "csv_settings": {"encoding": "utf-8", "delimiter": ";", "has_header": false},
            "column_mappings": [
                {"csv_column": "ignored", "db_column": "colA", "data_type": "TEXT"},
                {"csv_column": "ignored", "db_column": "colB", "data_type": "real"}
            ]}"#,
    );

    let report = ws.run();
    assert!(report.is_success());
    let page = ws.store().read_page("pos", 10, 0).unwrap();
    assert_eq!(
        page.rows,
        vec![
            vec![CellValue::from("x"), CellValue::Real(1.5)],
            vec![CellValue::from("y"), CellValue::Real(2.0)],
        ]
    );
}

#[test]
fn reimport_appends_rows() {
    let ws = Workspace::new();
    for _ in 0..2 {
        ws.write("people.csv", "name,age\nAlice,30\n");
        ws.write("people.json", PEOPLE_DESCRIPTOR);
        assert!(ws.run().is_success());
        // Keep archive names unique across runs within the same second.
        for name in file_names(&ws.archive_dir) {
            if name.starts_with("people_") {
                let from = ws.archive_dir.join(&name);
                fs::rename(&from, ws.archive_dir.join(format!("done_{name}"))).unwrap();
            }
        }
    }

    let store = ws.store();
    assert_eq!(store.read_page("people", 10, 0).unwrap().total, 2);
    assert_eq!(store.list_tables().unwrap().len(), 1);
}

#[test]
fn dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.write("people.csv", "name,age\nAlice,30\nBob,1\n");
    ws.write("people.json", PEOPLE_DESCRIPTOR);

    let settings = ws.settings().with_dry_run(true);
    let report = Importer::new(settings).run().unwrap();
    assert!(report.dry_run);
    assert!(report.is_success());
    assert_eq!(report.pairs[0].rows, 2);

    assert!(!ws.database.exists());
    assert!(!ws.archive_dir.exists());
    assert_eq!(file_names(&ws.import_dir), vec!["people.csv", "people.json"]);
}

#[test]
fn unopenable_database_is_a_setup_error() {
    let ws = Workspace::new();
    // A directory where the database file should be.
    fs::create_dir_all(&ws.database).unwrap();
    let result = Importer::new(ws.settings()).run();
    assert!(matches!(result, Err(PipelineError::Store(_))));
}
