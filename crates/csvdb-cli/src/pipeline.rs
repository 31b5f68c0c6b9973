//! Import orchestration.
//!
//! A run discovers every data/descriptor pair in the import directory and
//! processes them one at a time:
//!
//! 1. Load and validate the descriptor
//! 2. Read and decode the data file
//! 3. Provision the destination table
//! 4. Map rows and insert them in one transaction
//! 5. Move both files to the archive directory
//!
//! A failing pair stops at its failing stage, keeps its files in place and
//! is reported; the run moves on to the next pair.

use std::fs;
use std::path::{Path, PathBuf};

use csvdb_ingest::{
    DATA_EXTENSION, DESCRIPTOR_EXTENSION, ImportPair, discover_pairs, map_rows, read_csv_file,
};
use csvdb_model::load_descriptor;
use csvdb_store::{Store, build_table_schema, provision_table, validate_schema};
use tracing::{error, info, info_span, warn};

use crate::archive::{archive_pair, archive_timestamp};
use crate::error::{ImportError, ImportStage, PipelineError, Result};

/// Working paths and switches for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub import_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub database: PathBuf,
    pub data_extension: String,
    pub descriptor_extension: String,
    /// Load, read and map only. Nothing is written or moved.
    pub dry_run: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            import_dir: PathBuf::from("import"),
            archive_dir: PathBuf::from("log"),
            database: PathBuf::from("csvdb.db"),
            data_extension: DATA_EXTENSION.to_string(),
            descriptor_extension: DESCRIPTOR_EXTENSION.to_string(),
            dry_run: false,
        }
    }
}

impl ImportSettings {
    pub fn new(
        import_dir: impl Into<PathBuf>,
        archive_dir: impl Into<PathBuf>,
        database: impl Into<PathBuf>,
    ) -> Self {
        Self {
            import_dir: import_dir.into(),
            archive_dir: archive_dir.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of processing one pair.
#[derive(Debug)]
pub struct PairOutcome {
    pub pair: ImportPair,
    /// Destination table, once the descriptor has been loaded.
    pub table_name: Option<String>,
    /// Rows inserted (or mapped, on a dry run).
    pub rows: usize,
    /// Archive locations of the data and descriptor files.
    pub archived: Vec<PathBuf>,
    pub error: Option<ImportError>,
}

impl PairOutcome {
    fn new(pair: ImportPair) -> Self {
        Self {
            pair,
            table_name: None,
            rows: 0,
            archived: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn stage(&self) -> Option<ImportStage> {
        self.error.as_ref().map(ImportError::stage)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub pairs: Vec<PairOutcome>,
    /// Data files without a descriptor. Not counted as pairs.
    pub skipped: Vec<PathBuf>,
    pub dry_run: bool,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    pub fn succeeded(&self) -> usize {
        self.pairs.iter().filter(|p| p.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// True when no pair failed, including when there were none.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Runs imports with a fixed set of [`ImportSettings`].
#[derive(Debug, Clone)]
pub struct Importer {
    settings: ImportSettings,
}

impl Importer {
    pub fn new(settings: ImportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Processes every pair found in the import directory.
    ///
    /// Only setup failures (directories, database, directory listing) are
    /// returned as errors; pair failures are recorded in the report.
    pub fn run(&self) -> Result<ImportReport> {
        let settings = &self.settings;
        let span = info_span!(
            "import",
            dir = %settings.import_dir.display(),
            dry_run = settings.dry_run
        );
        let _guard = span.enter();

        let mut report = ImportReport {
            dry_run: settings.dry_run,
            ..ImportReport::default()
        };

        let mut store = if settings.dry_run {
            if !settings.import_dir.is_dir() {
                warn!("import directory does not exist, nothing to check");
                return Ok(report);
            }
            None
        } else {
            ensure_dir(&settings.import_dir)?;
            ensure_dir(&settings.archive_dir)?;
            Some(Store::open(&settings.database)?)
        };

        let discovery = discover_pairs(
            &settings.import_dir,
            &settings.data_extension,
            &settings.descriptor_extension,
        )?;
        info!(
            pairs = discovery.pairs.len(),
            skipped = discovery.skipped.len(),
            "discovered import files"
        );
        report.skipped = discovery.skipped;

        for pair in discovery.pairs {
            report.pairs.push(self.import_pair(store.as_mut(), pair));
        }

        info!(
            succeeded = report.succeeded(),
            total = report.total(),
            "import finished"
        );
        Ok(report)
    }

    fn import_pair(&self, store: Option<&mut Store>, pair: ImportPair) -> PairOutcome {
        let span = info_span!("pair", base = %pair.base_name);
        let _guard = span.enter();

        let mut outcome = PairOutcome::new(pair);
        match self.process(store, &mut outcome) {
            Ok(()) => info!(
                table = outcome.table_name.as_deref().unwrap_or_default(),
                rows = outcome.rows,
                "pair imported"
            ),
            Err(err) => {
                error!(stage = %err.stage(), error = %err, "pair failed");
                outcome.error = Some(err);
            }
        }
        outcome
    }

    fn process(
        &self,
        store: Option<&mut Store>,
        outcome: &mut PairOutcome,
    ) -> std::result::Result<(), ImportError> {
        let descriptor = load_descriptor(&outcome.pair.descriptor_path)?;
        outcome.table_name = Some(descriptor.table_name.clone());

        let data = read_csv_file(&outcome.pair.data_path, &descriptor.csv_settings)?;

        let Some(store) = store else {
            validate_schema(&build_table_schema(&descriptor)).map_err(ImportError::Schema)?;
            outcome.rows = map_rows(&data, &descriptor.column_mappings).len();
            return Ok(());
        };

        provision_table(store, &descriptor).map_err(ImportError::Schema)?;
        let rows = map_rows(&data, &descriptor.column_mappings);
        outcome.rows = store
            .insert_rows(&descriptor.table_name, &rows)
            .map_err(ImportError::Insert)?;

        outcome.archived = archive_pair(
            &outcome.pair,
            &self.settings.archive_dir,
            &archive_timestamp(),
        )?;
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| PipelineError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
