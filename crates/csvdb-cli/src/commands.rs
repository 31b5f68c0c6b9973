use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use csvdb_cli::config::{HOME_ENV, Settings};
use csvdb_cli::pipeline::{ImportReport, Importer};
use csvdb_store::{RegistryEntry, Store, StoreError, TablePage};

use crate::cli::{DatabaseArgs, ImportArgs, ViewArgs};

/// Loads settings from `--config`, `./csvdb.toml` or defaults.
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let home = std::env::var_os(HOME_ENV);
    Settings::load(config, home.as_deref().map(Path::new)).context("load settings")
}

pub fn run_import(settings: &Settings, args: &ImportArgs) -> Result<ImportReport> {
    let mut import = settings.import_settings(args.dry_run);
    if let Some(dir) = &args.import_dir {
        import.import_dir = dir.clone();
    }
    if let Some(dir) = &args.archive_dir {
        import.archive_dir = dir.clone();
    }
    if let Some(path) = &args.database.database {
        import.database = path.clone();
    }

    info!(
        import_dir = %import.import_dir.display(),
        archive_dir = %import.archive_dir.display(),
        database = %import.database.display(),
        "starting import"
    );
    let importer = Importer::new(import);
    importer.run().context("import run")
}

pub fn run_tables(settings: &Settings, args: &DatabaseArgs) -> Result<Vec<RegistryEntry>> {
    let store = open_store(settings, args)?;
    store.list_tables().context("list tables")
}

pub fn run_view(settings: &Settings, args: &ViewArgs) -> Result<TablePage> {
    let store = open_store(settings, &args.database)?;
    let page_size = args
        .page_size
        .map_or(settings.page_size, |size| usize::try_from(size).unwrap_or(usize::MAX));
    let page = usize::try_from(args.page).unwrap_or(usize::MAX);
    let offset = page.saturating_sub(1).saturating_mul(page_size);

    match store.read_page(&args.table, page_size, offset) {
        Ok(page) => Ok(page),
        Err(StoreError::TableNotFound { table }) => {
            anyhow::bail!("table '{table}' does not exist")
        }
        Err(error) => Err(error).with_context(|| format!("read table {}", args.table)),
    }
}

fn open_store(settings: &Settings, args: &DatabaseArgs) -> Result<Store> {
    let path = args.database.as_ref().unwrap_or(&settings.database);
    Store::open_existing(path).with_context(|| format!("open database {}", path.display()))
}
