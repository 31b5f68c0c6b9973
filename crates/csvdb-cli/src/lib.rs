//! Batch CSV-to-SQLite importer.
//!
//! The [`pipeline::Importer`] turns every `name.csv` + `name.json` pair in an
//! import directory into rows of a SQLite table and archives the inputs.

pub mod archive;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::Settings;
pub use error::{ImportError, ImportStage, PipelineError, SettingsError};
pub use pipeline::{ImportReport, ImportSettings, Importer, PairOutcome};
