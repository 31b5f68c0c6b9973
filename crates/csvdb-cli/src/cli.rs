//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "csvdb",
    version,
    about = "Import CSV files into SQLite tables and browse them",
    long_about = "Import CSV files into SQLite tables and browse them.\n\n\
                  Each data file in the import directory needs a JSON descriptor with the\n\
                  same base name naming the target table, the CSV encoding and delimiter,\n\
                  and the column mappings. Imported files are moved to the archive directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: ./csvdb.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import every CSV/descriptor pair from the import directory.
    Import(ImportArgs),

    /// List imported tables.
    Tables(DatabaseArgs),

    /// Show one page of a table.
    View(ViewArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Directory containing data files and descriptors.
    #[arg(long = "import-dir", value_name = "DIR")]
    pub import_dir: Option<PathBuf>,

    /// Directory imported files are moved to.
    #[arg(long = "archive-dir", value_name = "DIR")]
    pub archive_dir: Option<PathBuf>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Check descriptors and data files without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct DatabaseArgs {
    /// SQLite database file.
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ViewArgs {
    /// Table to display.
    #[arg(value_name = "TABLE")]
    pub table: String,

    /// Page number, starting at 1.
    #[arg(long = "page", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub page: u64,

    /// Rows per page (default from settings).
    #[arg(long = "page-size", value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from([
            "csvdb",
            "import",
            "--import-dir",
            "in",
            "--database",
            "x.db",
            "--dry-run",
        ])
        .unwrap();
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.import_dir, Some(PathBuf::from("in")));
        assert_eq!(args.database.database, Some(PathBuf::from("x.db")));
        assert!(args.dry_run);
        assert!(args.archive_dir.is_none());
    }

    #[test]
    fn test_parse_view_defaults() {
        let cli = Cli::try_parse_from(["csvdb", "view", "people"]).unwrap();
        let Command::View(args) = cli.command else {
            panic!("expected view");
        };
        assert_eq!(args.table, "people");
        assert_eq!(args.page, 1);
        assert_eq!(args.page_size, None);
    }

    #[test]
    fn test_view_rejects_page_zero() {
        assert!(Cli::try_parse_from(["csvdb", "view", "t", "--page", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "csvdb",
            "tables",
            "--log-format",
            "json",
            "--config",
            "alt.toml",
        ])
        .unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }
}
