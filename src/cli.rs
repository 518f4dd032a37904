//! Command-line interface argument parsing for places-tui.
//!
//! - `places-tui browse --endpoint "https://example.com/places.json"`
//! - `places-tui list --sort name --refresh`

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::data::SortMode;

/// A terminal browser for places, sorted by name or rating.
#[derive(Parser, Debug)]
#[command(name = "places-tui")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// URL returning the place list as JSON.
    /// Defaults to $PLACES_ENDPOINT
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Path to the local places database.
    /// Defaults to $PLACES_DIR/places.db, then the user data directory
    #[arg(long)]
    pub db_path: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "10")]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive place browser
    Browse {
        #[command(flatten)]
        source: SourceArgs,

        /// UI tick interval in milliseconds
        #[arg(long, default_value = "100")]
        tick_ms: u64,

        /// Where to write logs while the TUI owns the terminal
        #[arg(long)]
        log_file: Option<String>,
    },

    /// Print places to stdout and exit
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Change (and remember) the sort mode
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,

        /// Fetch from the remote endpoint before printing
        #[arg(short, long)]
        refresh: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Name,
    Rating,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortMode::ByName,
            SortArg::Rating => SortMode::ByRating,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments and the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub timeout: Duration,
    pub tick_rate: Duration,
}

/// Directory holding the database and log file
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PLACES_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("places-tui")
}

impl AppConfig {
    /// Resolve configuration: explicit flags, then environment, then defaults
    pub fn resolve(source: SourceArgs, tick_ms: u64, log_file: Option<String>) -> Self {
        let endpoint = source
            .endpoint
            .or_else(|| std::env::var("PLACES_ENDPOINT").ok())
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let dir = data_dir();
        let db_path = source
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| dir.join("places.db"));
        let log_path = log_file
            .map(PathBuf::from)
            .unwrap_or_else(|| dir.join("places-tui.log"));

        AppConfig {
            endpoint,
            db_path,
            log_path,
            timeout: Duration::from_secs(source.timeout.max(1)),
            tick_rate: Duration::from_millis(tick_ms.max(10)),
        }
    }
}
