//! Command-line interface definitions for backdupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! subcommands for each step of the workflow.
//!
//! # Example
//!
//! ```bash
//! # Build a manifest for each tree
//! backdupe scan ~/Pictures --output laptop.json
//! backdupe scan /mnt/nas/Pictures --output nas.json
//!
//! # Review what would be deleted from the laptop
//! backdupe review --main laptop.json --backup nas.json --ignore .tmp
//!
//! # Delete after typing "yes"
//! backdupe delete --main laptop.json --backup nas.json
//!
//! # Menu-driven session
//! backdupe interactive
//! ```

use bytesize::ByteSize;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Prune files from a main tree that already exist in its backup.
///
/// backdupe records each tree in a manifest of content digests, matches the
/// main manifests against the backup manifests, and deletes the main-side
/// copies of identical files after an explicit confirmation.
#[derive(Debug, Parser)]
#[command(name = "backdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from this TOML file on top of the user config
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for backdupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory tree into a manifest file
    Scan(ScanArgs),
    /// Print a manifest's summary
    Show(ShowArgs),
    /// List duplicates between main and backup manifests
    Review(ReviewArgs),
    /// Delete main-side duplicates after confirmation
    Delete(DeleteArgs),
    /// Run the menu-driven session on the terminal
    Interactive(InteractiveArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory tree to scan (`~` is expanded)
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Manifest file to write
    #[arg(short, long, value_name = "MANIFEST")]
    pub output: PathBuf,

    /// Follow symbolic links during scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Skip files larger than this (e.g., 500MB, 4GiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_file_size: Option<u64>,

    /// Bytes read per hashing step
    #[arg(long, value_name = "N", value_parser = parse_chunk_size)]
    pub chunk_size: Option<usize>,
}

/// Arguments for the show subcommand.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Manifest file to read
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Also list every record
    #[arg(long)]
    pub records: bool,
}

/// Manifest selection and filters shared by review and delete.
#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Manifest of the tree to prune (repeatable, later wins on collisions)
    #[arg(long = "main", value_name = "MANIFEST", required = true)]
    pub main: Vec<PathBuf>,

    /// Manifest of the tree to keep (repeatable)
    #[arg(long = "backup", value_name = "MANIFEST", required = true)]
    pub backup: Vec<PathBuf>,

    /// Never delete files with this extension (repeatable)
    #[arg(long = "ignore", value_name = "EXT")]
    pub ignore: Vec<String>,

    /// Only delete files with this extension (repeatable)
    #[arg(long = "seek", value_name = "EXT")]
    pub seek: Vec<String>,
}

/// Arguments for the review subcommand.
#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Manifests and filters
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Manifests and filters
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Treat as if "yes" had been typed at the prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Move files to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,
}

/// Arguments for the interactive subcommand.
#[derive(Debug, Args)]
pub struct InteractiveArgs {
    /// Move files to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,
}

/// Output format for review results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use backdupe::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    s.parse::<ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|e| format!("Invalid size '{s}': {e}"))
}

/// Parse a hashing chunk size; accepts size suffixes and rejects zero.
///
/// # Errors
///
/// Returns an error for anything [`parse_size`] rejects, for zero, and for
/// values that do not fit in memory addressing.
pub fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let bytes = parse_size(s)?;
    if bytes == 0 {
        return Err("Chunk size must be at least 1 byte".to_string());
    }
    usize::try_from(bytes).map_err(|_| format!("Chunk size too large: '{s}'"))
}
