//! backdupe - manifest-based duplicate pruning
//!
//! Records directory trees as manifests of BLAKE3 content digests, matches a
//! main tree's manifests against its backup's, and deletes the main-side copies
//! of files the backup already holds, after the user types `yes`.
//!
//! # Workflow
//!
//! 1. [`manifest::ManifestBuilder`] scans a tree into a [`manifest::Manifest`]
//! 2. [`manifest::store`] saves, loads and merges manifests
//! 3. [`duplicates::find_duplicates`] joins main and backup on digest
//! 4. [`actions::delete`] removes main-side copies from a reviewed kill list
//!
//! [`session::DedupeSession`] ties the steps together for the menu shell in
//! [`menu`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod menu;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod session;

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::delete::{Confirmation, DeletionOutcome};
use crate::cli::{Cli, Commands, DeleteArgs, InteractiveArgs, OutputFormat, ReviewArgs, ScanArgs, SelectionArgs, ShowArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::manifest::{store, ManifestBuilder};
use crate::menu::Menu;
use crate::output::table::{self, ReviewTable};
use crate::output::{CsvOutput, JsonOutput};
use crate::progress::Progress;
use crate::session::{DedupeSession, Side};

/// Run the application with parsed arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, unreadable or unwritable
/// manifests, bad scan roots, invalid filters, and failed terminal I/O.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }
    let ui = Ui {
        quiet: cli.quiet,
        color: !cli.no_color && io::stdout().is_terminal(),
    };

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    log::debug!("Effective configuration: {config:?}");

    match cli.command {
        Commands::Scan(args) => run_scan(args, config, ui),
        Commands::Show(args) => run_show(&args),
        Commands::Review(args) => run_review(&args, &config, ui),
        Commands::Delete(args) => run_delete(&args, &config, ui),
        Commands::Interactive(args) => run_interactive(&args, &config, ui),
    }
}

#[derive(Debug, Clone, Copy)]
struct Ui {
    quiet: bool,
    color: bool,
}

fn run_scan(args: ScanArgs, mut config: Config, ui: Ui) -> Result<ExitCode> {
    config.follow_symlinks |= args.follow_symlinks;
    config.skip_hidden |= args.skip_hidden;
    if args.max_file_size.is_some() {
        config.max_file_size = args.max_file_size;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }

    let builder = ManifestBuilder::new(config.walker_config(), config.hasher())
        .with_progress(Arc::new(Progress::new(ui.quiet)));
    let report = builder
        .scrape(&args.root)
        .with_context(|| format!("failed to scan {}", args.root.display()))?;

    store::save(&report.manifest, &args.output)
        .with_context(|| format!("failed to save manifest to {}", args.output.display()))?;
    log::info!("Manifest written to {}", args.output.display());

    if !ui.quiet {
        table::write_scrape_report(io::stdout().lock(), &report, ui.color)?;
    }

    Ok(if report.is_complete() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    })
}

fn run_show(args: &ShowArgs) -> Result<ExitCode> {
    let manifest = store::load(&args.manifest)
        .with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;

    let mut out = io::stdout().lock();
    table::write_manifest_summary(&mut out, &manifest)?;
    if args.records {
        writeln!(out)?;
        table::write_records(&mut out, &manifest)?;
    }
    Ok(ExitCode::Success)
}

/// Build a session from command-line selections and configured filters.
fn selection_session(selection: &SelectionArgs, config: &Config) -> Result<DedupeSession> {
    let rules = config
        .filter_rules(&selection.ignore, &selection.seek)
        .context("invalid extension filters")?;

    let mut session = DedupeSession::with_filters(rules);
    for (side, paths) in [(Side::Main, &selection.main), (Side::Backup, &selection.backup)] {
        for path in paths {
            session
                .add_manifest(side, path)
                .with_context(|| format!("cannot use {side} manifest {}", path.display()))?;
        }
    }
    Ok(session)
}

fn run_review(args: &ReviewArgs, config: &Config, ui: Ui) -> Result<ExitCode> {
    let mut session = selection_session(&args.selection, config)?;
    let result = session.review().context("failed to match manifests")?;

    let mut out = io::stdout().lock();
    match args.format {
        OutputFormat::Table => ReviewTable::new(&result)
            .with_color(ui.color)
            .write_to(&mut out)?,
        OutputFormat::Json => JsonOutput::new(&result).write_to(&mut out)?,
        OutputFormat::Csv => CsvOutput::new(&result.pairs).write_to(&mut out)?,
    }

    Ok(if result.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    })
}

fn run_delete(args: &DeleteArgs, config: &Config, ui: Ui) -> Result<ExitCode> {
    let mut session = selection_session(&args.selection, config)?;
    let result = session.review().context("failed to match manifests")?;

    ReviewTable::new(&result)
        .with_color(ui.color)
        .write_to(io::stdout().lock())?;
    if result.is_empty() {
        return Ok(ExitCode::NoDuplicates);
    }

    let count = session.begin_delete()?.len();
    let confirmation = if args.yes {
        Confirmation::Confirmed
    } else {
        print!("Type 'yes' to delete {count} main-side file(s): ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("failed to read confirmation")?;
        Confirmation::parse(&answer)
    };

    let mut delete_config = config.delete_config();
    delete_config.use_trash |= args.trash;
    let progress = Progress::new(ui.quiet);

    match session.confirm_delete(confirmation, &delete_config, Some(&progress))? {
        DeletionOutcome::Declined => {
            println!("Nothing was deleted.");
            Ok(ExitCode::Success)
        }
        DeletionOutcome::Completed(report) => {
            table::write_deletion_report(io::stdout().lock(), &report, ui.color)?;
            Ok(if report.all_succeeded() {
                ExitCode::Success
            } else {
                ExitCode::PartialSuccess
            })
        }
    }
}

fn run_interactive(args: &InteractiveArgs, config: &Config, ui: Ui) -> Result<ExitCode> {
    let rules = config
        .filter_rules::<&str>(&[], &[])
        .context("invalid extension filters in configuration")?;

    let mut delete_config = config.delete_config();
    delete_config.use_trash |= args.trash;
    let progress = Progress::new(ui.quiet);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(DedupeSession::with_filters(rules), stdin.lock(), stdout.lock())
        .with_delete_config(delete_config)
        .with_color(ui.color)
        .with_progress(&progress);
    menu.run().context("terminal I/O failed")?;

    Ok(ExitCode::Success)
}
