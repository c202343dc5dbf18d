//! Line-oriented menu shell over a [`DedupeSession`].
//!
//! The shell reads one command per line from any [`BufRead`] and writes
//! prompts and results to any [`Write`], so it runs the same on a terminal
//! and in tests. Commands are chosen by the first character of the line,
//! case-insensitively. End of input exits from any menu.
//!
//! ```text
//! ---Main Menu---
//!   (M) Select MAIN manifests
//!   (B) Select BACKUP manifests
//!   (F) Edit FILTER rules
//!   (R) REVIEW duplicates
//!   (D) DELETE duplicates
//!   (E) EXIT
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::actions::delete::{Confirmation, DeleteConfig, DeletionOutcome};
use crate::output::table::{write_deletion_report, ReviewTable};
use crate::progress::ProgressCallback;
use crate::session::{DedupeSession, Side};

/// Top-level menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Edit the main manifest selection.
    Main,
    /// Edit the backup manifest selection.
    Backup,
    /// Edit the extension filters.
    Filters,
    /// Show the duplicates for the current selection.
    Review,
    /// Review, confirm and delete.
    Delete,
    /// Leave the shell.
    Exit,
}

impl MenuCommand {
    /// Parse a line by its first non-blank character.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match first_key(line)? {
            'M' => Some(Self::Main),
            'B' => Some(Self::Backup),
            'F' => Some(Self::Filters),
            'R' => Some(Self::Review),
            'D' => Some(Self::Delete),
            'E' => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Manifest sub-menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestCommand {
    /// Add a manifest path.
    Add,
    /// Remove a manifest path.
    Remove,
    /// Back to the main menu.
    Back,
}

impl ManifestCommand {
    /// Parse a line by its first non-blank character.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match first_key(line)? {
            'A' => Some(Self::Add),
            'R' => Some(Self::Remove),
            'E' => Some(Self::Back),
            _ => None,
        }
    }
}

/// Filter sub-menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCommand {
    /// Add ignored extensions.
    Ignore,
    /// Add sought extensions.
    Seek,
    /// Clear every rule.
    Clear,
    /// Back to the main menu.
    Back,
}

impl FilterCommand {
    /// Parse a line by its first non-blank character.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match first_key(line)? {
            'I' => Some(Self::Ignore),
            'S' => Some(Self::Seek),
            'X' => Some(Self::Clear),
            'E' => Some(Self::Back),
            _ => None,
        }
    }
}

fn first_key(line: &str) -> Option<char> {
    line.trim_start()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
}

/// Interactive shell state.
pub struct Menu<'p, R, W> {
    input: R,
    output: W,
    session: DedupeSession,
    delete_config: DeleteConfig,
    color: bool,
    progress: Option<&'p dyn ProgressCallback>,
}

impl<'p, R: BufRead, W: Write> Menu<'p, R, W> {
    /// Create a shell over a session.
    pub fn new(session: DedupeSession, input: R, output: W) -> Self {
        Self {
            input,
            output,
            session,
            delete_config: DeleteConfig::default(),
            color: false,
            progress: None,
        }
    }

    /// How confirmed deletions remove files.
    #[must_use]
    pub fn with_delete_config(mut self, config: DeleteConfig) -> Self {
        self.delete_config = config;
        self
    }

    /// Enable or disable styled output.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Report deletion progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: &'p dyn ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The session being driven.
    #[must_use]
    pub fn session(&self) -> &DedupeSession {
        &self.session
    }

    /// Give the session back.
    #[must_use]
    pub fn into_session(self) -> DedupeSession {
        self.session
    }

    /// Run until the user exits or input ends.
    ///
    /// Session errors are printed and the shell keeps going; only I/O errors
    /// on the streams end the loop early.
    ///
    /// # Errors
    ///
    /// Returns any error from reading input or writing output.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_main_menu()?;
            let Some(line) = self.prompt("> ")? else {
                break;
            };

            match MenuCommand::parse(&line) {
                Some(MenuCommand::Main) => self.manifest_menu(Side::Main)?,
                Some(MenuCommand::Backup) => self.manifest_menu(Side::Backup)?,
                Some(MenuCommand::Filters) => self.filter_menu()?,
                Some(MenuCommand::Review) => self.review()?,
                Some(MenuCommand::Delete) => self.delete()?,
                Some(MenuCommand::Exit) => break,
                None => writeln!(self.output, "Please enter a valid command [M, B, F, R, D, E]")?,
            }
        }
        writeln!(self.output, "Exited.")?;
        Ok(())
    }

    fn print_main_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "---Main Menu---")?;
        writeln!(self.output, "  (M) Select MAIN manifests [{}]", self.session.manifests(Side::Main).len())?;
        writeln!(self.output, "  (B) Select BACKUP manifests [{}]", self.session.manifests(Side::Backup).len())?;
        writeln!(self.output, "  (F) Edit FILTER rules")?;
        match self.session.kill_list() {
            Some(list) => {
                writeln!(self.output, "  (R) REVIEW the {} duplicate(s) found", list.len())?;
                writeln!(self.output, "  (D) DELETE the {} duplicate(s) found", list.len())?;
            }
            None => {
                writeln!(self.output, "  (R) REVIEW duplicates")?;
                writeln!(self.output, "  (D) DELETE duplicates")?;
            }
        }
        writeln!(self.output, "  (E) EXIT")
    }

    fn manifest_menu(&mut self, side: Side) -> io::Result<()> {
        self.session.select(side);
        loop {
            writeln!(self.output, "---{} manifests---", side.to_string().to_uppercase())?;
            let selected = self.session.manifests(side);
            if selected.is_empty() {
                writeln!(self.output, "  Selected: None")?;
            } else {
                writeln!(self.output, "  Selected:")?;
                for path in selected.paths() {
                    writeln!(self.output, "    {}", path.display())?;
                }
            }
            writeln!(self.output, "  (A) ADD a manifest file")?;
            writeln!(self.output, "  (R) REMOVE a manifest file")?;
            writeln!(self.output, "  (E) back to MAIN MENU")?;

            let Some(line) = self.prompt("> ")? else {
                break;
            };
            match ManifestCommand::parse(&line) {
                Some(ManifestCommand::Add) => {
                    let Some(path) = self.prompt("Manifest path: ")? else {
                        break;
                    };
                    match self.session.add_manifest(side, Path::new(path.trim())) {
                        Ok(true) => {}
                        Ok(false) => writeln!(self.output, "Already selected.")?,
                        Err(e) => writeln!(self.output, "Invalid file path: {e}")?,
                    }
                }
                Some(ManifestCommand::Remove) => {
                    let Some(path) = self.prompt("Manifest path: ")? else {
                        break;
                    };
                    if let Err(e) = self.session.remove_manifest(side, Path::new(path.trim())) {
                        writeln!(self.output, "{e}")?;
                    }
                }
                Some(ManifestCommand::Back) => break,
                None => writeln!(self.output, "Please enter a valid command [A, R, E]")?,
            }
        }
        self.session.finish_editing();
        Ok(())
    }

    fn filter_menu(&mut self) -> io::Result<()> {
        self.session.edit_filters();
        loop {
            let filters = self.session.filters();
            writeln!(self.output, "---Filter rules---")?;
            writeln!(self.output, "  (I) Add IGNORED extensions: {}", filters.ignored())?;
            writeln!(self.output, "  (S) Add SOUGHT extensions: {}", filters.sought())?;
            writeln!(self.output, "  (X) Clear all rules")?;
            writeln!(self.output, "  (E) back to MAIN MENU")?;

            let Some(line) = self.prompt("> ")? else {
                break;
            };
            match FilterCommand::parse(&line) {
                Some(cmd @ (FilterCommand::Ignore | FilterCommand::Seek)) => {
                    let Some(list) = self.prompt("Extensions (space separated): ")? else {
                        break;
                    };
                    let result = if cmd == FilterCommand::Ignore {
                        self.session.add_ignored(&list)
                    } else {
                        self.session.add_sought(&list)
                    };
                    if let Err(e) = result {
                        writeln!(self.output, "{e}")?;
                    }
                }
                Some(FilterCommand::Clear) => self.session.clear_filters(),
                Some(FilterCommand::Back) => break,
                None => writeln!(self.output, "Please enter a valid command [I, S, X, E]")?,
            }
        }
        self.session.finish_editing();
        Ok(())
    }

    fn review(&mut self) -> io::Result<()> {
        match self.session.review() {
            Ok(result) => ReviewTable::new(&result)
                .with_color(self.color)
                .write_to(&mut self.output),
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    fn delete(&mut self) -> io::Result<()> {
        let result = match self.session.review() {
            Ok(result) => result,
            Err(e) => return writeln!(self.output, "{e}"),
        };
        ReviewTable::new(&result)
            .with_color(self.color)
            .write_to(&mut self.output)?;

        let count = match self.session.begin_delete() {
            Ok(list) => list.len(),
            Err(e) => return writeln!(self.output, "{e}"),
        };

        let question = format!("Type 'yes' to delete {count} main-side file(s): ");
        let answer = self.prompt(&question)?.unwrap_or_default();
        let confirmation = Confirmation::parse(&answer);

        match self
            .session
            .confirm_delete(confirmation, &self.delete_config, self.progress)
        {
            Ok(DeletionOutcome::Declined) => writeln!(self.output, "Nothing was deleted."),
            Ok(DeletionOutcome::Completed(report)) => {
                write_deletion_report(&mut self.output, &report, self.color)
            }
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    /// Print `text` and read one line. `None` on end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
