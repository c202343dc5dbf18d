//! Human-readable terminal output.
//!
//! Renders the review table, the deletion report and manifest summaries.
//! Sizes use IEC units via the bytesize crate. Styling goes through yansi and
//! can be switched off per renderer.

use std::io::{self, Write};

use bytesize::ByteSize;
use tabled::settings::object::{Cell, Columns};
use tabled::settings::{Alignment, Span, Style};
use tabled::{Table, Tabled};
use yansi::{Condition, Paint};

use crate::actions::delete::DeletionReport;
use crate::duplicates::MatchResult;
use crate::manifest::{Manifest, ScrapeReport};

fn condition(color: bool) -> Condition {
    if color {
        Condition::ALWAYS
    } else {
        Condition::NEVER
    }
}

/// Format a byte count for display.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

#[derive(Tabled)]
struct ReviewRow {
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Main file")]
    main: String,
    #[tabled(rename = "Backup file")]
    backup: String,
}

/// Review table for a match result.
///
/// Columns are Size, Main file and Backup file. Rows where both copies share
/// a file name show a single name cell spanning both name columns.
pub struct ReviewTable<'a> {
    result: &'a MatchResult,
    color: bool,
}

impl<'a> ReviewTable<'a> {
    /// Create a table without styling.
    #[must_use]
    pub fn new(result: &'a MatchResult) -> Self {
        Self {
            result,
            color: false,
        }
    }

    /// Enable or disable styling.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write the table and its totals line.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        let when = condition(self.color);

        if self.result.is_empty() {
            writeln!(w, "{}", "No duplicates found.".yellow().whenever(when))?;
            return self.write_totals(&mut w);
        }

        let mut merged_rows = Vec::new();
        let rows: Vec<ReviewRow> = self
            .result
            .pairs
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let same = p.same_file_name();
                if same {
                    // Row 0 is the header.
                    merged_rows.push(i + 1);
                }
                ReviewRow {
                    size: format_size(p.size_bytes()),
                    main: p.main_name().to_string(),
                    backup: if same {
                        String::new()
                    } else {
                        p.backup_name().to_string()
                    },
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::psql());
        table.modify(Columns::first(), Alignment::right());
        for row in merged_rows {
            table.modify(Cell::new(row, 1), Span::column(2));
            table.modify(Cell::new(row, 1), Alignment::center());
        }

        let rendered = table.to_string();
        let mut lines = rendered.lines();
        if let Some(header) = lines.next() {
            writeln!(w, "{}", header.bold().whenever(when))?;
        }
        for line in lines {
            writeln!(w, "{line}")?;
        }

        writeln!(w)?;
        self.write_totals(&mut w)
    }

    fn write_totals<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let when = condition(self.color);
        let mut totals = format!(
            "{} duplicate(s), {} reclaimable",
            self.result.pairs.len(),
            format_size(self.result.total_bytes())
        );
        if self.result.filtered > 0 {
            totals.push_str(&format!(", {} filtered out", self.result.filtered));
        }
        if self.result.same_path > 0 {
            totals.push_str(&format!(
                ", {} listed on both sides and kept",
                self.result.same_path
            ));
        }
        writeln!(w, "{}", totals.bold().whenever(when))
    }
}

/// Write the outcome of a deletion.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_deletion_report<W: Write>(
    mut w: W,
    report: &DeletionReport,
    color: bool,
) -> io::Result<()> {
    let when = condition(color);

    writeln!(
        w,
        "{}",
        format!(
            "Freed {} by deleting {} file(s).",
            format_size(report.bytes_removed),
            report.deleted_count()
        )
        .green()
        .whenever(when)
    )?;

    if !report.failures.is_empty() {
        writeln!(
            w,
            "{}",
            format!("Failed to delete {} file(s):", report.failure_count())
                .red()
                .whenever(when)
        )?;
        for failure in &report.failures {
            writeln!(w, "  {}: {}", failure.path.display(), failure.error)?;
        }
    }

    if !report.backup_dirs.is_empty() {
        writeln!(w, "Backup copies kept in:")?;
        for dir in &report.backup_dirs {
            writeln!(w, "  {}", dir.display())?;
        }
    }
    Ok(())
}

/// Write a short description of a manifest.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_manifest_summary<W: Write>(mut w: W, manifest: &Manifest) -> io::Result<()> {
    if let Some(root) = manifest.root() {
        writeln!(w, "Root:        {}", root.display())?;
    }
    if let Some(created) = manifest.created_at() {
        writeln!(w, "Created:     {}", created.to_rfc3339())?;
    }
    writeln!(w, "Files:       {}", manifest.len())?;
    writeln!(w, "Total size:  {}", format_size(manifest.total_bytes()))?;

    let extensions: Vec<_> = manifest.unique_extensions().into_iter().collect();
    writeln!(
        w,
        "Extensions:  {} ({})",
        extensions.len(),
        extensions.join(" ")
    )
}

/// Write every record of a manifest, one per line, in digest order.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_records<W: Write>(mut w: W, manifest: &Manifest) -> io::Result<()> {
    for record in manifest.records() {
        writeln!(
            w,
            "{}  {:>10}  {:<6}  {}",
            record.digest.short(),
            format_size(record.size_bytes),
            record.extension,
            record.path.display()
        )?;
    }
    Ok(())
}

/// Write the result of a scan: manifest summary plus skipped files.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_scrape_report<W: Write>(
    mut w: W,
    report: &ScrapeReport,
    color: bool,
) -> io::Result<()> {
    let when = condition(color);

    write_manifest_summary(&mut w, &report.manifest)?;
    writeln!(
        w,
        "Scanned {} file(s) in {:.2?}, {} without extension",
        report.files_seen, report.duration, report.no_extension
    )?;

    if !report.skipped.is_empty() {
        writeln!(
            w,
            "{}",
            format!("Skipped {} file(s):", report.skipped.len())
                .yellow()
                .whenever(when)
        )?;
        for skipped in &report.skipped {
            let tag = if skipped.overflow { " [too large]" } else { "" };
            writeln!(w, "  {}: {}{}", skipped.path.display(), skipped.reason, tag)?;
        }
    }
    Ok(())
}
