//! CSV output formatter for review results.
//!
//! One row is generated for each duplicate pair.
//!
//! # Columns
//!
//! - `digest`: BLAKE3 content digest (hexadecimal)
//! - `size_bytes`: Size of the main copy in bytes
//! - `extension`: Extension of the main copy
//! - `main`: Path of the copy that would be deleted
//! - `backup`: Path of the copy that is kept

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicatePair;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    digest: String,
    size_bytes: u64,
    extension: &'a str,
    main: String,
    backup: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    pairs: &'a [DuplicatePair],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(pairs: &'a [DuplicatePair]) -> Self {
        Self { pairs }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for pair in self.pairs {
            csv_writer.serialize(CsvRow {
                digest: pair.digest().to_hex(),
                size_bytes: pair.size_bytes(),
                extension: &pair.main.extension,
                main: pair.main.path.to_string_lossy().into_owned(),
                backup: pair.backup.path.to_string_lossy().into_owned(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
