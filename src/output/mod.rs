//! Output formatters for review results.
//!
//! This module provides different output formats:
//! - Terminal table for interactive review and deletion reports
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use backdupe::duplicates::{find_duplicates, FilterRules};
//! use backdupe::manifest::store;
//! use backdupe::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let main = store::load(Path::new("main.manifest.json")).unwrap();
//! let backup = store::load(Path::new("backup.manifest.json")).unwrap();
//! let result = find_duplicates(&main, &backup, &FilterRules::none());
//!
//! println!("{}", JsonOutput::new(&result).to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod table;

// Re-export main types
pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use table::ReviewTable;
