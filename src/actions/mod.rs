//! File actions module.
//!
//! # Deletion
//!
//! The delete module removes main-side duplicates once the user has confirmed:
//! - Full-word `yes` confirmation
//! - Backup presence and size checks before every removal
//! - Permanent removal by default, system trash on request
//! - Per-file failure collection with a final report
//!
//! ```no_run
//! use backdupe::actions::delete::Confirmation;
//!
//! assert!(!Confirmation::parse("y").is_confirmed());
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_duplicates, delete_pair, Confirmation, DeleteConfig, DeleteError, DeletedFile,
    DeletionFailure, DeletionOutcome, DeletionReport,
};
