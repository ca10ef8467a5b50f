//! Durable records of photo submissions
//!
//! Two stores with different shapes:
//! - [`SubmissionLog`]: append-only CSV shards, one per submitter and ISO
//!   week, with one row per resolved image, recovered timestamp or not:
//!   the authoritative record the resume scan checks against.
//! - [`MissedStore`]: a SQLite table of images the pipeline could not read a
//!   timestamp from, keyed uniquely by filename so re-processing never
//!   duplicates rows, with room for a later manual correction.

use thiserror::Error;

pub mod missed_store;
pub mod submission_log;

pub use missed_store::MissedStore;
pub use submission_log::SubmissionLog;

/// Errors from the persistence layer
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
