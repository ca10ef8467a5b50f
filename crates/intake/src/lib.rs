//! Submission intake: everything between the chat transport and the
//! timestamp pipeline
//!
//! The transport layer (excluded here) downloads an image and hands it to
//! this crate, which owns the allow-list check, the on-disk naming policy,
//! the bounded worker pool that runs the recovery pipeline, the ledger
//! writes, and the resume scan that re-submits images a previous run never
//! recorded.

use stamplog_common::ProcessingError;
use stamplog_ledger::LedgerError;
use thiserror::Error;

pub mod allowlist;
pub mod config;
pub mod resume;
pub mod store;
pub mod worker;

pub use allowlist::Allowlist;
pub use config::IntakeConfig;
pub use resume::{backfill_jobs, find_unrecorded_images};
pub use store::{parse_submitter, ImageStore, StoredSlot};
pub use worker::{SubmissionJob, SubmissionPool, SubmissionReport, TimestampSource};

/// Errors from the intake layer
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),
}

/// Result type for intake operations
pub type Result<T> = std::result::Result<T, IntakeError>;
