//! On-disk image store and filename policy
//!
//! Images live under `<root>/<submitter>/<YYYY-MM-DD>/` and are named
//! `<submitter>-log<YYYY-MM-DD>-NNNNNN.jpg` with the first free six-digit
//! suffix. The filename alone is enough to attribute an image to a
//! submitter and date, which is what the resume scan relies on.

use chrono::NaiveDate;
use regex::Regex;
use stamplog_common::{ProcessingError, Result};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

static SUBMITTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)-log\d{4}-\d{2}-\d{2}-").expect("valid filename regex"));

/// Submitter encoded in a stored filename, if it follows the convention
#[must_use]
pub fn parse_submitter(filename: &str) -> Option<&str> {
    SUBMITTER_RE
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A reserved slot in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSlot {
    /// Full path of the stored image
    pub path: PathBuf,
    /// Bare filename (the ledger key)
    pub filename: String,
}

/// Per-submitter, per-date image store
pub struct ImageStore {
    root: PathBuf,
    max_daily: u32,
}

impl ImageStore {
    pub fn new<P: Into<PathBuf>>(root: P, max_daily: u32) -> Self {
        Self {
            root: root.into(),
            max_daily,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one submitter and date
    #[must_use]
    pub fn dir_for(&self, submitter: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(submitter)
            .join(date.format("%Y-%m-%d").to_string())
    }

    /// Reserve the next free filename for `submitter` on `date`, creating
    /// the directory as needed.
    pub fn next_slot(&self, submitter: &str, date: NaiveDate) -> Result<StoredSlot> {
        let dir = self.dir_for(submitter, date);
        std::fs::create_dir_all(&dir)?;
        debug!("ensured directory {}", dir.display());

        let date_str = date.format("%Y-%m-%d");
        for suffix in 1..=self.max_daily {
            let filename = format!("{submitter}-log{date_str}-{suffix:06}.jpg");
            let path = dir.join(&filename);
            if !path.exists() {
                return Ok(StoredSlot { path, filename });
            }
        }

        Err(ProcessingError::DailyLimitReached {
            submitter: submitter.to_string(),
            limit: self.max_daily,
        })
    }

    /// Copy a source file into the store under the naming policy.
    pub fn store_file(&self, submitter: &str, date: NaiveDate, source: &Path) -> Result<StoredSlot> {
        let slot = self.next_slot(submitter, date)?;
        std::fs::copy(source, &slot.path)?;
        info!("stored {} as {}", source.display(), slot.filename);
        Ok(slot)
    }
}
