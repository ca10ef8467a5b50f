//! Submitter allow-list
//!
//! One submitter per line, case-insensitive. The transport layer checks this
//! before an image ever reaches the pipeline; the pipeline itself performs
//! no authorization.

use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Set of submitters permitted to store images
pub struct Allowlist {
    users: HashSet<String>,
}

impl Allowlist {
    /// Load from a newline-delimited file.
    ///
    /// A missing or unreadable file yields an empty allow-list (nobody is
    /// permitted) with a warning rather than an error, so a misplaced file
    /// fails closed.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let users: HashSet<String> = contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_lowercase)
                    .collect();
                info!("loaded {} allowed submitters from {}", users.len(), path.display());
                Self { users }
            }
            Err(e) => {
                warn!(
                    "allow-list {} not readable ({e}); no submitters will be allowed",
                    path.display()
                );
                Self {
                    users: HashSet::new(),
                }
            }
        }
    }

    /// Whether `submitter` is allowed (case-insensitive)
    #[must_use]
    pub fn permits(&self, submitter: &str) -> bool {
        self.users.contains(&submitter.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
