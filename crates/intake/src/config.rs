//! Intake service configuration, loadable from a YAML file

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_image_root() -> PathBuf {
    PathBuf::from("image_folder")
}

fn default_ledger_root() -> PathBuf {
    PathBuf::from("submission_logs")
}

fn default_missed_db_path() -> PathBuf {
    PathBuf::from("missed.db")
}

fn default_allowlist_path() -> PathBuf {
    PathBuf::from("users.txt")
}

fn default_max_concurrent() -> usize {
    4
}

fn default_max_daily_images() -> u32 {
    99_999
}

/// Configuration for the intake service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Root directory of the per-submitter, per-date image store
    #[serde(default = "default_image_root")]
    pub image_root: PathBuf,

    /// Root directory of the per-submitter, per-week submission log
    #[serde(default = "default_ledger_root")]
    pub ledger_root: PathBuf,

    /// Path of the missed-record SQLite database
    #[serde(default = "default_missed_db_path")]
    pub missed_db_path: PathBuf,

    /// Newline-delimited allow-list of submitters
    #[serde(default = "default_allowlist_path")]
    pub allowlist_path: PathBuf,

    /// Maximum images processed concurrently by the worker pool
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Maximum stored images per submitter per day
    #[serde(default = "default_max_daily_images")]
    pub max_daily_images: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            image_root: default_image_root(),
            ledger_root: default_ledger_root(),
            missed_db_path: default_missed_db_path(),
            allowlist_path: default_allowlist_path(),
            max_concurrent: default_max_concurrent(),
            max_daily_images: default_max_daily_images(),
        }
    }
}

impl IntakeConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&contents)?;
        debug!("loaded intake config from {}", path.as_ref().display());
        Ok(config)
    }
}
