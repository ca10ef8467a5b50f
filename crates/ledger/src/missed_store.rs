//! SQLite store of images the pipeline could not recover a timestamp from
//!
//! Rows are keyed uniquely by image filename and inserted with
//! `INSERT OR IGNORE`, so re-processing the same image (e.g. during a resume
//! scan) never duplicates entries. The `corrected_timestamp` and `notes`
//! columns hold a later manual correction for feedback review.

use crate::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use stamplog_common::TIMESTAMP_LAYOUT;
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS missed_timestamps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    image_filename TEXT NOT NULL UNIQUE,
    submitted_at TEXT NOT NULL,
    corrected_timestamp TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_missed_filename ON missed_timestamps(image_filename);
";

/// Database of missed-timestamp records
pub struct MissedStore {
    conn: Connection,
}

impl MissedStore {
    /// Open or create the database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.execute_batch(SCHEMA)?;
        debug!("missed-record store ready at {}", path.display());
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Record a miss. Returns `true` if a new row was inserted, `false` if
    /// the filename was already present (the insert is ignored).
    pub fn record_miss(&self, filename: &str, submitted_at: NaiveDateTime) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO missed_timestamps (image_filename, submitted_at)
             VALUES (?1, ?2)",
            params![filename, submitted_at.format(TIMESTAMP_LAYOUT).to_string()],
        )?;

        if inserted > 0 {
            info!("recorded missed timestamp for '{filename}'");
        } else {
            debug!("missed record for '{filename}' already exists");
        }
        Ok(inserted > 0)
    }

    /// Attach a manually determined timestamp to an existing miss.
    /// Returns `true` when a row was updated.
    pub fn set_correction(
        &self,
        filename: &str,
        corrected: NaiveDateTime,
        notes: Option<&str>,
    ) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE missed_timestamps
             SET corrected_timestamp = ?2, notes = ?3
             WHERE image_filename = ?1",
            params![
                filename,
                corrected.format(TIMESTAMP_LAYOUT).to_string(),
                notes
            ],
        )?;
        Ok(updated > 0)
    }

    /// Whether a miss is recorded for `filename`
    pub fn contains(&self, filename: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM missed_timestamps WHERE image_filename = ?1",
            params![filename],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Total number of missed records
    pub fn count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM missed_timestamps", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}
