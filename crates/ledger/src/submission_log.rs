//! Per-submitter, per-week CSV submission log
//!
//! Rows live in weekly shards named `<root>/<submitter>/<YYYY>-W<NN>-
//! <submitter>.csv`, one row per resolved image: submitter, submission
//! time, stored filename, and the recovered timestamp (or the `N/A`
//! marker). The union of all shards is the source of truth for the resume
//! scan, which re-submits any stored image whose filename appears nowhere
//! here.

use crate::Result;
use chrono::Datelike;
use csv::{ReaderBuilder, WriterBuilder};
use stamplog_common::SubmissionRecord;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Durable submission log sharded by submitter and ISO week
pub struct SubmissionLog {
    root: PathBuf,
}

impl SubmissionLog {
    /// Open (or create) the log rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The log's root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Weekly shard holding a given record
    fn shard_for(&self, record: &SubmissionRecord) -> PathBuf {
        let week = record.submitted_at.date().iso_week();
        self.root.join(&record.submitter).join(format!(
            "{}-W{:02}-{}.csv",
            week.year(),
            week.week(),
            record.submitter
        ))
    }

    /// Append one record to its submitter's weekly shard, writing the
    /// header when the shard is new.
    pub fn append(&self, record: &SubmissionRecord) -> Result<()> {
        let shard = self.shard_for(record);
        if let Some(parent) = shard.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = std::fs::metadata(&shard).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new().create(true).append(true).open(&shard)?;
        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        info!(
            "recorded submission '{}' from {} ({})",
            record.filename,
            record.submitter,
            record.image_timestamp_display()
        );
        Ok(())
    }

    /// All records across every shard.
    pub fn records(&self) -> Result<Vec<SubmissionRecord>> {
        let mut records = Vec::new();
        for shard in self.shards()? {
            let mut reader = ReaderBuilder::new().has_headers(true).from_path(&shard)?;
            for row in reader.deserialize() {
                match row {
                    Ok(record) => records.push(record),
                    // A torn row (e.g. power loss mid-append) loses one
                    // record, not the whole shard
                    Err(e) => warn!("skipping malformed row in {}: {e}", shard.display()),
                }
            }
        }
        Ok(records)
    }

    /// The set of filenames already recorded anywhere (the resume contract).
    pub fn recorded_filenames(&self) -> Result<HashSet<String>> {
        Ok(self
            .records()?
            .into_iter()
            .map(|record| record.filename)
            .collect())
    }

    fn shards(&self) -> Result<Vec<PathBuf>> {
        let mut shards = Vec::new();
        if !self.root.exists() {
            debug!("submission log root {} does not exist yet", self.root.display());
            return Ok(shards);
        }
        collect_csv_files(&self.root, &mut shards)?;
        shards.sort();
        Ok(shards)
    }
}

fn collect_csv_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_csv_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(submitter: &str, filename: &str, recovered: bool) -> SubmissionRecord {
        let submitted_at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        SubmissionRecord {
            submitter: submitter.to_string(),
            submitted_at,
            filename: filename.to_string(),
            image_timestamp: recovered.then(|| {
                NaiveDate::from_ymd_opt(2024, 3, 14)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap()
            }),
        }
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();

        log.append(&record("alice", "a.jpg", true)).unwrap();
        log.append(&record("alice", "b.jpg", false)).unwrap();

        let records = log.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "a.jpg");
        assert!(records[0].image_timestamp.is_some());
        assert_eq!(records[1].filename, "b.jpg");
        assert_eq!(records[1].image_timestamp, None);
    }

    #[test]
    fn test_shards_are_per_submitter_and_week() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();

        log.append(&record("alice", "a.jpg", true)).unwrap();
        log.append(&record("bob", "b.jpg", true)).unwrap();

        // 2024-03-15 falls in ISO week 11 of 2024
        assert!(dir
            .path()
            .join("ledger/alice/2024-W11-alice.csv")
            .exists());
        assert!(dir.path().join("ledger/bob/2024-W11-bob.csv").exists());

        // Both shards are read back together
        assert_eq!(log.records().unwrap().len(), 2);
    }

    #[test]
    fn test_header_written_once_per_shard() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();

        log.append(&record("alice", "a.jpg", true)).unwrap();
        log.append(&record("alice", "b.jpg", true)).unwrap();

        let shard = dir.path().join("ledger/alice/2024-W11-alice.csv");
        let contents = std::fs::read_to_string(&shard).unwrap();
        let headers = contents
            .lines()
            .filter(|line| line.starts_with("submitter"))
            .count();
        assert_eq!(headers, 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_unrecovered_rows_carry_the_marker() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();
        log.append(&record("alice", "a.jpg", false)).unwrap();

        let shard = dir.path().join("ledger/alice/2024-W11-alice.csv");
        let contents = std::fs::read_to_string(&shard).unwrap();
        assert!(contents.contains("N/A"));
    }

    #[test]
    fn test_empty_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();
        assert!(log.records().unwrap().is_empty());
        assert!(log.recorded_filenames().unwrap().is_empty());
    }

    #[test]
    fn test_recorded_filenames_span_submitters() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();

        log.append(&record("alice", "a.jpg", true)).unwrap();
        log.append(&record("bob", "b.jpg", false)).unwrap();

        let names = log.recorded_filenames().unwrap();
        assert!(names.contains("a.jpg"));
        assert!(names.contains("b.jpg"));
        assert!(!names.contains("c.jpg"));
    }
}
