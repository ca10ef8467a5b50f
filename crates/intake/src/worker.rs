//! Bounded worker pool for submission processing
//!
//! Each job runs the recovery pipeline off the async runtime via
//! `spawn_blocking`, capped by a semaphore, and streams its report back over
//! a channel to whoever drives the intake (the chat transport or the CLI).
//! A job always produces exactly one submission-log row; a job whose
//! recovery came up empty additionally records an idempotent miss.

use chrono::NaiveDateTime;
use stamplog_common::SubmissionRecord;
use stamplog_ledger::{MissedStore, SubmissionLog};
use stamplog_timestamp_ocr::{Recognize, TimestampResolver};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

/// Resolves one stored image into a recovered timestamp.
///
/// Implemented by [`TimestampResolver`]; tests substitute scripted sources.
pub trait TimestampSource: Send + Sync + 'static {
    fn recover(&self, path: &Path) -> Option<NaiveDateTime>;
}

impl<R> TimestampSource for TimestampResolver<R>
where
    R: Recognize + Send + Sync + 'static,
{
    fn recover(&self, path: &Path) -> Option<NaiveDateTime> {
        self.resolve_path(path).timestamp()
    }
}

/// One image to process
#[derive(Debug, Clone)]
pub struct SubmissionJob {
    pub submitter: String,
    pub submitted_at: NaiveDateTime,
    /// Full path of the stored image
    pub stored_path: PathBuf,
    /// Bare filename (the ledger key)
    pub filename: String,
}

/// Outcome of one job, delivered back to the transport layer
#[derive(Debug)]
pub struct SubmissionReport {
    pub filename: String,
    pub submitter: String,
    pub image_timestamp: Option<NaiveDateTime>,
    /// Set when the ledger writes failed; the job itself still completed
    pub ledger_error: Option<String>,
}

struct Stores {
    log: SubmissionLog,
    missed: MissedStore,
}

/// Semaphore-bounded pool running submission jobs
pub struct SubmissionPool<S> {
    source: Arc<S>,
    stores: Arc<Mutex<Stores>>,
    max_concurrent: usize,
}

impl<S: TimestampSource> SubmissionPool<S> {
    pub fn new(source: S, log: SubmissionLog, missed: MissedStore, max_concurrent: usize) -> Self {
        Self {
            source: Arc::new(source),
            stores: Arc::new(Mutex::new(Stores { log, missed })),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Process jobs concurrently; reports stream out as jobs finish.
    pub async fn process_all(&self, jobs: Vec<SubmissionJob>) -> mpsc::Receiver<SubmissionReport> {
        let (tx, rx) = mpsc::channel(100);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        info!("=== Submission pool started ===");
        info!("Total jobs: {}", jobs.len());
        info!("Max concurrent: {}", self.max_concurrent);

        for job in jobs {
            let tx = tx.clone();
            let semaphore = semaphore.clone();
            let source = self.source.clone();
            let stores = self.stores.clone();

            tokio::spawn(async move {
                let _permit = semaphore.acquire().await;

                let filename = job.filename.clone();
                let submitter = job.submitter.clone();
                let report =
                    match tokio::task::spawn_blocking(move || process_job(&source, &stores, job))
                        .await
                    {
                        Ok(report) => report,
                        Err(e) => SubmissionReport {
                            filename,
                            submitter,
                            image_timestamp: None,
                            ledger_error: Some(format!("worker panicked: {e}")),
                        },
                    };

                let _ = tx.send(report).await;
            });
        }

        rx
    }
}

fn process_job<S: TimestampSource>(
    source: &S,
    stores: &Mutex<Stores>,
    job: SubmissionJob,
) -> SubmissionReport {
    let image_timestamp = source.recover(&job.stored_path);

    match &image_timestamp {
        Some(ts) => info!("recovered {} from '{}'", ts, job.filename),
        None => warn!("could not recover a timestamp from '{}'", job.filename),
    }

    let record = SubmissionRecord {
        submitter: job.submitter.clone(),
        submitted_at: job.submitted_at,
        filename: job.filename.clone(),
        image_timestamp,
    };

    let mut ledger_error = None;
    match stores.lock() {
        Ok(stores) => {
            if let Err(e) = stores.log.append(&record) {
                warn!("submission log write failed for '{}': {e}", job.filename);
                ledger_error = Some(e.to_string());
            }
            if image_timestamp.is_none() {
                if let Err(e) = stores.missed.record_miss(&job.filename, job.submitted_at) {
                    warn!("missed-record write failed for '{}': {e}", job.filename);
                    ledger_error.get_or_insert_with(|| e.to_string());
                }
            }
        }
        Err(poisoned) => {
            ledger_error = Some(format!("ledger lock poisoned: {poisoned}"));
        }
    }

    SubmissionReport {
        filename: job.filename,
        submitter: job.submitter,
        image_timestamp,
        ledger_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Source recovering a fixed timestamp, or nothing
    struct FixedSource(Option<NaiveDateTime>);

    impl TimestampSource for FixedSource {
        fn recover(&self, _path: &Path) -> Option<NaiveDateTime> {
            self.0
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn job(filename: &str) -> SubmissionJob {
        SubmissionJob {
            submitter: "alice".to_string(),
            submitted_at: noon(),
            stored_path: PathBuf::from(format!("/tmp/{filename}")),
            filename: filename.to_string(),
        }
    }

    async fn drain(mut rx: mpsc::Receiver<SubmissionReport>) -> Vec<SubmissionReport> {
        let mut reports = Vec::new();
        while let Some(report) = rx.recv().await {
            reports.push(report);
        }
        reports
    }

    #[tokio::test]
    async fn test_pool_processes_every_job() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();
        let missed = MissedStore::new(dir.path().join("missed.db")).unwrap();
        let pool = SubmissionPool::new(FixedSource(Some(noon())), log, missed, 2);

        let jobs = vec![job("a.jpg"), job("b.jpg"), job("c.jpg")];
        let reports = drain(pool.process_all(jobs).await).await;

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.ledger_error.is_none()));
        assert!(reports.iter().all(|r| r.image_timestamp.is_some()));

        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();
        assert_eq!(log.records().unwrap().len(), 3);

        // Nothing was missed
        let missed = MissedStore::new(dir.path().join("missed.db")).unwrap();
        assert_eq!(missed.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unrecovered_job_records_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();
        let missed = MissedStore::new(dir.path().join("missed.db")).unwrap();
        let pool = SubmissionPool::new(FixedSource(None), log, missed, 2);

        let reports = drain(pool.process_all(vec![job("a.jpg")]).await).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].image_timestamp, None);

        // The log row still exists, with the N/A marker
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();
        let records = log.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].image_timestamp, None);

        let missed = MissedStore::new(dir.path().join("missed.db")).unwrap();
        assert!(missed.contains("a.jpg").unwrap());
    }

    #[tokio::test]
    async fn test_reprocessing_never_duplicates_misses() {
        let dir = tempfile::tempdir().unwrap();
        let log = SubmissionLog::new(dir.path().join("ledger")).unwrap();
        let missed = MissedStore::new(dir.path().join("missed.db")).unwrap();
        let pool = SubmissionPool::new(FixedSource(None), log, missed, 2);

        drain(pool.process_all(vec![job("a.jpg")]).await).await;
        drain(pool.process_all(vec![job("a.jpg")]).await).await;

        let missed = MissedStore::new(dir.path().join("missed.db")).unwrap();
        assert_eq!(missed.count().unwrap(), 1);
    }
}
