//! Ingest command: store files as fresh submissions and process them

use anyhow::{Context as _, Result};
use chrono::Local;
use clap::Args;
use stamplog_intake::{Allowlist, ImageStore, IntakeConfig, SubmissionJob, SubmissionPool};
use stamplog_ledger::{MissedStore, SubmissionLog};
use stamplog_timestamp_ocr::TimestampResolver;
use std::path::PathBuf;

#[derive(Args)]
pub struct IngestCommand {
    /// Submitter identity (must be on the allow-list)
    #[arg(value_name = "SUBMITTER")]
    submitter: String,

    /// Image files to ingest
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,
}

impl IngestCommand {
    pub async fn execute(self, config: IntakeConfig) -> Result<()> {
        let allowlist = Allowlist::load(&config.allowlist_path);
        if !allowlist.permits(&self.submitter) {
            anyhow::bail!(
                "submitter '{}' is not on the allow-list ({})",
                self.submitter,
                config.allowlist_path.display()
            );
        }

        let now = Local::now().naive_local();
        let store = ImageStore::new(&config.image_root, config.max_daily_images);

        // Store every file under the naming policy before processing starts,
        // so a crash mid-run leaves them for the resume scan.
        let mut jobs = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let slot = store
                .store_file(&self.submitter, now.date(), file)
                .with_context(|| format!("Failed to store {}", file.display()))?;
            jobs.push(SubmissionJob {
                submitter: self.submitter.clone(),
                submitted_at: now,
                stored_path: slot.path,
                filename: slot.filename,
            });
        }

        let resolver = TimestampResolver::new().context("Failed to initialize OCR")?;
        let log = SubmissionLog::new(&config.ledger_root)?;
        let missed = MissedStore::new(&config.missed_db_path)?;
        let pool = SubmissionPool::new(resolver, log, missed, config.max_concurrent);

        let mut rx = pool.process_all(jobs).await;
        let (mut recovered, mut missed_count, mut errors) = (0u32, 0u32, 0u32);
        while let Some(report) = rx.recv().await {
            match report.image_timestamp {
                Some(ts) => {
                    recovered += 1;
                    println!("{}: {}", report.filename, ts.format("%Y-%m-%d %H:%M:%S"));
                }
                None => {
                    missed_count += 1;
                    println!("{}: no timestamp recoverable (recorded for review)", report.filename);
                }
            }
            if let Some(error) = report.ledger_error {
                errors += 1;
                eprintln!("{}: ledger error: {error}", report.filename);
            }
        }

        println!("\n{recovered} recovered, {missed_count} missed, {errors} ledger error(s)");
        Ok(())
    }
}
