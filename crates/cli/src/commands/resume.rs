//! Resume command: backfill stored images the log never recorded

use anyhow::{Context as _, Result};
use chrono::Local;
use clap::Args;
use stamplog_intake::{backfill_jobs, find_unrecorded_images, IntakeConfig, SubmissionPool};
use stamplog_ledger::{MissedStore, SubmissionLog};
use stamplog_timestamp_ocr::TimestampResolver;

#[derive(Args)]
pub struct ResumeCommand {}

impl ResumeCommand {
    pub async fn execute(self, config: IntakeConfig) -> Result<()> {
        println!("Checking for unprocessed images from previous sessions...");

        let log = SubmissionLog::new(&config.ledger_root)?;
        let recorded = log.recorded_filenames()?;
        let unrecorded = find_unrecorded_images(&config.image_root, &recorded)?;

        if unrecorded.is_empty() {
            println!("No unprocessed images found. All records are up to date.");
            return Ok(());
        }
        println!("Found {} unprocessed image(s).", unrecorded.len());

        let jobs = backfill_jobs(unrecorded, Local::now().naive_local());

        let resolver = TimestampResolver::new().context("Failed to initialize OCR")?;
        let missed = MissedStore::new(&config.missed_db_path)?;
        let pool = SubmissionPool::new(resolver, log, missed, config.max_concurrent);

        let mut rx = pool.process_all(jobs).await;
        let (mut recovered, mut missed_count) = (0u32, 0u32);
        while let Some(report) = rx.recv().await {
            match report.image_timestamp {
                Some(ts) => {
                    recovered += 1;
                    println!("{}: {}", report.filename, ts.format("%Y-%m-%d %H:%M:%S"));
                }
                None => {
                    missed_count += 1;
                    println!("{}: no timestamp recoverable", report.filename);
                }
            }
        }

        println!("\nBackfill complete: {recovered} recovered, {missed_count} missed");
        Ok(())
    }
}
