//! Single-image extraction command (diagnostic mode)

use anyhow::Result;
use clap::Args;
use stamplog_timestamp_ocr::{Outcome, TimestampResolver};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args)]
pub struct ExtractCommand {
    /// Input image file (JPEG/PNG/GIF)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,
}

impl ExtractCommand {
    pub async fn execute(self) -> Result<()> {
        if !self.image.exists() {
            anyhow::bail!("Input file does not exist: {}", self.image.display());
        }

        let resolver = TimestampResolver::new()?;
        let start = Instant::now();

        // The pipeline is CPU-bound; keep it off the async runtime
        let image = self.image.clone();
        let outcome =
            tokio::task::spawn_blocking(move || resolver.resolve_path(&image)).await?;

        let elapsed = start.elapsed();
        match outcome {
            Outcome::Found(ts) => {
                println!("{}: {}", self.image.display(), ts.format("%Y-%m-%d %H:%M:%S"));
            }
            Outcome::Absent => {
                println!("{}: no timestamp recoverable", self.image.display());
            }
        }
        println!("({elapsed:.2?})");

        Ok(())
    }
}
