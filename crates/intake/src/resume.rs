//! Resume scan: find stored images a previous run never recorded
//!
//! On startup the image root is walked for image files whose filenames are
//! absent from the submission log; each one is re-submitted through the same
//! worker pool as a fresh submission, with the submitter read back out of
//! the filename convention.

use crate::store::parse_submitter;
use crate::worker::SubmissionJob;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extensions treated as stored images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Submitter used when a filename does not follow the naming convention
pub const UNKNOWN_SUBMITTER: &str = "unknown";

/// Recursively collect image files under `image_root` whose filenames are
/// not in `recorded`. Results are sorted for a stable processing order.
pub fn find_unrecorded_images(
    image_root: &Path,
    recorded: &HashSet<String>,
) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if !image_root.exists() {
        debug!("image root {} does not exist yet", image_root.display());
        return Ok(found);
    }
    walk(image_root, recorded, &mut found)?;
    found.sort();
    info!(
        "resume scan found {} unrecorded image(s) under {}",
        found.len(),
        image_root.display()
    );
    Ok(found)
}

fn walk(dir: &Path, recorded: &HashSet<String>, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, recorded, out)?;
            continue;
        }

        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if !is_image {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        if !recorded.contains(&filename) {
            out.push(path);
        }
    }
    Ok(())
}

/// Turn unrecorded image paths into submission jobs.
///
/// The submitter comes from the filename convention
/// (`<submitter>-log<date>-NNNNNN`), falling back to
/// [`UNKNOWN_SUBMITTER`]; the submission time is the supplied `now`, exactly
/// as if the image had just arrived.
pub fn backfill_jobs(paths: Vec<PathBuf>, now: NaiveDateTime) -> Vec<SubmissionJob> {
    paths
        .into_iter()
        .map(|path| {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let submitter = parse_submitter(&filename)
                .unwrap_or(UNKNOWN_SUBMITTER)
                .to_string();
            SubmissionJob {
                submitter,
                submitted_at: now,
                stored_path: path,
                filename,
            }
        })
        .collect()
}
