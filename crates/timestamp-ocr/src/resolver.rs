//! Orchestration of the recovery pipeline
//!
//! For each proposed region in priority order: crop, normalize, recognize,
//! and match; the first candidate passing the plausibility filter is the
//! result. Per-region failures are absorbed; the only externally visible
//! failure mode is an absent timestamp.

use crate::patterns;
use crate::preprocess::normalize_for_ocr;
use crate::recognize::{Recognize, TesseractRecognizer};
use crate::roi;
use chrono::{Datelike, Local, NaiveDateTime};
use image::RgbImage;
use std::path::Path;
use stamplog_common::image_io::load_image;
use tracing::{debug, error, info, warn};

/// Candidates further than this from the current moment are rejected
pub const PLAUSIBLE_WINDOW_DAYS: i64 = 3650;

/// Forward-dating allowance: a candidate more than this many years in the
/// future is accepted regardless of day distance (guards mis-converted
/// Buddhist-era stamps)
pub const FUTURE_YEAR_ALLOWANCE: i32 = 5;

/// Result of one resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A plausible timestamp was recovered
    Found(NaiveDateTime),
    /// No timestamp is recoverable from this image
    Absent,
}

impl Outcome {
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Outcome::Found(ts) => Some(*ts),
            Outcome::Absent => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

/// Sanity filter on parsed candidates.
///
/// Accepts a candidate within [`PLAUSIBLE_WINDOW_DAYS`] of `now` (exactly at
/// the boundary is rejected), or one whose year is more than
/// [`FUTURE_YEAR_ALLOWANCE`] years ahead of `now`.
pub fn is_plausible(candidate: NaiveDateTime, now: NaiveDateTime) -> bool {
    let days = (now - candidate).num_days().abs();
    days < PLAUSIBLE_WINDOW_DAYS || candidate.year() > now.year() + FUTURE_YEAR_ALLOWANCE
}

/// Timestamp recovery over a single image
///
/// Generic over the recognizer so the search logic is testable without a
/// Tesseract installation; production code uses [`TimestampResolver::new`].
pub struct TimestampResolver<R = TesseractRecognizer> {
    recognizer: R,
}

impl TimestampResolver<TesseractRecognizer> {
    /// Create a resolver backed by the Tesseract recognizer.
    pub fn new() -> Result<Self, crate::recognize::RecognizeError> {
        Ok(Self {
            recognizer: TesseractRecognizer::new()?,
        })
    }
}

impl<R: Recognize> TimestampResolver<R> {
    /// Create a resolver with a custom recognizer implementation.
    pub fn with_recognizer(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Resolve an image file.
    ///
    /// An image that cannot be decoded at all is logged and reported as
    /// [`Outcome::Absent`]; it never aborts the caller.
    pub fn resolve_path(&self, path: &Path) -> Outcome {
        debug!("attempting timestamp extraction from {}", path.display());
        match load_image(path) {
            Ok(image) => self.resolve_image(&image),
            Err(e) => {
                error!("could not load image {}: {e}", path.display());
                Outcome::Absent
            }
        }
    }

    /// Resolve an already decoded image against the current local time.
    pub fn resolve_image(&self, image: &RgbImage) -> Outcome {
        self.resolve_image_at(image, Local::now().naive_local())
    }

    /// Resolve against an explicit clock.
    ///
    /// The search is a short-circuiting scan in (region, pattern, template)
    /// priority order: the first candidate satisfying the plausibility
    /// predicate is returned immediately.
    pub fn resolve_image_at(&self, image: &RgbImage, now: NaiveDateTime) -> Outcome {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            warn!("empty image ({width}x{height})");
            return Outcome::Absent;
        }
        let today = now.date();

        let found = roi::timestamp_regions()
            .iter()
            .enumerate()
            .filter_map(|(index, region)| {
                let rect = region.resolve(width, height)?;
                let roi =
                    image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height)
                        .to_image();
                let normalized = normalize_for_ocr(&roi);
                match self.recognizer.recognize(&normalized) {
                    Ok(recognition) => {
                        debug!(
                            region = index,
                            mode = ?recognition.mode,
                            "extracted text '{}'",
                            recognition.text
                        );
                        Some((index, recognition))
                    }
                    Err(e) => {
                        warn!("recognition failed for region {index}: {e}");
                        None
                    }
                }
            })
            .find_map(|(index, recognition)| {
                patterns::candidates(&recognition.text, today)
                    .find(|candidate| is_plausible(candidate.datetime, now))
                    .map(|candidate| {
                        info!(
                            "recovered timestamp {} from region {index} via pattern '{}'",
                            candidate.datetime, candidate.pattern
                        );
                        candidate.datetime
                    })
            });

        match found {
            Some(datetime) => Outcome::Found(datetime),
            None => {
                warn!("no plausible timestamp in any region");
                Outcome::Absent
            }
        }
    }
}
