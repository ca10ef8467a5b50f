//! Timestamp recovery from burned-in photo overlays
//!
//! This crate locates and parses the human-readable capture timestamp that
//! many cameras and phone apps burn into photographs. It proposes a ranked
//! set of candidate regions, normalizes each region for character
//! recognition, runs Tesseract over it with a constrained character set, and
//! matches the extracted text against an ordered catalog of date/time
//! notations (including Thai Buddhist-calendar forms).
//!
//! # Features
//! - Prior-ranked region proposal (corners first, full frame last)
//! - CLAHE + adaptive threshold + deskew normalization pipeline
//! - Two-pass Tesseract recognition (digit whitelist, Thai-script fallback)
//! - 13-entry date/time notation catalog with Buddhist-era correction
//! - First-acceptable-candidate resolution with a plausibility filter
//!
//! # Example
//! ```no_run
//! use stamplog_timestamp_ocr::{Outcome, TimestampResolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = TimestampResolver::new()?;
//!
//! match resolver.resolve_path(std::path::Path::new("photo.jpg")) {
//!     Outcome::Found(ts) => println!("captured at {ts}"),
//!     Outcome::Absent => println!("no timestamp recoverable"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod patterns;
pub mod preprocess;
pub mod recognize;
pub mod resolver;
pub mod roi;

pub use patterns::{candidates, catalog, era_correct_year, match_text, Candidate, DateTimePattern};
pub use preprocess::normalize_for_ocr;
pub use recognize::{CharsetMode, Recognition, Recognize, RecognizeError, TesseractRecognizer};
pub use resolver::{is_plausible, Outcome, TimestampResolver};
pub use roi::{timestamp_regions, PixelRect, Region};
