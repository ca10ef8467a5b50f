//! Text recognition over normalized region buffers using Tesseract 5.x
//!
//! Two passes: a single-text-line pass restricted to digits and date/time
//! punctuation, then (when that yields nothing usable) a general-block pass
//! with a Thai-script whitelist and the `tha+eng` language pair for
//! Buddhist-calendar overlays.

use image::GrayImage;
use leptess::{LepTess, Variable};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Character inventory for the primary constrained pass
pub const PRIMARY_WHITELIST: &str = "0123456789-:/,. ";

/// Fallback inventory: digits, date/time punctuation, and the Thai script
/// characters that appear in month abbreviations and the long date phrase
/// (`เวลา ... น.`).
pub const EXTENDED_WHITELIST: &str = "0123456789-:/,. \
     กขคฆงจฉชซญฎฏฐณดตถทธนบปผฝพฟภมยรลวศษสหอฮ\
     ะัาำิีึืุูเแโใไ็่้๊๋์ๆฯ";

/// Tesseract language model for the primary pass
pub const PRIMARY_LANGUAGE: &str = "eng";

/// Tesseract language model for the fallback pass
pub const FALLBACK_LANGUAGE: &str = "tha+eng";

/// Page segmentation: treat the region as a single text line
const PSM_SINGLE_LINE: u32 = 7;

/// Page segmentation: assume a uniform block of text
const PSM_BLOCK: u32 = 6;

/// Which character-set mode produced a recognition result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetMode {
    /// Constrained digit/punctuation single-line pass
    Primary,
    /// Thai-extended general-block fallback pass
    Extended,
}

/// Raw extracted text plus the pass that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub text: String,
    pub mode: CharsetMode,
}

/// Errors that can occur during text recognition
#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("Failed to initialize Tesseract: {0}")]
    InitError(String),

    #[error("Failed to run OCR: {0}")]
    RecognitionError(String),

    #[error("Invalid image dimensions: {0}x{1}")]
    InvalidImageDimensions(u32, u32),
}

/// Text extraction over a normalized single-channel buffer.
///
/// The production implementation drives Tesseract; tests substitute scripted
/// implementations to exercise the resolver without an OCR engine.
pub trait Recognize {
    fn recognize(&self, image: &GrayImage) -> Result<Recognition, RecognizeError>;
}

/// Tesseract-backed recognizer
pub struct TesseractRecognizer {
    _private: (),
}

impl TesseractRecognizer {
    /// Create a recognizer, verifying that Tesseract and both language
    /// models can actually be initialized.
    pub fn new() -> Result<Self, RecognizeError> {
        for language in [PRIMARY_LANGUAGE, FALLBACK_LANGUAGE] {
            LepTess::new(None, language).map_err(|e| {
                RecognizeError::InitError(format!(
                    "Failed to initialize Tesseract with language '{}': {}. \
                     Make sure the language data is installed \
                     (e.g. 'apt install tesseract-ocr-tha')",
                    language, e
                ))
            })?;
        }
        Ok(Self { _private: () })
    }

    fn run_pass(
        png: &[u8],
        language: &str,
        psm: u32,
        whitelist: &str,
    ) -> Result<String, RecognizeError> {
        let mut lt = LepTess::new(None, language)
            .map_err(|e| RecognizeError::InitError(format!("Failed to initialize Tesseract: {e}")))?;

        lt.set_variable(Variable::TesseditPagesegMode, &psm.to_string())
            .map_err(|e| RecognizeError::InitError(format!("Failed to set PSM: {e}")))?;
        lt.set_variable(Variable::TesseditCharWhitelist, whitelist)
            .map_err(|e| RecognizeError::InitError(format!("Failed to set whitelist: {e}")))?;

        lt.set_image_from_mem(png).map_err(|e| {
            RecognizeError::RecognitionError(format!("Failed to set image from memory: {e}"))
        })?;

        let text = lt
            .get_utf8_text()
            .map_err(|e| RecognizeError::RecognitionError(format!("Failed to read text: {e}")))?;
        Ok(text.trim().to_string())
    }
}

impl Recognize for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<Recognition, RecognizeError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RecognizeError::InvalidImageDimensions(width, height));
        }

        // leptess expects encoded image data
        let mut png_buf = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut png_buf, image::ImageFormat::Png)
            .map_err(|e| {
                RecognizeError::RecognitionError(format!("Failed to encode image to PNG: {e}"))
            })?;
        let png = png_buf.get_ref();

        let text = Self::run_pass(png, PRIMARY_LANGUAGE, PSM_SINGLE_LINE, PRIMARY_WHITELIST)?;
        if !text.is_empty() && text.chars().any(|c| c.is_ascii_digit()) {
            debug!("primary OCR pass extracted '{text}'");
            return Ok(Recognition {
                text,
                mode: CharsetMode::Primary,
            });
        }

        // No usable digits: retry as a text block with the Thai inventory.
        // The fallback result is used as-is, digits or not.
        let text = Self::run_pass(png, FALLBACK_LANGUAGE, PSM_BLOCK, EXTENDED_WHITELIST)?;
        debug!("fallback OCR pass extracted '{text}'");
        Ok(Recognition {
            text,
            mode: CharsetMode::Extended,
        })
    }
}
