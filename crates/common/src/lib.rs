/// Common types and utilities for photo submission logging
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod image_io;

/// Processing errors shared across the workspace
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unreadable image: {0}")]
    UnreadableImage(String),

    #[error("Submitter not allowed: {0}")]
    SubmitterNotAllowed(String),

    #[error("Daily image limit reached: {limit} for {submitter}")]
    DailyLimitReached { submitter: String, limit: u32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<image_io::ImageError> for ProcessingError {
    fn from(err: image_io::ImageError) -> Self {
        ProcessingError::UnreadableImage(err.to_string())
    }
}

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Marker written to the log when no timestamp could be recovered
pub const NOT_AVAILABLE: &str = "N/A";

/// Layout used for every timestamp rendered into the logs
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// One submission as recorded in the durable log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Submitter identity (chat username or numeric id)
    pub submitter: String,

    /// When the transport layer received the image
    #[serde(with = "log_timestamp_serde")]
    pub submitted_at: NaiveDateTime,

    /// Stored image filename (encodes submitter and date)
    pub filename: String,

    /// Timestamp recovered from the image itself, if any
    #[serde(with = "recovered_timestamp_serde")]
    pub image_timestamp: Option<NaiveDateTime>,
}

impl SubmissionRecord {
    /// Render the recovered timestamp the way the log stores it
    #[must_use]
    pub fn image_timestamp_display(&self) -> String {
        match self.image_timestamp {
            Some(ts) => ts.format(TIMESTAMP_LAYOUT).to_string(),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

// Custom serialization so log rows carry "%Y-%m-%d %H:%M:%S" strings
// instead of serde's default RFC 3339 rendering.
mod log_timestamp_serde {
    use super::TIMESTAMP_LAYOUT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(TIMESTAMP_LAYOUT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_LAYOUT).map_err(serde::de::Error::custom)
    }
}

// An absent recovered timestamp is the literal marker "N/A" in the log,
// so a missing value round-trips through the CSV unambiguously.
mod recovered_timestamp_serde {
    use super::{NOT_AVAILABLE, TIMESTAMP_LAYOUT};
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_str(&ts.format(TIMESTAMP_LAYOUT).to_string()),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == NOT_AVAILABLE {
            return Ok(None);
        }
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_LAYOUT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record(recovered: bool) -> SubmissionRecord {
        let submitted_at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        SubmissionRecord {
            submitter: "alice".to_string(),
            submitted_at,
            filename: "alice-log2024-03-15-000001.jpg".to_string(),
            image_timestamp: recovered.then(|| {
                NaiveDate::from_ymd_opt(2024, 3, 14)
                    .unwrap()
                    .and_hms_opt(9, 15, 33)
                    .unwrap()
            }),
        }
    }

    #[test]
    fn test_record_round_trip() {
        let record = sample_record(true);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("2024-03-15 14:30:00"));
        assert!(json.contains("2024-03-14 09:15:33"));

        let back: SubmissionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_missing_timestamp_is_marker() {
        let record = sample_record(false);
        assert_eq!(record.image_timestamp_display(), NOT_AVAILABLE);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"N/A\""));

        let back: SubmissionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.image_timestamp, None);
    }
}
