//! Database model structs.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an uploaded document.
///
/// Transitions strictly Queued -> Processing -> (Processed | Failed); only
/// the processing worker moves a document past Queued, and a terminal status
/// is never changed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Uploaded and waiting for the processing worker
    Queued,
    /// Picked up by the worker, processing in progress
    Processing,
    /// Processing completed successfully
    Processed,
    /// Processing failed; the error is not retained beyond the logs
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Queued => "queued",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Processed => "processed",
            DocumentStatus::Failed => "failed",
        }
    }

    /// Parse a persisted status string, falling back to `Queued` for
    /// anything unrecognized
    pub fn from_str(s: &str) -> Self {
        match s {
            "queued" => DocumentStatus::Queued,
            "processing" => DocumentStatus::Processing,
            "processed" => DocumentStatus::Processed,
            "failed" => DocumentStatus::Failed,
            other => {
                tracing::warn!(status = %other, "Unknown document status in database, treating as queued");
                DocumentStatus::Queued
            }
        }
    }

    /// Whether no further transitions are allowed
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Processed | DocumentStatus::Failed)
    }
}

/// Document record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub s3_path: String,
    pub upload_time: DateTime<Utc>,
    pub status: DocumentStatus,
}

impl Document {
    pub(crate) fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        let upload_time_str: String = row.get(3)?;
        let status_str: String = row.get(4)?;

        Ok(Self {
            id: row.get(0)?,
            filename: row.get(1)?,
            s3_path: row.get(2)?,
            upload_time: DateTime::parse_from_rfc3339(&upload_time_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| {
                    tracing::warn!(
                        value = %upload_time_str,
                        "Unparseable upload_time in database, substituting current time"
                    );
                    Utc::now()
                }),
            status: DocumentStatus::from_str(&status_str),
        })
    }
}
