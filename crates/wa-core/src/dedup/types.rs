//! Dedup store record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a single `message_id`'s processing attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DedupStatus {
    Received,
    Processing,
    Completed,
    Failed,
}

impl DedupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupStatus::Received => "received",
            DedupStatus::Processing => "processing",
            DedupStatus::Completed => "completed",
            DedupStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "received" => Some(Self::Received),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A dedup record: one per `message_id`, mirroring the original system's
/// DynamoDB item shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageIdRecord {
    pub message_id: String,
    pub processing_id: String,
    pub status: DedupStatus,
    pub processor_id: Option<String>,
    pub webhook_count: u32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of [`super::DedupStore::create_if_absent`].
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// This webhook delivery is the first to see this `message_id`.
    New(MessageIdRecord),
    /// The `message_id` was already recorded; carries the existing record
    /// so callers can log/ack based on its current status.
    Duplicate(MessageIdRecord),
}
