//! Queue types and structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Priority levels for queue messages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

/// The three processing lanes the queue substrate exposes. Each lane is an
/// independent set of Redis keys; a worker only ever polls the lanes its
/// processor declares interest in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Incoming,
    Outgoing,
    Analytics,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Incoming => "incoming",
            Lane::Outgoing => "outgoing",
            Lane::Analytics => "analytics",
        }
    }
}

/// Work carried by a queue envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobType {
    /// A freshly ingested inbound WhatsApp message, dedup-claimed and ready
    /// for the incoming processor to route to the conversation/reply engine.
    ProcessIncomingMessage {
        wa_message_id: String,
        from: String,
        received_at: DateTime<Utc>,
        content: MessageContent,
    },
    /// A status callback (sent/delivered/read/failed) for a previously sent
    /// message, arriving over the same webhook as inbound messages.
    UpdateMessageStatus {
        wa_message_id: String,
        status: MessageStatus,
        timestamp: DateTime<Utc>,
    },
    /// An outbound message to dispatch through the WhatsApp client.
    SendOutgoingMessage {
        to: String,
        content: MessageContent,
        /// Set when this send originated from a campaign batch, so the
        /// outgoing processor can report back into `campaign_recipients`.
        campaign_recipient_id: Option<Uuid>,
    },
    /// A side-channel analytics fact (message counts, response latency,
    /// reply-engine hits) destined for `daily_business_metrics`.
    RecordAnalyticsEvent {
        event_type: String,
        payload: serde_json::Value,
    },
}

impl JobType {
    /// Lane a job belongs to. Enqueue always routes by this, so callers
    /// cannot accidentally place a job on the wrong lane.
    pub fn lane(&self) -> Lane {
        match self {
            JobType::ProcessIncomingMessage { .. } => Lane::Incoming,
            JobType::UpdateMessageStatus { .. } => Lane::Incoming,
            JobType::SendOutgoingMessage { .. } => Lane::Outgoing,
            JobType::RecordAnalyticsEvent { .. } => Lane::Analytics,
        }
    }
}

/// Message content types for queue payloads, shared between the incoming
/// and outgoing lanes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { body: String },
    Image { url: Option<String>, id: Option<String>, caption: Option<String> },
    Document { url: Option<String>, id: Option<String>, filename: Option<String> },
    Audio { url: Option<String>, id: Option<String> },
    Video { url: Option<String>, id: Option<String>, caption: Option<String> },
    Location { latitude: f64, longitude: f64, name: Option<String> },
    Interactive { body: String, buttons: Vec<String> },
    Template { name: String, language: String, components: serde_json::Value },
    /// Inbound-only: a button or list selection on a previously sent
    /// interactive message, carrying the selected option's id (§4.7
    /// "Handling an interactive reply selection_id").
    InteractiveReply { selection_id: String },
}

/// Message delivery status for tracking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Queued,
    Sent,
    Delivered,
    Read,
    Failed,
}

/// An envelope on the wire: the job payload plus the bookkeeping the queue
/// substrate needs (id, lane, priority, attempt count, free-form attributes
/// analogous to SQS message attributes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique envelope id (distinct from any WhatsApp message id carried in
    /// the payload).
    pub id: String,
    pub job_type: JobType,
    pub priority: Priority,
    /// Number of times this envelope has been received and had its
    /// visibility window expire without being deleted or dead-lettered.
    pub receive_count: u32,
    pub max_receive_count: u32,
    pub created_at: DateTime<Utc>,
    /// Earliest time this envelope becomes visible to receivers (delayed
    /// delivery, used by the campaign scheduler to pace sends).
    pub visible_after: DateTime<Utc>,
    pub attributes: HashMap<String, String>,
}

impl Envelope {
    pub fn new(job_type: JobType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            job_type,
            priority: Priority::Normal,
            receive_count: 0,
            max_receive_count: 3,
            created_at: now,
            visible_after: now,
            attributes: HashMap::new(),
        }
    }

    pub fn lane(&self) -> Lane {
        self.job_type.lane()
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_max_receive_count(mut self, max_receive_count: u32) -> Self {
        self.max_receive_count = max_receive_count;
        self
    }

    pub fn with_delay(mut self, delay: chrono::Duration) -> Self {
        self.visible_after = Utc::now() + delay;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether another receive attempt is still allowed before this
    /// envelope is routed to the dead-letter list.
    pub fn can_retry(&self) -> bool {
        self.receive_count < self.max_receive_count
    }
}

/// A received envelope plus the receipt handle needed to delete, extend, or
/// dead-letter it. The handle is only valid while the envelope's current
/// visibility window hasn't elapsed.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub envelope: Envelope,
    pub receipt_handle: String,
}

/// Outcome of a single job's processing, reported by a `JobProcessor` back
/// to the worker loop.
#[derive(Debug)]
pub enum JobResult {
    Success,
    RetryableFailure(String),
    PermanentFailure(String),
}

/// Queue statistics for a single lane.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueueStats {
    pub visible: u64,
    pub in_flight: u64,
    pub delayed: u64,
    pub dead_lettered: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_creation() {
        let envelope = Envelope::new(JobType::ProcessIncomingMessage {
            wa_message_id: "wamid.123".to_string(),
            from: "15550001111".to_string(),
            received_at: Utc::now(),
            content: MessageContent::Text {
                body: "Hello".to_string(),
            },
        });

        assert!(!envelope.id.is_empty());
        assert_eq!(envelope.priority, Priority::Normal);
        assert_eq!(envelope.receive_count, 0);
        assert_eq!(envelope.lane(), Lane::Incoming);
        assert!(envelope.can_retry());
    }

    #[test]
    fn test_lane_routing() {
        assert_eq!(
            JobType::SendOutgoingMessage {
                to: "15550001111".to_string(),
                content: MessageContent::Text { body: "hi".to_string() },
                campaign_recipient_id: None,
            }
            .lane(),
            Lane::Outgoing
        );
        assert_eq!(
            JobType::RecordAnalyticsEvent {
                event_type: "reply_sent".to_string(),
                payload: serde_json::json!({}),
            }
            .lane(),
            Lane::Analytics
        );
    }

    #[test]
    fn test_receive_count_exhaustion() {
        let mut envelope = Envelope::new(JobType::RecordAnalyticsEvent {
            event_type: "x".to_string(),
            payload: serde_json::json!({}),
        })
        .with_max_receive_count(3);

        assert!(envelope.can_retry());
        envelope.receive_count = 3;
        assert!(!envelope.can_retry());
    }
}
