//! Incoming-lane job processor (§4.4): claims the dedup record, dispatches
//! by content type to the conversation engine first and the reply engine
//! as fallback, persists the durable row, and reconciles dedup/stored
//! status together so the two never disagree (§8).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use wa_core::conversation::{ConversationEngine, ConversationOutcome};
use wa_core::dedup::{DedupStatus, DedupStore};
use wa_core::queue::{JobProcessor, JobResult, JobType, Lane, MessageContent};
use wa_core::reply::ReplyEngine;
use wa_core::utils::formatting::content_summary;
use wa_db::entities::stored_message::{MessageDirection, StoredMessageStatus};
use wa_db::repositories::daily_business_metric_repository::MetricCounter;
use wa_db::{CustomerRepository, DailyBusinessMetricRepository, StoredMessageRepository};

pub struct IncomingProcessor {
    processor_id: String,
    dedup: Arc<dyn DedupStore>,
    stored_messages: Arc<StoredMessageRepository>,
    customers: Arc<CustomerRepository>,
    daily_metrics: Arc<DailyBusinessMetricRepository>,
    conversation_engine: Arc<ConversationEngine>,
    reply_engine: Arc<ReplyEngine>,
}

impl IncomingProcessor {
    pub fn new(
        dedup: Arc<dyn DedupStore>,
        stored_messages: Arc<StoredMessageRepository>,
        customers: Arc<CustomerRepository>,
        daily_metrics: Arc<DailyBusinessMetricRepository>,
        conversation_engine: Arc<ConversationEngine>,
        reply_engine: Arc<ReplyEngine>,
    ) -> Self {
        Self {
            processor_id: Uuid::new_v4().to_string(),
            dedup,
            stored_messages,
            customers,
            daily_metrics,
            conversation_engine,
            reply_engine,
        }
    }

    async fn handle_message(
        &self,
        wa_message_id: &str,
        from: &str,
        received_at: chrono::DateTime<chrono::Utc>,
        content: &MessageContent,
    ) -> JobResult {
        match self.dedup.claim(wa_message_id, &self.processor_id).await {
            Ok(true) => {}
            Ok(false) => {
                info!(wa_message_id, "incoming processor: claim lost to another owner, dropping envelope");
                return JobResult::Success;
            }
            Err(e) => return JobResult::RetryableFailure(format!("dedup claim failed: {e}")),
        }

        if let Err(e) = self.customers.record_interaction(from).await {
            warn!(error = %e, "failed to record customer interaction");
        }

        let message_type = content_type_label(content);
        if let Err(e) = self
            .stored_messages
            .create(
                wa_message_id.to_string(),
                from.to_string(),
                "business".to_string(),
                message_type.to_string(),
                serde_json::json!({ "summary": content_summary(content) }),
                None,
                None,
                MessageDirection::Incoming,
                received_at,
                None,
            )
            .await
        {
            return JobResult::RetryableFailure(format!("failed to persist inbound message: {e}"));
        }

        let dispatch_result = self.dispatch(from, content).await;

        match dispatch_result {
            Ok(()) => {
                let _ = self
                    .daily_metrics
                    .increment(received_at.date_naive(), MetricCounter::MessagesReceived)
                    .await;
                if let Err(e) = self
                    .dedup
                    .update_status(wa_message_id, DedupStatus::Completed, &self.processor_id, None)
                    .await
                {
                    warn!(error = %e, "failed to mark dedup record completed");
                }
                if let Err(e) = self
                    .stored_messages
                    .set_status(wa_message_id, StoredMessageStatus::Processed)
                    .await
                {
                    warn!(error = %e, "failed to mark stored message processed");
                }
                JobResult::Success
            }
            Err(e) => {
                let message = e.to_string();
                if let Err(e) = self
                    .dedup
                    .update_status(wa_message_id, DedupStatus::Failed, &self.processor_id, Some(&message))
                    .await
                {
                    warn!(error = %e, "failed to mark dedup record failed");
                }
                let _ = self.stored_messages.set_status(wa_message_id, StoredMessageStatus::Failed).await;
                JobResult::RetryableFailure(message)
            }
        }
    }

    async fn dispatch(&self, from: &str, content: &MessageContent) -> wa_core::errors::CoreResult<()> {
        match content {
            MessageContent::Text { body } => {
                let outcome = self.conversation_engine.handle_text(from, body).await?;
                if matches!(outcome, ConversationOutcome::NoMatch) {
                    self.reply_engine.handle(from, body, chrono::Utc::now()).await?;
                }
                if matches!(outcome, ConversationOutcome::AgentHandoffOpened) {
                    let _ = self
                        .daily_metrics
                        .increment(chrono::Utc::now().date_naive(), MetricCounter::AgentHandoffs)
                        .await;
                }
                Ok(())
            }
            MessageContent::InteractiveReply { selection_id } => {
                self.conversation_engine.handle_selection(from, selection_id).await?;
                Ok(())
            }
            // Media and location messages are persisted only; no auto-reply (§4.4).
            MessageContent::Image { .. }
            | MessageContent::Document { .. }
            | MessageContent::Audio { .. }
            | MessageContent::Video { .. }
            | MessageContent::Location { .. }
            | MessageContent::Interactive { .. }
            | MessageContent::Template { .. } => Ok(()),
        }
    }
}

fn content_type_label(content: &MessageContent) -> &'static str {
    match content {
        MessageContent::Text { .. } => "text",
        MessageContent::Image { .. } => "image",
        MessageContent::Document { .. } => "document",
        MessageContent::Audio { .. } => "audio",
        MessageContent::Video { .. } => "video",
        MessageContent::Location { .. } => "location",
        MessageContent::Interactive { .. } => "interactive",
        MessageContent::Template { .. } => "template",
        MessageContent::InteractiveReply { .. } => "interactive",
    }
}

#[async_trait]
impl JobProcessor for IncomingProcessor {
    async fn process(&self, envelope: &wa_core::queue::Envelope) -> JobResult {
        match &envelope.job_type {
            JobType::ProcessIncomingMessage { wa_message_id, from, received_at, content } => {
                self.handle_message(wa_message_id, from, *received_at, content).await
            }
            JobType::UpdateMessageStatus { wa_message_id, status, .. } => {
                match self
                    .stored_messages
                    .set_status(wa_message_id, stored_status_for(*status))
                    .await
                {
                    Ok(_) => JobResult::Success,
                    Err(wa_db::error::DatabaseError::NotFound(_)) => JobResult::Success,
                    Err(e) => JobResult::RetryableFailure(e.to_string()),
                }
            }
            other => JobResult::PermanentFailure(format!("unexpected job type on incoming lane: {other:?}")),
        }
    }

    fn lanes(&self) -> Vec<Lane> {
        vec![Lane::Incoming]
    }
}

fn stored_status_for(status: wa_core::queue::MessageStatus) -> StoredMessageStatus {
    match status {
        wa_core::queue::MessageStatus::Sent => StoredMessageStatus::Sent,
        wa_core::queue::MessageStatus::Delivered => StoredMessageStatus::Delivered,
        wa_core::queue::MessageStatus::Read => StoredMessageStatus::Read,
        wa_core::queue::MessageStatus::Failed => StoredMessageStatus::Failed,
        wa_core::queue::MessageStatus::Queued => StoredMessageStatus::Sent,
    }
}
