//! Outgoing-lane job processor (§4.5): drains the outgoing lane, dispatches
//! to the WhatsApp Cloud API client, persists the sent message, and
//! reports campaign-sourced sends back to `campaign_recipients`. Always
//! returns `RetryableFailure` on a send error — the generic `Worker`'s
//! retry/DLQ bookkeeping (receive-count driven) already implements the
//! "delete after max receives" behavior this symmetric to §4.4 once had
//! as a hand-rolled check.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use wa_core::queue::{Envelope, JobProcessor, JobResult, JobType, Lane, MessageContent};
use wa_core::utils::formatting::content_summary;
use wa_db::entities::stored_message::{MessageDirection, StoredMessageStatus};
use wa_db::repositories::campaign_repository::CampaignRepository;
use wa_db::repositories::daily_business_metric_repository::MetricCounter;
use wa_db::{DailyBusinessMetricRepository, StoredMessageRepository};
use wa_db::entities::campaign_recipient::CampaignRecipientStatus;
use wa_whatsapp::types::{Media, TemplateComponent, TemplateLanguage, TemplateMessage};
use wa_whatsapp::WhatsAppClient;

pub struct OutgoingProcessor {
    whatsapp_client: Arc<WhatsAppClient>,
    stored_messages: Arc<StoredMessageRepository>,
    campaigns: Arc<CampaignRepository>,
    daily_metrics: Arc<DailyBusinessMetricRepository>,
}

impl OutgoingProcessor {
    pub fn new(
        whatsapp_client: Arc<WhatsAppClient>,
        stored_messages: Arc<StoredMessageRepository>,
        campaigns: Arc<CampaignRepository>,
        daily_metrics: Arc<DailyBusinessMetricRepository>,
    ) -> Self {
        Self { whatsapp_client, stored_messages, campaigns, daily_metrics }
    }

    async fn send(&self, to: &str, content: &MessageContent) -> Result<String, wa_whatsapp::WhatsAppError> {
        let response = match content {
            MessageContent::Text { body } => self.whatsapp_client.send_text_message(to, body.as_str()).await?,
            MessageContent::Image { url, id, caption } => match (url, id) {
                (Some(url), _) => {
                    self.whatsapp_client.send_image_url(to, url.as_str(), caption.as_deref()).await?
                }
                (None, Some(id)) => {
                    self.whatsapp_client.send_image_id(to, id.as_str(), caption.as_deref()).await?
                }
                (None, None) => return Err(wa_whatsapp::WhatsAppError::ApiError("image message missing url and id".to_string())),
            },
            MessageContent::Document { url, id, filename } => match (url, id) {
                (Some(url), _) => {
                    self.whatsapp_client
                        .send_document_url(to, url.as_str(), filename.as_deref(), None)
                        .await?
                }
                (None, Some(id)) => {
                    self.whatsapp_client
                        .send_document_id(to, id.as_str(), filename.as_deref(), None)
                        .await?
                }
                (None, None) => return Err(wa_whatsapp::WhatsAppError::ApiError("document message missing url and id".to_string())),
            },
            MessageContent::Audio { url, id } => {
                let media = match url {
                    Some(url) => Media::from_url(url.clone()),
                    None => Media::from_id(id.clone().unwrap_or_default()),
                };
                self.whatsapp_client.send_audio(to, media).await?
            }
            MessageContent::Video { url, id, caption } => {
                let mut media = match url {
                    Some(url) => Media::from_url(url.clone()),
                    None => Media::from_id(id.clone().unwrap_or_default()),
                };
                if let Some(caption) = caption {
                    media = media.with_caption(caption.clone());
                }
                self.whatsapp_client.send_video(to, media).await?
            }
            MessageContent::Location { latitude, longitude, name } => {
                self.whatsapp_client
                    .send_location(to, *latitude, *longitude, name.clone(), None)
                    .await?
            }
            MessageContent::Interactive { body, buttons } => {
                let buttons = buttons
                    .iter()
                    .enumerate()
                    .map(|(i, label)| (format!("opt_{i}"), label.clone()))
                    .collect();
                self.whatsapp_client.send_interactive_buttons(to, body, buttons).await?
            }
            MessageContent::Template { name, language, components } => {
                let parsed_components: Option<Vec<TemplateComponent>> =
                    serde_json::from_value(components.clone()).ok();
                let template = TemplateMessage {
                    name: name.clone(),
                    language: TemplateLanguage { code: language.clone(), policy: None },
                    components: parsed_components,
                };
                self.whatsapp_client.send_template_message(to, template).await?
            }
            MessageContent::InteractiveReply { .. } => {
                return Err(wa_whatsapp::WhatsAppError::ApiError(
                    "interactive_reply is inbound-only and cannot be sent".to_string(),
                ))
            }
        };

        Ok(response.message_id().unwrap_or_default().to_string())
    }
}

#[async_trait]
impl JobProcessor for OutgoingProcessor {
    async fn process(&self, envelope: &Envelope) -> JobResult {
        let JobType::SendOutgoingMessage { to, content, campaign_recipient_id } = &envelope.job_type else {
            return JobResult::PermanentFailure(format!(
                "unexpected job type on outgoing lane: {:?}",
                envelope.job_type
            ));
        };

        match self.send(to, content).await {
            Ok(wa_message_id) => {
                let wa_message_id = if wa_message_id.is_empty() {
                    format!("unknown-{}", Uuid::new_v4())
                } else {
                    wa_message_id
                };

                if let Err(e) = self
                    .stored_messages
                    .create(
                        wa_message_id.clone(),
                        "business".to_string(),
                        to.clone(),
                        content_type_label(content).to_string(),
                        serde_json::json!({ "summary": content_summary(content) }),
                        None,
                        None,
                        MessageDirection::Outgoing,
                        chrono::Utc::now(),
                        None,
                    )
                    .await
                {
                    warn!(error = %e, "failed to persist outgoing message");
                }

                if let Some(recipient_id) = campaign_recipient_id {
                    if let Err(e) = self
                        .campaigns
                        .apply_recipient_transition(
                            *recipient_id,
                            CampaignRecipientStatus::Sent,
                            Some(wa_message_id),
                            None,
                        )
                        .await
                    {
                        warn!(error = %e, "failed to record campaign recipient transition");
                    }
                    let _ = self
                        .daily_metrics
                        .increment(chrono::Utc::now().date_naive(), MetricCounter::CampaignSends)
                        .await;
                }

                let _ = self
                    .daily_metrics
                    .increment(chrono::Utc::now().date_naive(), MetricCounter::MessagesSent)
                    .await;

                JobResult::Success
            }
            Err(e) => {
                warn!(error = %e, to = %to, "outgoing send failed");

                if let Some(recipient_id) = campaign_recipient_id {
                    if !envelope.can_retry() {
                        let _ = self
                            .campaigns
                            .apply_recipient_transition(
                                *recipient_id,
                                CampaignRecipientStatus::Failed,
                                None,
                                Some(e.to_string()),
                            )
                            .await;
                    }
                }

                JobResult::RetryableFailure(e.to_string())
            }
        }
    }

    fn lanes(&self) -> Vec<Lane> {
        vec![Lane::Outgoing]
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
