//! Campaign scheduler: daily-limit-paced marketing broadcasts (§4.8),
//! grounded on `original_source/backend/app/services/marketing_service.py`
//! and `marketing_repository.py`. Almost all of the bookkeeping invariants
//! already live in [`wa_db::CampaignRepository`]; this module is the thin
//! orchestration layer that walks due schedules once a day and turns each
//! recipient into an outgoing queue job.

use crate::errors::CoreResult;
use crate::queue::{Envelope, JobType, MessageContent, MessageQueue, Priority};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use wa_db::entities::campaign_recipient::{CampaignRecipientStatus, Model as RecipientModel};
use wa_db::{CampaignRepository, CustomerRepository};

/// Summary of one `run_daily` pass over every due schedule, returned for
/// logging/metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyRunReport {
    pub schedules_processed: usize,
    pub enqueued: usize,
    pub skipped_unsubscribed: usize,
    pub skipped_duplicate: usize,
    pub failed: usize,
}

pub struct CampaignScheduler {
    campaigns: Arc<CampaignRepository>,
    customers: Arc<CustomerRepository>,
    queue: Arc<dyn MessageQueue>,
}

impl CampaignScheduler {
    pub fn new(campaigns: Arc<CampaignRepository>, customers: Arc<CustomerRepository>, queue: Arc<dyn MessageQueue>) -> Self {
        Self { campaigns, customers, queue }
    }

    /// Activate a draft campaign: partition its recipients into
    /// `daily_limit`-sized batches starting at `start_date` (§4.8
    /// activation). Thin pass-through to the repository, which owns the
    /// partitioning and idempotency.
    pub async fn activate(&self, campaign_id: Uuid, start_date: NaiveDate) -> CoreResult<()> {
        self.campaigns.activate(campaign_id, start_date).await?;
        Ok(())
    }

    /// Add recipients to a draft campaign, deduplicated by phone.
    pub async fn add_recipients(&self, campaign_id: Uuid, phones: Vec<String>) -> CoreResult<u32> {
        Ok(self.campaigns.add_recipients(campaign_id, phones).await?)
    }

    /// Process every schedule due on `today` (§4.8 "Daily processing,
    /// conceptually run once per calendar day per timezone"): for each due
    /// schedule, pull its batch of recipients (capacity-capped, including
    /// failed-retry fill-in), skip unsubscribed or already-sent recipients,
    /// and enqueue an outgoing job for everyone else.
    pub async fn run_daily(&self, today: NaiveDate) -> CoreResult<DailyRunReport> {
        let mut report = DailyRunReport::default();

        let due = self.campaigns.schedules_due(today).await?;
        for schedule in due {
            report.schedules_processed += 1;
            self.campaigns.mark_schedule_processing(schedule.id).await?;

            let Some(campaign) = self.campaigns.find_by_id(schedule.campaign_id).await? else {
                warn!(campaign_id = %schedule.campaign_id, "campaign scheduler: schedule references missing campaign");
                continue;
            };

            let batch = self
                .campaigns
                .recipients_for_batch(schedule.campaign_id, today, schedule.messages_remaining as u64)
                .await?;

            let mut sent_this_schedule = 0i32;
            for recipient in &batch {
                match self.dispatch_one(&campaign.template_name, &campaign.language, &campaign.template_components, recipient).await {
                    Ok(DispatchOutcome::Enqueued) => {
                        report.enqueued += 1;
                        sent_this_schedule += 1;
                    }
                    Ok(DispatchOutcome::SkippedUnsubscribed) => report.skipped_unsubscribed += 1,
                    Ok(DispatchOutcome::SkippedDuplicate) => report.skipped_duplicate += 1,
                    Err(e) => {
                        warn!(recipient_id = %recipient.id, error = %e, "campaign scheduler: dispatch failed");
                        report.failed += 1;
                    }
                }
            }

            self.campaigns.mark_schedule_completed(schedule.id, sent_this_schedule).await?;
        }

        info!(
            schedules = report.schedules_processed,
            enqueued = report.enqueued,
            skipped_unsubscribed = report.skipped_unsubscribed,
            skipped_duplicate = report.skipped_duplicate,
            failed = report.failed,
            "campaign scheduler: daily run complete"
        );
        Ok(report)
    }

    /// Gate, build, and enqueue (or mark skipped/failed) the outgoing job
    /// for a single recipient (§4.8 daily processing steps 3-5).
    async fn dispatch_one(
        &self,
        template_name: &str,
        language: &str,
        template_components: &serde_json::Value,
        recipient: &RecipientModel,
    ) -> CoreResult<DispatchOutcome> {
        if !self.customers.is_subscribed(&recipient.phone).await? {
            self.campaigns
                .apply_recipient_transition(
                    recipient.id,
                    CampaignRecipientStatus::Skipped,
                    None,
                    Some("unsubscribed".to_string()),
                )
                .await?;
            return Ok(DispatchOutcome::SkippedUnsubscribed);
        }

        if self.campaigns.check_duplicate_send(recipient.campaign_id, &recipient.phone).await? {
            self.campaigns
                .apply_recipient_transition(
                    recipient.id,
                    CampaignRecipientStatus::Skipped,
                    None,
                    Some("duplicate_send".to_string()),
                )
                .await?;
            return Ok(DispatchOutcome::SkippedDuplicate);
        }

        let envelope = Envelope::new(JobType::SendOutgoingMessage {
            to: recipient.phone.clone(),
            content: MessageContent::Template {
                name: template_name.to_string(),
                language: language.to_string(),
                components: template_components.clone(),
            },
            campaign_recipient_id: Some(recipient.id),
        })
        .with_priority(Priority::Low)
        .with_attribute("source", "marketing_campaign")
        .with_attribute("campaign_id", recipient.campaign_id.to_string())
        .with_attribute("recipient_id", recipient.id.to_string());

        match self.queue.enqueue(envelope).await {
            Ok(_) => {
                self.campaigns
                    .apply_recipient_transition(recipient.id, CampaignRecipientStatus::Queued, None, None)
                    .await?;
                Ok(DispatchOutcome::Enqueued)
            }
            Err(e) => {
                self.campaigns
                    .apply_recipient_transition(
                        recipient.id,
                        CampaignRecipientStatus::Failed,
                        None,
                        Some(format!("enqueue failed: {e}")),
                    )
                    .await?;
                Err(e)
            }
        }
    }
}

enum DispatchOutcome {
    Enqueued,
    SkippedUnsubscribed,
    SkippedDuplicate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_run_report_defaults_to_zero() {
        let report = DailyRunReport::default();
        assert_eq!(report.schedules_processed, 0);
        assert_eq!(report.enqueued, 0);
    }
}
