//! Campaign repository: activation partitioning, daily batch composition,
//! and the single-transaction recipient status transitions that keep the
//! campaign counter invariants in §3/§4.8 intact.

use crate::entities::campaign::{
    ActiveModel as CampaignActiveModel, Column as CampaignColumn, Entity as CampaignEntity,
    Model as CampaignModel, CampaignStatus,
};
use crate::entities::campaign_recipient::{
    ActiveModel as RecipientActiveModel, Column as RecipientColumn, Entity as RecipientEntity,
    Model as RecipientModel, CampaignRecipientStatus,
};
use crate::entities::daily_schedule::{
    ActiveModel as ScheduleActiveModel, Column as ScheduleColumn, Entity as ScheduleEntity,
    Model as ScheduleModel, DailyScheduleStatus,
};
use crate::error::{DatabaseError, Result};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

pub struct CampaignRepository {
    db: DatabaseConnection,
}

impl CampaignRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_draft(
        &self,
        name: String,
        template_name: String,
        language: String,
        template_components: serde_json::Value,
        target_audience: String,
        daily_limit: i32,
        priority: i32,
    ) -> Result<CampaignModel> {
        let now = Utc::now();
        let model = CampaignActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            template_name: Set(template_name),
            language: Set(language),
            template_components: Set(template_components),
            target_audience: Set(target_audience),
            daily_limit: Set(daily_limit),
            priority: Set(priority),
            status: Set(CampaignStatus::Draft),
            total_target: Set(0),
            messages_sent: Set(0),
            messages_delivered: Set(0),
            messages_read: Set(0),
            messages_failed: Set(0),
            messages_pending: Set(0),
            messages_skipped: Set(0),
            scheduled_start: Set(None),
            scheduled_end: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignModel>> {
        Ok(CampaignEntity::find_by_id(id).one(&self.db).await?)
    }

    /// Insert recipients not already present for `(campaign, phone)`;
    /// bump `total_target`/`messages_pending` by the count actually
    /// inserted (§4.8 "filters out phones already present").
    pub async fn add_recipients(&self, campaign_id: Uuid, phones: Vec<String>) -> Result<u32> {
        let txn = self.db.begin().await?;

        let existing: std::collections::HashSet<String> = RecipientEntity::find()
            .filter(RecipientColumn::CampaignId.eq(campaign_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|r| r.phone)
            .collect();

        let mut inserted = 0u32;
        let now = Utc::now();
        for phone in phones {
            if existing.contains(&phone) {
                continue;
            }
            let model = RecipientActiveModel {
                id: Set(Uuid::new_v4()),
                campaign_id: Set(campaign_id),
                phone: Set(phone),
                status: Set(CampaignRecipientStatus::Pending),
                scheduled_send_date: Set(now.date_naive()),
                whatsapp_message_id: Set(None),
                retry_count: Set(0),
                failure_reason: Set(None),
                queued_at: Set(None),
                sent_at: Set(None),
                delivered_at: Set(None),
                read_at: Set(None),
                failed_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            model.insert(&txn).await?;
            inserted += 1;
        }

        if inserted > 0 {
            if let Some(campaign) = CampaignEntity::find_by_id(campaign_id).one(&txn).await? {
                let mut active: CampaignActiveModel = campaign.into();
                active.total_target = Set(active.total_target.unwrap() + inserted as i32);
                active.messages_pending = Set(active.messages_pending.unwrap() + inserted as i32);
                active.updated_at = Set(now);
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(inserted)
    }

    /// Partition pending recipients into contiguous `daily_limit`-sized
    /// chunks starting at `start_date`, create one `DailySchedule` per
    /// chunk, and move the campaign to `active` (§4.8 activation).
    ///
    /// Idempotent when called again on an already-active campaign with the
    /// same `start_date`: existing schedules for this campaign are left
    /// untouched and no new ones are created (§8 round-trip law).
    pub async fn activate(&self, campaign_id: Uuid, start_date: NaiveDate) -> Result<CampaignModel> {
        let txn = self.db.begin().await?;

        let campaign = CampaignEntity::find_by_id(campaign_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("campaign {campaign_id}")))?;

        if campaign.status == CampaignStatus::Active {
            txn.commit().await?;
            return Ok(campaign);
        }

        if campaign.total_target == 0 {
            return Err(DatabaseError::ValidationError(
                "campaign has no recipients; cannot activate".to_string(),
            ));
        }

        let pending: Vec<RecipientModel> = RecipientEntity::find()
            .filter(RecipientColumn::CampaignId.eq(campaign_id))
            .filter(RecipientColumn::Status.eq(CampaignRecipientStatus::Pending))
            .order_by_asc(RecipientColumn::CreatedAt)
            .all(&txn)
            .await?;

        let daily_limit = campaign.daily_limit.max(1) as usize;
        let chunk_count = (pending.len() + daily_limit - 1) / daily_limit;

        for (chunk_index, chunk) in pending.chunks(daily_limit).enumerate() {
            let send_date = start_date + chrono::Duration::days(chunk_index as i64);
            let now = Utc::now();

            for recipient in chunk {
                let mut active: RecipientActiveModel = recipient.clone().into();
                active.scheduled_send_date = Set(send_date);
                active.updated_at = Set(now);
                active.update(&txn).await?;
            }

            let schedule = ScheduleActiveModel {
                id: Set(Uuid::new_v4()),
                campaign_id: Set(campaign_id),
                send_date: Set(send_date),
                batch_size: Set(chunk.len() as i32),
                messages_remaining: Set(chunk.len() as i32),
                messages_sent: Set(0),
                status: Set(DailyScheduleStatus::Pending),
                created_at: Set(now),
                updated_at: Set(now),
            };
            schedule.insert(&txn).await?;
        }

        let scheduled_end = start_date + chrono::Duration::days(chunk_count.saturating_sub(1) as i64);

        let mut active: CampaignActiveModel = campaign.into();
        active.status = Set(CampaignStatus::Active);
        active.scheduled_start = Set(Some(start_date));
        active.scheduled_end = Set(Some(scheduled_end));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn schedules_due(&self, send_date: NaiveDate) -> Result<Vec<ScheduleModel>> {
        Ok(ScheduleEntity::find()
            .filter(ScheduleColumn::SendDate.eq(send_date))
            .filter(
                Condition::any()
                    .add(ScheduleColumn::Status.eq(DailyScheduleStatus::Pending))
                    .add(ScheduleColumn::Status.eq(DailyScheduleStatus::Processing)),
            )
            .all(&self.db)
            .await?)
    }

    pub async fn mark_schedule_processing(&self, schedule_id: Uuid) -> Result<ScheduleModel> {
        let schedule = ScheduleEntity::find_by_id(schedule_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("daily schedule {schedule_id}")))?;
        let mut active: ScheduleActiveModel = schedule.into();
        active.status = Set(DailyScheduleStatus::Processing);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn mark_schedule_completed(&self, schedule_id: Uuid, messages_sent: i32) -> Result<ScheduleModel> {
        let schedule = ScheduleEntity::find_by_id(schedule_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("daily schedule {schedule_id}")))?;
        let mut active: ScheduleActiveModel = schedule.into();
        active.status = Set(DailyScheduleStatus::Completed);
        active.messages_sent = Set(messages_sent);
        active.messages_remaining = Set(0);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    /// Pending recipients scheduled for `send_date`, up to `limit`, plus
    /// failed recipients eligible for retry filling the remaining capacity
    /// (§4.8 daily processing step 2). Failed recipients are reset to
    /// `pending` as part of this read (the explicit retry-reset transition
    /// named in §3).
    pub async fn recipients_for_batch(
        &self,
        campaign_id: Uuid,
        send_date: NaiveDate,
        limit: u64,
    ) -> Result<Vec<RecipientModel>> {
        let txn = self.db.begin().await?;

        let mut batch: Vec<RecipientModel> = RecipientEntity::find()
            .filter(RecipientColumn::CampaignId.eq(campaign_id))
            .filter(RecipientColumn::ScheduledSendDate.eq(send_date))
            .filter(RecipientColumn::Status.eq(CampaignRecipientStatus::Pending))
            .order_by_asc(RecipientColumn::CreatedAt)
            .limit(limit)
            .all(&txn)
            .await?;

        let remaining = limit.saturating_sub(batch.len() as u64);
        if remaining > 0 {
            let retryable: Vec<RecipientModel> = RecipientEntity::find()
                .filter(RecipientColumn::CampaignId.eq(campaign_id))
                .filter(RecipientColumn::Status.eq(CampaignRecipientStatus::Failed))
                .order_by_asc(RecipientColumn::UpdatedAt)
                .limit(remaining)
                .all(&txn)
                .await?;

            let mut reset = Vec::with_capacity(retryable.len());
            for recipient in retryable {
                let retry_count = recipient.retry_count + 1;
                let mut active = self
                    .transition_recipient(&txn, recipient, CampaignRecipientStatus::Pending, None, None)
                    .await?;
                active.scheduled_send_date = Set(send_date);
                active.retry_count = Set(retry_count);
                reset.push(active.update(&txn).await?);
            }
            batch.extend(reset);
        }

        txn.commit().await?;
        Ok(batch)
    }

    /// `check_duplicate_send` (§4.8): true if any recipient for this
    /// `(campaign, phone)` has already reached `sent`/`delivered`/`read`.
    pub async fn check_duplicate_send(&self, campaign_id: Uuid, phone: &str) -> Result<bool> {
        let found = RecipientEntity::find()
            .filter(RecipientColumn::CampaignId.eq(campaign_id))
            .filter(RecipientColumn::Phone.eq(phone))
            .filter(
                Condition::any()
                    .add(RecipientColumn::Status.eq(CampaignRecipientStatus::Sent))
                    .add(RecipientColumn::Status.eq(CampaignRecipientStatus::Delivered))
                    .add(RecipientColumn::Status.eq(CampaignRecipientStatus::Read)),
            )
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn find_recipient(&self, recipient_id: Uuid) -> Result<Option<RecipientModel>> {
        Ok(RecipientEntity::find_by_id(recipient_id).one(&self.db).await?)
    }

    /// Single-transaction recipient status change that also adjusts the
    /// parent campaign's counters, so readers never observe an
    /// intermediate state that violates `sent >= delivered >= read` or the
    /// `sent + failed + pending + skipped == total_target` balance (§3,
    /// §9 "counter invariants").
    pub async fn apply_recipient_transition(
        &self,
        recipient_id: Uuid,
        new_status: CampaignRecipientStatus,
        whatsapp_message_id: Option<String>,
        failure_reason: Option<String>,
    ) -> Result<RecipientModel> {
        let txn = self.db.begin().await?;

        let recipient = RecipientEntity::find_by_id(recipient_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("campaign recipient {recipient_id}")))?;

        let active = self
            .transition_recipient(&txn, recipient, new_status, whatsapp_message_id, failure_reason)
            .await?;
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Core of `apply_recipient_transition`, factored out so
    /// `recipients_for_batch`'s retry-reset (`failed -> pending`, §3
    /// "explicit retry reset") can adjust the same campaign counters inside
    /// its own transaction instead of writing the recipient row directly and
    /// leaving `messages_failed`/`messages_pending` stale. Adjusts the
    /// parent campaign's counters and returns the recipient's `ActiveModel`
    /// with the new status (and touched timestamp) set but not yet saved, so
    /// callers can layer on additional field writes (e.g.
    /// `scheduled_send_date`, `retry_count`) before calling `.update(&txn)`.
    async fn transition_recipient(
        &self,
        txn: &DatabaseTransaction,
        recipient: RecipientModel,
        new_status: CampaignRecipientStatus,
        whatsapp_message_id: Option<String>,
        failure_reason: Option<String>,
    ) -> Result<RecipientActiveModel> {
        let old_status = recipient.status;

        let campaign = CampaignEntity::find_by_id(recipient.campaign_id)
            .one(txn)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("campaign {}", recipient.campaign_id)))?;

        let mut campaign_active: CampaignActiveModel = campaign.clone().into();
        let mut pending = campaign.messages_pending;
        let mut sent = campaign.messages_sent;
        let mut delivered = campaign.messages_delivered;
        let mut read = campaign.messages_read;
        let mut failed = campaign.messages_failed;
        let mut skipped = campaign.messages_skipped;

        // Decrement whichever bucket the recipient is leaving.
        match old_status {
            CampaignRecipientStatus::Pending | CampaignRecipientStatus::Queued => pending -= 1,
            CampaignRecipientStatus::Failed => failed -= 1,
            CampaignRecipientStatus::Skipped => skipped -= 1,
            CampaignRecipientStatus::Sent | CampaignRecipientStatus::Delivered | CampaignRecipientStatus::Read => {}
        }

        // Increment every bucket the recipient passes through on the way
        // to the new status (e.g. pending -> delivered increments both
        // `sent` and `delivered`, per §4.8).
        let passes_sent = !old_status.counts_as_sent() && new_status.counts_as_sent();
        match new_status {
            CampaignRecipientStatus::Pending => pending += 1,
            CampaignRecipientStatus::Queued => pending += 1,
            CampaignRecipientStatus::Failed => failed += 1,
            CampaignRecipientStatus::Skipped => skipped += 1,
            CampaignRecipientStatus::Sent => {
                if passes_sent {
                    sent += 1;
                }
            }
            CampaignRecipientStatus::Delivered => {
                if passes_sent {
                    sent += 1;
                }
                delivered += 1;
            }
            CampaignRecipientStatus::Read => {
                if passes_sent {
                    sent += 1;
                }
                if !matches!(old_status, CampaignRecipientStatus::Delivered | CampaignRecipientStatus::Read) {
                    delivered += 1;
                }
                if !matches!(old_status, CampaignRecipientStatus::Read) {
                    read += 1;
                }
            }
        }

        campaign_active.messages_pending = Set(pending);
        campaign_active.messages_sent = Set(sent);
        campaign_active.messages_delivered = Set(delivered);
        campaign_active.messages_read = Set(read);
        campaign_active.messages_failed = Set(failed);
        campaign_active.messages_skipped = Set(skipped);
        campaign_active.updated_at = Set(Utc::now());

        if pending == 0 && campaign.status == CampaignStatus::Active {
            campaign_active.status = Set(CampaignStatus::Completed);
        }
        campaign_active.update(txn).await?;

        let now = Utc::now();
        let mut recipient_active: RecipientActiveModel = recipient.into();
        recipient_active.status = Set(new_status);
        recipient_active.updated_at = Set(now);
        if let Some(id) = whatsapp_message_id {
            recipient_active.whatsapp_message_id = Set(Some(id));
        }
        if let Some(reason) = failure_reason {
            recipient_active.failure_reason = Set(Some(reason));
        }
        match new_status {
            CampaignRecipientStatus::Queued => recipient_active.queued_at = Set(Some(now)),
            CampaignRecipientStatus::Sent => recipient_active.sent_at = Set(Some(now)),
            CampaignRecipientStatus::Delivered => recipient_active.delivered_at = Set(Some(now)),
            CampaignRecipientStatus::Read => recipient_active.read_at = Set(Some(now)),
            CampaignRecipientStatus::Failed => recipient_active.failed_at = Set(Some(now)),
            _ => {}
        }
        Ok(recipient_active)
    }
}
