//! Daily business metric repository: upsert-by-date counters fed by the
//! analytics lane consumer.

use crate::entities::daily_business_metric::{ActiveModel, Column, Entity, Model};
use crate::error::Result;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub enum MetricCounter {
    MessagesReceived,
    MessagesSent,
    DuplicateWebhooks,
    AutomatedReplies,
    ConversationsStarted,
    AgentHandoffs,
    CampaignSends,
}

pub struct DailyBusinessMetricRepository {
    db: DatabaseConnection,
}

impl DailyBusinessMetricRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn increment(&self, date: NaiveDate, counter: MetricCounter) -> Result<Model> {
        let existing = Entity::find()
            .filter(Column::MetricDate.eq(date))
            .one(&self.db)
            .await?;

        let now = chrono::Utc::now();
        let is_new = existing.is_none();
        let mut active: ActiveModel = match existing {
            Some(model) => model.into(),
            None => ActiveModel {
                id: Set(Uuid::new_v4()),
                metric_date: Set(date),
                messages_received: Set(0),
                messages_sent: Set(0),
                duplicate_webhooks: Set(0),
                automated_replies: Set(0),
                conversations_started: Set(0),
                agent_handoffs: Set(0),
                campaign_sends: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
            },
        };

        match counter {
            MetricCounter::MessagesReceived => active.messages_received = Set(field_or(&active.messages_received) + 1),
            MetricCounter::MessagesSent => active.messages_sent = Set(field_or(&active.messages_sent) + 1),
            MetricCounter::DuplicateWebhooks => active.duplicate_webhooks = Set(field_or(&active.duplicate_webhooks) + 1),
            MetricCounter::AutomatedReplies => active.automated_replies = Set(field_or(&active.automated_replies) + 1),
            MetricCounter::ConversationsStarted => active.conversations_started = Set(field_or(&active.conversations_started) + 1),
            MetricCounter::AgentHandoffs => active.agent_handoffs = Set(field_or(&active.agent_handoffs) + 1),
            MetricCounter::CampaignSends => active.campaign_sends = Set(field_or(&active.campaign_sends) + 1),
        }
        active.updated_at = Set(now);

        if is_new {
            Ok(active.insert(&self.db).await?)
        } else {
            Ok(active.update(&self.db).await?)
        }
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Option<Model>> {
        Ok(Entity::find()
            .filter(Column::MetricDate.eq(date))
            .one(&self.db)
            .await?)
    }
}

fn field_or(value: &sea_orm::ActiveValue<i32>) -> i32 {
    match value {
        sea_orm::ActiveValue::Set(v) | sea_orm::ActiveValue::Unchanged(v) => *v,
        sea_orm::ActiveValue::NotSet => 0,
    }
}
