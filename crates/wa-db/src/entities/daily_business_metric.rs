//! Daily business metrics (§4.9 "durable store holding ... daily business
//! metrics"): one row per calendar day, incremented by analytics-lane
//! consumers as a side effect of ingress, reply, conversation, and
//! campaign activity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_business_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub metric_date: Date,

    pub messages_received: i32,
    pub messages_sent: i32,
    pub duplicate_webhooks: i32,
    pub automated_replies: i32,
    pub conversations_started: i32,
    pub agent_handoffs: i32,
    pub campaign_sends: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
