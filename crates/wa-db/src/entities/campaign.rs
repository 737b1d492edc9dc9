//! Marketing campaign entity: a rate-limited, tenant-wide broadcast of a
//! single WhatsApp template to a recipient list, paced at `daily_limit`
//! sends per day (§4.8).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    pub template_name: String,
    pub language: String,

    /// WhatsApp template component values, applied verbatim to every
    /// recipient (personalization beyond this is out of scope).
    pub template_components: Json,

    pub target_audience: String,

    pub daily_limit: i32,
    pub priority: i32,

    pub status: CampaignStatus,

    // Counters. Invariants (maintained transactionally by
    // `CampaignRepository::apply_recipient_transition`):
    //   sent >= delivered >= read
    //   total_target == sent + failed + pending + skipped
    pub total_target: i32,
    pub messages_sent: i32,
    pub messages_delivered: i32,
    pub messages_read: i32,
    pub messages_failed: i32,
    pub messages_pending: i32,
    pub messages_skipped: i32,

    pub scheduled_start: Option<Date>,
    pub scheduled_end: Option<Date>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "campaign_status")]
pub enum CampaignStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::campaign_recipient::Entity")]
    Recipients,
    #[sea_orm(has_many = "super::daily_schedule::Entity")]
    Schedules,
}

impl Related<super::campaign_recipient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipients.def()
    }
}

impl Related<super::daily_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `sent + failed + pending + skipped == total_target` invariant check,
    /// used in tests and as a debug assertion at the repository boundary.
    pub fn counters_balanced(&self) -> bool {
        self.messages_sent + self.messages_failed + self.messages_pending + self.messages_skipped
            == self.total_target
    }
}
