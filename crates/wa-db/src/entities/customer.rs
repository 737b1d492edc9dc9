//! The spec's `User` entity (§3): a WhatsApp end customer keyed by phone
//! number, distinct from `user.rs` (a staff/admin login account) and from
//! `contact.rs` (the teacher's CRM contact-sync record). Tracks tier, tags,
//! and subscription status for reply/campaign gating.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub phone: String,

    pub display_name: Option<String>,
    pub tier: String,
    pub tags: Vec<String>,

    pub subscription: SubscriptionStatus,

    pub total_messages: i32,
    pub last_interaction: Option<DateTimeUtc>,
    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "subscription_status")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "subscribed")]
    Subscribed,
    #[sea_orm(string_value = "unsubscribed")]
    Unsubscribed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
