//! `StoredMessage` (§3): the durable row written by the incoming/outgoing
//! processors, keyed by the WhatsApp `message_id` (unique). Distinct from
//! `message.rs`/`whatsapp_message.rs` (teacher CRM thread models keyed by
//! `conversation_id`) — this mirrors the spec's flat shape directly so the
//! invariant "`StoredMessage.status == processed` iff
//! `MessageIdRecord.status == completed`" (§8) has one unambiguous row to
//! apply to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stored_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub message_id: String,

    pub from_phone: String,
    pub to_phone: String,

    pub message_type: String,
    pub content: Json,

    pub media_url: Option<String>,
    pub media_type: Option<String>,

    pub status: StoredMessageStatus,
    pub direction: MessageDirection,

    pub timestamp: DateTimeUtc,
    pub context_id: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stored_message_status")]
pub enum StoredMessageStatus {
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "processed")]
    Processed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "read")]
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "stored_message_direction")]
pub enum MessageDirection {
    #[sea_orm(string_value = "incoming")]
    Incoming,
    #[sea_orm(string_value = "outgoing")]
    Outgoing,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
