//! Agent hand-off session (§4.7 agent hand-off; supplemented from
//! `original_source` — the distilled spec names the entity in prose but
//! doesn't give its schema).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agent_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub phone: String,

    pub status: AgentSessionStatus,
    pub assigned_agent_id: Option<Uuid>,

    pub opened_at: DateTimeUtc,
    pub assigned_at: Option<DateTimeUtc>,
    pub ended_at: Option<DateTimeUtc>,
    pub expires_at: DateTimeUtc,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "agent_session_status")]
pub enum AgentSessionStatus {
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "ended")]
    Ended,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::agent_message::Entity")]
    Messages,
}

impl Related<super::agent_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
