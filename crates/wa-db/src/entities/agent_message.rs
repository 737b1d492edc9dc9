//! System/agent messages recorded against an `AgentSession` (assignment
//! and end-of-session notices, §4.7 agent hand-off).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agent_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub agent_session_id: Uuid,

    pub kind: AgentMessageKind,
    pub body: String,

    pub created_at: DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "agent_message_kind")]
pub enum AgentMessageKind {
    #[sea_orm(string_value = "system")]
    System,
    #[sea_orm(string_value = "agent")]
    Agent,
    #[sea_orm(string_value = "customer")]
    Customer,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agent_session::Entity",
        from = "Column::AgentSessionId",
        to = "super::agent_session::Column::Id"
    )]
    AgentSession,
}

impl Related<super::agent_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AgentSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
