//! Conversation state entity: the per-phone active position in a workflow
//! template's step graph. At most one active row per phone — enforced by
//! the unique index, not just application logic.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversation_states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub phone: String,

    pub template_name: String,

    pub current_step: String,

    pub context: Json,

    pub last_interaction: DateTimeUtc,
    pub expires_at: DateTimeUtc,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
