//! Workflow template entity: a declarative, data-defined conversation flow
//! (button/list/text menu with steps), distinct from the WhatsApp-approved
//! message templates in `template.rs`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,

    pub template_type: WorkflowTemplateType,

    pub trigger_keywords: Json,

    /// The full menu structure: `{ body, action?, steps }`, validated at
    /// load time by `wa_core::conversation::WorkflowTemplate::validate`.
    pub menu_structure: Json,

    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "workflow_template_type")]
pub enum WorkflowTemplateType {
    #[sea_orm(string_value = "button")]
    Button,
    #[sea_orm(string_value = "list")]
    List,
    #[sea_orm(string_value = "text")]
    Text,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
