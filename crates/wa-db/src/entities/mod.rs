//! SeaORM entity models for WAGateway

pub mod workflow_template;
pub mod conversation_state;
pub mod campaign;
pub mod campaign_recipient;
pub mod daily_schedule;
pub mod agent_session;
pub mod agent_message;
pub mod customer;
pub mod stored_message;
pub mod daily_business_metric;

// Re-export all entities
pub use workflow_template::{
    Model as WorkflowTemplateModel, ActiveModel as WorkflowTemplateActiveModel,
    Entity as WorkflowTemplateEntity, Column as WorkflowTemplateColumn,
    WorkflowTemplateType,
};
pub use conversation_state::{
    Model as ConversationStateModel, ActiveModel as ConversationStateActiveModel,
    Entity as ConversationStateEntity, Column as ConversationStateColumn,
};
pub use campaign::{
    Model as CampaignModel, ActiveModel as CampaignActiveModel,
    Entity as CampaignEntity, Column as CampaignColumn,
    CampaignStatus,
};
pub use campaign_recipient::{
    Model as CampaignRecipientModel, ActiveModel as CampaignRecipientActiveModel,
    Entity as CampaignRecipientEntity, Column as CampaignRecipientColumn,
    CampaignRecipientStatus,
};
pub use daily_schedule::{
    Model as DailyScheduleModel, ActiveModel as DailyScheduleActiveModel,
    Entity as DailyScheduleEntity, Column as DailyScheduleColumn,
    DailyScheduleStatus,
};
pub use agent_session::{
    Model as AgentSessionModel, ActiveModel as AgentSessionActiveModel,
    Entity as AgentSessionEntity, Column as AgentSessionColumn,
    AgentSessionStatus,
};
pub use agent_message::{
    Model as AgentMessageModel, ActiveModel as AgentMessageActiveModel,
    Entity as AgentMessageEntity, Column as AgentMessageColumn,
    AgentMessageKind,
};
pub use customer::{
    Model as CustomerModel, ActiveModel as CustomerActiveModel,
    Entity as CustomerEntity, Column as CustomerColumn,
    SubscriptionStatus,
};
pub use stored_message::{
    Model as StoredMessageModel, ActiveModel as StoredMessageActiveModel,
    Entity as StoredMessageEntity, Column as StoredMessageColumn,
    StoredMessageStatus, MessageDirection as StoredMessageDirection,
};
pub use daily_business_metric::{
    Model as DailyBusinessMetricModel, ActiveModel as DailyBusinessMetricActiveModel,
    Entity as DailyBusinessMetricEntity, Column as DailyBusinessMetricColumn,
};

// Common imports for all entities
pub use sea_orm::entity::prelude::*;
pub use sea_orm::{Set, NotSet, Unchanged};
pub use serde::{Deserialize, Serialize};