use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(WorkflowTemplateType::Table)
                    .values([
                        WorkflowTemplateType::Button,
                        WorkflowTemplateType::List,
                        WorkflowTemplateType::Text,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkflowTemplates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkflowTemplates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(WorkflowTemplates::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(WorkflowTemplates::TemplateType)
                            .enumeration(
                                WorkflowTemplateType::Table,
                                [
                                    WorkflowTemplateType::Button,
                                    WorkflowTemplateType::List,
                                    WorkflowTemplateType::Text,
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkflowTemplates::TriggerKeywords).json().not_null())
                    .col(ColumnDef::new(WorkflowTemplates::MenuStructure).json().not_null())
                    .col(ColumnDef::new(WorkflowTemplates::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(WorkflowTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WorkflowTemplates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConversationStates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ConversationStates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ConversationStates::Phone).string().not_null().unique_key())
                    .col(ColumnDef::new(ConversationStates::TemplateName).string().not_null())
                    .col(ColumnDef::new(ConversationStates::CurrentStep).string().not_null())
                    .col(ColumnDef::new(ConversationStates::Context).json().not_null())
                    .col(
                        ColumnDef::new(ConversationStates::LastInteraction)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConversationStates::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConversationStates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ConversationStates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_conversation_states_expires_at")
                    .table(ConversationStates::Table)
                    .col(ConversationStates::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(CampaignStatus::Table)
                    .values([
                        CampaignStatus::Draft,
                        CampaignStatus::Active,
                        CampaignStatus::Paused,
                        CampaignStatus::Completed,
                        CampaignStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Campaigns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Campaigns::Name).string().not_null())
                    .col(ColumnDef::new(Campaigns::TemplateName).string().not_null())
                    .col(ColumnDef::new(Campaigns::Language).string().not_null())
                    .col(ColumnDef::new(Campaigns::TemplateComponents).json().not_null())
                    .col(ColumnDef::new(Campaigns::TargetAudience).string().not_null())
                    .col(ColumnDef::new(Campaigns::DailyLimit).integer().not_null())
                    .col(ColumnDef::new(Campaigns::Priority).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Campaigns::Status)
                            .enumeration(
                                CampaignStatus::Table,
                                [
                                    CampaignStatus::Draft,
                                    CampaignStatus::Active,
                                    CampaignStatus::Paused,
                                    CampaignStatus::Completed,
                                    CampaignStatus::Cancelled,
                                ],
                            )
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Campaigns::TotalTarget).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::MessagesSent).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::MessagesDelivered).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::MessagesRead).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::MessagesFailed).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::MessagesPending).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::MessagesSkipped).integer().not_null().default(0))
                    .col(ColumnDef::new(Campaigns::ScheduledStart).date())
                    .col(ColumnDef::new(Campaigns::ScheduledEnd).date())
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(CampaignRecipientStatus::Table)
                    .values([
                        CampaignRecipientStatus::Pending,
                        CampaignRecipientStatus::Queued,
                        CampaignRecipientStatus::Sent,
                        CampaignRecipientStatus::Delivered,
                        CampaignRecipientStatus::Read,
                        CampaignRecipientStatus::Failed,
                        CampaignRecipientStatus::Skipped,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CampaignRecipients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CampaignRecipients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CampaignRecipients::CampaignId).uuid().not_null())
                    .col(ColumnDef::new(CampaignRecipients::Phone).string().not_null())
                    .col(
                        ColumnDef::new(CampaignRecipients::Status)
                            .enumeration(
                                CampaignRecipientStatus::Table,
                                [
                                    CampaignRecipientStatus::Pending,
                                    CampaignRecipientStatus::Queued,
                                    CampaignRecipientStatus::Sent,
                                    CampaignRecipientStatus::Delivered,
                                    CampaignRecipientStatus::Read,
                                    CampaignRecipientStatus::Failed,
                                    CampaignRecipientStatus::Skipped,
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(CampaignRecipients::ScheduledSendDate).date().not_null())
                    .col(ColumnDef::new(CampaignRecipients::WhatsappMessageId).string())
                    .col(ColumnDef::new(CampaignRecipients::RetryCount).integer().not_null().default(0))
                    .col(ColumnDef::new(CampaignRecipients::FailureReason).text())
                    .col(ColumnDef::new(CampaignRecipients::QueuedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CampaignRecipients::SentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CampaignRecipients::DeliveredAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CampaignRecipients::ReadAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CampaignRecipients::FailedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CampaignRecipients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CampaignRecipients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_recipients_campaign_id")
                            .from(CampaignRecipients::Table, CampaignRecipients::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_recipients_unique_phone")
                    .table(CampaignRecipients::Table)
                    .col(CampaignRecipients::CampaignId)
                    .col(CampaignRecipients::Phone)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_recipients_batch")
                    .table(CampaignRecipients::Table)
                    .col(CampaignRecipients::CampaignId)
                    .col(CampaignRecipients::ScheduledSendDate)
                    .col(CampaignRecipients::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(DailyScheduleStatus::Table)
                    .values([
                        DailyScheduleStatus::Pending,
                        DailyScheduleStatus::Processing,
                        DailyScheduleStatus::Completed,
                        DailyScheduleStatus::Failed,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailySchedules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DailySchedules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DailySchedules::CampaignId).uuid().not_null())
                    .col(ColumnDef::new(DailySchedules::SendDate).date().not_null())
                    .col(ColumnDef::new(DailySchedules::BatchSize).integer().not_null())
                    .col(ColumnDef::new(DailySchedules::MessagesRemaining).integer().not_null())
                    .col(ColumnDef::new(DailySchedules::MessagesSent).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(DailySchedules::Status)
                            .enumeration(
                                DailyScheduleStatus::Table,
                                [
                                    DailyScheduleStatus::Pending,
                                    DailyScheduleStatus::Processing,
                                    DailyScheduleStatus::Completed,
                                    DailyScheduleStatus::Failed,
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DailySchedules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DailySchedules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_schedules_campaign_id")
                            .from(DailySchedules::Table, DailySchedules::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_daily_schedules_send_date")
                    .table(DailySchedules::Table)
                    .col(DailySchedules::SendDate)
                    .col(DailySchedules::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(SubscriptionStatus::Table)
                    .values([SubscriptionStatus::Subscribed, SubscriptionStatus::Unsubscribed])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Phone).string().not_null().unique_key())
                    .col(ColumnDef::new(Customers::DisplayName).string())
                    .col(ColumnDef::new(Customers::Tier).string().not_null().default("standard"))
                    .col(ColumnDef::new(Customers::Tags).array(ColumnType::String(StringLen::None)).not_null())
                    .col(
                        ColumnDef::new(Customers::Subscription)
                            .enumeration(
                                SubscriptionStatus::Table,
                                [SubscriptionStatus::Subscribed, SubscriptionStatus::Unsubscribed],
                            )
                            .not_null()
                            .default("subscribed"),
                    )
                    .col(ColumnDef::new(Customers::TotalMessages).integer().not_null().default(0))
                    .col(ColumnDef::new(Customers::LastInteraction).timestamp_with_time_zone())
                    .col(ColumnDef::new(Customers::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(StoredMessageStatus::Table)
                    .values([
                        StoredMessageStatus::Received,
                        StoredMessageStatus::Processed,
                        StoredMessageStatus::Failed,
                        StoredMessageStatus::Sent,
                        StoredMessageStatus::Delivered,
                        StoredMessageStatus::Read,
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(StoredMessageDirection::Table)
                    .values([StoredMessageDirection::Incoming, StoredMessageDirection::Outgoing])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StoredMessages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StoredMessages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(StoredMessages::MessageId).string().not_null().unique_key())
                    .col(ColumnDef::new(StoredMessages::FromPhone).string().not_null())
                    .col(ColumnDef::new(StoredMessages::ToPhone).string().not_null())
                    .col(ColumnDef::new(StoredMessages::MessageType).string().not_null())
                    .col(ColumnDef::new(StoredMessages::Content).json().not_null())
                    .col(ColumnDef::new(StoredMessages::MediaUrl).string())
                    .col(ColumnDef::new(StoredMessages::MediaType).string())
                    .col(
                        ColumnDef::new(StoredMessages::Status)
                            .enumeration(
                                StoredMessageStatus::Table,
                                [
                                    StoredMessageStatus::Received,
                                    StoredMessageStatus::Processed,
                                    StoredMessageStatus::Failed,
                                    StoredMessageStatus::Sent,
                                    StoredMessageStatus::Delivered,
                                    StoredMessageStatus::Read,
                                ],
                            )
                            .not_null()
                            .default("received"),
                    )
                    .col(
                        ColumnDef::new(StoredMessages::Direction)
                            .enumeration(
                                StoredMessageDirection::Table,
                                [StoredMessageDirection::Incoming, StoredMessageDirection::Outgoing],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(StoredMessages::Timestamp).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(StoredMessages::ContextId).string())
                    .col(
                        ColumnDef::new(StoredMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StoredMessages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stored_messages_from_phone")
                    .table(StoredMessages::Table)
                    .col(StoredMessages::FromPhone)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stored_messages_timestamp")
                    .table(StoredMessages::Table)
                    .col(StoredMessages::Timestamp)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stored_messages_direction")
                    .table(StoredMessages::Table)
                    .col(StoredMessages::Direction)
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(AgentSessionStatus::Table)
                    .values([AgentSessionStatus::Waiting, AgentSessionStatus::Active, AgentSessionStatus::Ended])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgentSessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AgentSessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AgentSessions::Phone).string().not_null())
                    .col(
                        ColumnDef::new(AgentSessions::Status)
                            .enumeration(
                                AgentSessionStatus::Table,
                                [AgentSessionStatus::Waiting, AgentSessionStatus::Active, AgentSessionStatus::Ended],
                            )
                            .not_null()
                            .default("waiting"),
                    )
                    .col(ColumnDef::new(AgentSessions::AssignedAgentId).uuid())
                    .col(ColumnDef::new(AgentSessions::OpenedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(AgentSessions::AssignedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(AgentSessions::EndedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(AgentSessions::ExpiresAt).timestamp_with_time_zone().not_null())
                    .col(
                        ColumnDef::new(AgentSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AgentSessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(AgentMessageKind::Table)
                    .values([AgentMessageKind::System, AgentMessageKind::Agent, AgentMessageKind::Customer])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AgentMessages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AgentMessages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AgentMessages::AgentSessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(AgentMessages::Kind)
                            .enumeration(
                                AgentMessageKind::Table,
                                [AgentMessageKind::System, AgentMessageKind::Agent, AgentMessageKind::Customer],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(AgentMessages::Body).text().not_null())
                    .col(
                        ColumnDef::new(AgentMessages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_messages_session_id")
                            .from(AgentMessages::Table, AgentMessages::AgentSessionId)
                            .to(AgentSessions::Table, AgentSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailyBusinessMetrics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DailyBusinessMetrics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DailyBusinessMetrics::MetricDate).date().not_null().unique_key())
                    .col(ColumnDef::new(DailyBusinessMetrics::MessagesReceived).integer().not_null().default(0))
                    .col(ColumnDef::new(DailyBusinessMetrics::MessagesSent).integer().not_null().default(0))
                    .col(ColumnDef::new(DailyBusinessMetrics::DuplicateWebhooks).integer().not_null().default(0))
                    .col(ColumnDef::new(DailyBusinessMetrics::AutomatedReplies).integer().not_null().default(0))
                    .col(ColumnDef::new(DailyBusinessMetrics::ConversationsStarted).integer().not_null().default(0))
                    .col(ColumnDef::new(DailyBusinessMetrics::AgentHandoffs).integer().not_null().default(0))
                    .col(ColumnDef::new(DailyBusinessMetrics::CampaignSends).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(DailyBusinessMetrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DailyBusinessMetrics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DailyBusinessMetrics::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(AgentMessages::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(AgentMessageKind::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(AgentSessions::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(AgentSessionStatus::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(StoredMessages::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(StoredMessageDirection::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(StoredMessageStatus::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Customers::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(SubscriptionStatus::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(DailySchedules::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(DailyScheduleStatus::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CampaignRecipients::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(CampaignRecipientStatus::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Campaigns::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(CampaignStatus::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ConversationStates::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(WorkflowTemplates::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(WorkflowTemplateType::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum WorkflowTemplates {
    Table,
    Id,
    Name,
    TemplateType,
    TriggerKeywords,
    MenuStructure,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WorkflowTemplateType {
    Table,
    Button,
    List,
    Text,
}

#[derive(Iden)]
enum ConversationStates {
    Table,
    Id,
    Phone,
    TemplateName,
    CurrentStep,
    Context,
    LastInteraction,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Campaigns {
    Table,
    Id,
    Name,
    TemplateName,
    Language,
    TemplateComponents,
    TargetAudience,
    DailyLimit,
    Priority,
    Status,
    TotalTarget,
    MessagesSent,
    MessagesDelivered,
    MessagesRead,
    MessagesFailed,
    MessagesPending,
    MessagesSkipped,
    ScheduledStart,
    ScheduledEnd,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CampaignStatus {
    Table,
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
}

#[derive(Iden)]
enum CampaignRecipients {
    Table,
    Id,
    CampaignId,
    Phone,
    Status,
    ScheduledSendDate,
    WhatsappMessageId,
    RetryCount,
    FailureReason,
    QueuedAt,
    SentAt,
    DeliveredAt,
    ReadAt,
    FailedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CampaignRecipientStatus {
    Table,
    Pending,
    Queued,
    Sent,
    Delivered,
    Read,
    Failed,
    Skipped,
}

#[derive(Iden)]
enum DailySchedules {
    Table,
    Id,
    CampaignId,
    SendDate,
    BatchSize,
    MessagesRemaining,
    MessagesSent,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DailyScheduleStatus {
    Table,
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Phone,
    DisplayName,
    Tier,
    Tags,
    Subscription,
    TotalMessages,
    LastInteraction,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SubscriptionStatus {
    Table,
    Subscribed,
    Unsubscribed,
}

#[derive(Iden)]
enum StoredMessages {
    Table,
    Id,
    MessageId,
    FromPhone,
    ToPhone,
    MessageType,
    Content,
    MediaUrl,
    MediaType,
    Status,
    Direction,
    Timestamp,
    ContextId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StoredMessageStatus {
    Table,
    Received,
    Processed,
    Failed,
    Sent,
    Delivered,
    Read,
}

#[derive(Iden)]
enum StoredMessageDirection {
    Table,
    Incoming,
    Outgoing,
}

#[derive(Iden)]
enum AgentSessions {
    Table,
    Id,
    Phone,
    Status,
    AssignedAgentId,
    OpenedAt,
    AssignedAt,
    EndedAt,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AgentSessionStatus {
    Table,
    Waiting,
    Active,
    Ended,
}

#[derive(Iden)]
enum AgentMessages {
    Table,
    Id,
    AgentSessionId,
    Kind,
    Body,
    CreatedAt,
}

#[derive(Iden)]
enum AgentMessageKind {
    Table,
    System,
    Agent,
    Customer,
}

#[derive(Iden)]
enum DailyBusinessMetrics {
    Table,
    Id,
    MetricDate,
    MessagesReceived,
    MessagesSent,
    DuplicateWebhooks,
    AutomatedReplies,
    ConversationsStarted,
    AgentHandoffs,
    CampaignSends,
    CreatedAt,
    UpdatedAt,
}
