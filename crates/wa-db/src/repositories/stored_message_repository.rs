//! Stored message repository: the durable record behind the §8 invariant
//! "a StoredMessage exists with status == processed iff its
//! MessageIdRecord.status == completed".

use crate::entities::stored_message::{
    ActiveModel, Column, Entity, MessageDirection, Model, StoredMessageStatus,
};
use crate::error::{DatabaseError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct StoredMessageRepository {
    db: DatabaseConnection,
}

impl StoredMessageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        message_id: String,
        from_phone: String,
        to_phone: String,
        message_type: String,
        content: serde_json::Value,
        media_url: Option<String>,
        media_type: Option<String>,
        direction: MessageDirection,
        timestamp: chrono::DateTime<chrono::Utc>,
        context_id: Option<String>,
    ) -> Result<Model> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            message_id: Set(message_id),
            from_phone: Set(from_phone),
            to_phone: Set(to_phone),
            message_type: Set(message_type),
            content: Set(content),
            media_url: Set(media_url),
            media_type: Set(media_type),
            status: Set(StoredMessageStatus::Received),
            direction: Set(direction),
            timestamp: Set(timestamp),
            context_id: Set(context_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn find_by_message_id(&self, message_id: &str) -> Result<Option<Model>> {
        Ok(Entity::find()
            .filter(Column::MessageId.eq(message_id))
            .one(&self.db)
            .await?)
    }

    pub async fn set_status(&self, message_id: &str, status: StoredMessageStatus) -> Result<Model> {
        let model = self
            .find_by_message_id(message_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("stored message {message_id}")))?;
        let mut active: ActiveModel = model.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());
        Ok(active.update(&self.db).await?)
    }
}
