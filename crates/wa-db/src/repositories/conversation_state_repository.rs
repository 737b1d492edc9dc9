//! Conversation state repository. Enforces the "only one active state per
//! phone" invariant (§3, §4.7) by deleting any existing row before
//! inserting a new one, and supports the lazy-expiry-on-access pattern.

use crate::entities::conversation_state::{ActiveModel, Column, Entity, Model};
use crate::error::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::Value as Json;
use std::collections::HashMap;
use uuid::Uuid;

pub struct ConversationStateRepository {
    db: DatabaseConnection,
}

impl ConversationStateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch the active state for `phone`, lazily deleting it first if it
    /// has already expired (§4.7 "expired states ... are deleted lazily on
    /// access").
    pub async fn find_active(&self, phone: &str) -> Result<Option<Model>> {
        let existing = Entity::find()
            .filter(Column::Phone.eq(phone))
            .one(&self.db)
            .await?;

        match existing {
            Some(state) if state.expires_at <= chrono::Utc::now() => {
                Entity::delete_by_id(state.id).exec(&self.db).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// End any existing state for `phone` and start a fresh one, as
    /// §4.7 step 1 requires on every template-trigger match.
    pub async fn start(
        &self,
        phone: &str,
        template_name: &str,
        current_step: &str,
        ttl: chrono::Duration,
    ) -> Result<Model> {
        self.end(phone).await?;

        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            phone: Set(phone.to_string()),
            template_name: Set(template_name.to_string()),
            current_step: Set(current_step.to_string()),
            context: Set(Json::Object(Default::default())),
            last_interaction: Set(now),
            expires_at: Set(now + ttl),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn end(&self, phone: &str) -> Result<()> {
        Entity::delete_many()
            .filter(Column::Phone.eq(phone))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Advance `current_step`, merging `context_patch` into the stored
    /// context and refreshing `last_interaction`/`expires_at`.
    pub async fn advance(
        &self,
        phone: &str,
        next_step: &str,
        context_patch: HashMap<String, Json>,
        ttl: chrono::Duration,
    ) -> Result<Model> {
        let existing = self
            .find_active(phone)
            .await?
            .ok_or_else(|| crate::error::DatabaseError::NotFound(format!("conversation state {phone}")))?;

        let mut context: HashMap<String, Json> = existing
            .context
            .as_object()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        context.extend(context_patch);

        let now = chrono::Utc::now();
        let mut active: ActiveModel = existing.into();
        active.current_step = Set(next_step.to_string());
        active.context = Set(serde_json::to_value(context)?);
        active.last_interaction = Set(now);
        active.expires_at = Set(now + ttl);
        active.updated_at = Set(now);
        Ok(active.update(&self.db).await?)
    }

    /// Periodic sweep: delete every row whose `expires_at` has passed.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let res = Entity::delete_many()
            .filter(Column::ExpiresAt.lte(chrono::Utc::now()))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}
