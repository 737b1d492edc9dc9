//! Customer (spec `User`) repository: subscription lookups gate campaign
//! sends (§4.8); automated replies are ungated (§3 glossary "Subscription").

use crate::entities::customer::{ActiveModel, Column, Entity, Model, SubscriptionStatus};
use crate::error::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Model>> {
        Ok(Entity::find()
            .filter(Column::Phone.eq(phone))
            .one(&self.db)
            .await?)
    }

    /// Upsert-on-interaction: create the customer row on first contact,
    /// otherwise bump `total_messages`/`last_interaction`.
    pub async fn record_interaction(&self, phone: &str) -> Result<Model> {
        let now = chrono::Utc::now();
        match self.find_by_phone(phone).await? {
            Some(existing) => {
                let mut active: ActiveModel = existing.into();
                active.total_messages = Set(active.total_messages.unwrap() + 1);
                active.last_interaction = Set(Some(now));
                active.updated_at = Set(now);
                Ok(active.update(&self.db).await?)
            }
            None => {
                let model = ActiveModel {
                    id: Set(Uuid::new_v4()),
                    phone: Set(phone.to_string()),
                    display_name: Set(None),
                    tier: Set("standard".to_string()),
                    tags: Set(Vec::new()),
                    subscription: Set(SubscriptionStatus::Subscribed),
                    total_messages: Set(1),
                    last_interaction: Set(Some(now)),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                Ok(model.insert(&self.db).await?)
            }
        }
    }

    pub async fn is_subscribed(&self, phone: &str) -> Result<bool> {
        Ok(self
            .find_by_phone(phone)
            .await?
            .map(|c| c.subscription == SubscriptionStatus::Subscribed)
            .unwrap_or(true))
    }
}
