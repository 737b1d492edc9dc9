//! Agent hand-off session repository (§4.7 agent hand-off).

use crate::entities::agent_message::{ActiveModel as MessageActiveModel, AgentMessageKind, Entity as MessageEntity};
use crate::entities::agent_session::{
    ActiveModel, AgentSessionStatus, Column, Entity, Model,
};
use crate::error::{DatabaseError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct AgentSessionRepository {
    db: DatabaseConnection,
}

impl AgentSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a waiting session bound to `phone`, expiring 22h from now
    /// (§4.7 "AgentSession{status=waiting, expires_at=now+22h}").
    pub async fn open(&self, phone: &str) -> Result<Model> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            phone: Set(phone.to_string()),
            status: Set(AgentSessionStatus::Waiting),
            assigned_agent_id: Set(None),
            opened_at: Set(now),
            assigned_at: Set(None),
            ended_at: Set(None),
            expires_at: Set(now + chrono::Duration::hours(22)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn find_waiting_or_active(&self, phone: &str) -> Result<Option<Model>> {
        Ok(Entity::find()
            .filter(Column::Phone.eq(phone))
            .filter(
                sea_orm::Condition::any()
                    .add(Column::Status.eq(AgentSessionStatus::Waiting))
                    .add(Column::Status.eq(AgentSessionStatus::Active)),
            )
            .one(&self.db)
            .await?)
    }

    pub async fn assign(&self, session_id: Uuid, agent_id: Uuid) -> Result<Model> {
        let session = Entity::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("agent session {session_id}")))?;
        let now = chrono::Utc::now();
        let mut active: ActiveModel = session.into();
        active.status = Set(AgentSessionStatus::Active);
        active.assigned_agent_id = Set(Some(agent_id));
        active.assigned_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&self.db).await?;

        self.record_message(session_id, AgentMessageKind::System, "agent assigned").await?;
        Ok(updated)
    }

    pub async fn end(&self, session_id: Uuid) -> Result<Model> {
        let session = Entity::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("agent session {session_id}")))?;
        let now = chrono::Utc::now();
        let mut active: ActiveModel = session.into();
        active.status = Set(AgentSessionStatus::Ended);
        active.ended_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&self.db).await?;

        self.record_message(session_id, AgentMessageKind::System, "session ended").await?;
        Ok(updated)
    }

    async fn record_message(&self, session_id: Uuid, kind: AgentMessageKind, body: &str) -> Result<()> {
        let model = MessageActiveModel {
            id: Set(Uuid::new_v4()),
            agent_session_id: Set(session_id),
            kind: Set(kind),
            body: Set(body.to_string()),
            created_at: Set(chrono::Utc::now()),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    /// Periodic sweep: end every session past its 22h expiry that hasn't
    /// already been ended.
    pub async fn sweep_expired(&self) -> Result<Vec<Uuid>> {
        let expired = Entity::find()
            .filter(Column::ExpiresAt.lte(chrono::Utc::now()))
            .filter(
                sea_orm::Condition::any()
                    .add(Column::Status.eq(AgentSessionStatus::Waiting))
                    .add(Column::Status.eq(AgentSessionStatus::Active)),
            )
            .all(&self.db)
            .await?;

        let mut ended = Vec::new();
        for session in expired {
            self.end(session.id).await?;
            ended.push(session.id);
        }
        Ok(ended)
    }

    pub async fn messages(&self, session_id: Uuid) -> Result<Vec<crate::entities::agent_message::Model>> {
        use crate::entities::agent_message::Column as MsgColumn;
        Ok(MessageEntity::find()
            .filter(MsgColumn::AgentSessionId.eq(session_id))
            .all(&self.db)
            .await?)
    }
}
