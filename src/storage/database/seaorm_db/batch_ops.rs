use crate::core::batch::{BatchKind, BatchStatus, BatchSummary, ListParams};
use crate::utils::error::{Result, ServiceError};
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, batch, batch_item};
use super::types::{DatabaseBackendType, SeaOrmDatabase};

/// Batch row joined with its item count, as selected by the listing queries
#[derive(Debug, FromQueryResult)]
pub struct BatchWithCount {
    pub id: Uuid,
    pub kind: String,
    pub status: String,
    pub request_payload: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub item_count: i64,
}

impl BatchWithCount {
    pub fn into_summary(self) -> Result<BatchSummary> {
        let kind = BatchKind::from_str(&self.kind)
            .ok_or_else(|| ServiceError::Internal(format!("unknown batch kind: {}", self.kind)))?;
        let status = BatchStatus::from_str(&self.status).ok_or_else(|| {
            ServiceError::Internal(format!("unknown batch status: {}", self.status))
        })?;
        Ok(BatchSummary {
            id: self.id,
            kind,
            status,
            created_at: self.created_at.with_timezone(&chrono::Utc),
            items_count: self.item_count,
            request_payload: self.request_payload,
        })
    }
}

impl SeaOrmDatabase {
    /// Insert a new batch row
    pub async fn create_batch<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: BatchKind,
        status: BatchStatus,
        request_payload: Option<serde_json::Value>,
    ) -> Result<batch::Model> {
        let id = Uuid::new_v4();
        debug!("Creating {} batch: {}", kind.as_str(), id);

        let active_model = batch::ActiveModel {
            id: Set(id),
            kind: Set(kind.as_str().to_string()),
            status: Set(status.as_str().to_string()),
            request_payload: Set(request_payload),
            created_at: Set(chrono::Utc::now().into()),
        };

        active_model.insert(conn).await.map_err(ServiceError::Database)
    }

    /// Fetch a batch of the given kind without locking it
    pub async fn batch_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: BatchKind,
        id: Uuid,
    ) -> Result<Option<batch::Model>> {
        entities::Batch::find_by_id(id)
            .filter(batch::Column::Kind.eq(kind.as_str()))
            .one(conn)
            .await
            .map_err(ServiceError::Database)
    }

    /// Fetch a batch with a blocking row lock.
    ///
    /// On PostgreSQL this is SELECT ... FOR UPDATE and waits for a
    /// concurrent holder. SQLite has no row locks; its single-writer
    /// model already serializes the surrounding transaction.
    pub async fn lock_batch<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: BatchKind,
        id: Uuid,
    ) -> Result<Option<batch::Model>> {
        let mut query = entities::Batch::find_by_id(id).filter(batch::Column::Kind.eq(kind.as_str()));
        if self.backend_type == DatabaseBackendType::PostgreSQL {
            query = query.lock_exclusive();
        }
        query.one(conn).await.map_err(ServiceError::Database)
    }

    /// Fetch a batch with a non-blocking row lock.
    ///
    /// On PostgreSQL a concurrently held lock makes this fail with 55P03
    /// instead of waiting; callers translate that into a conflict. On
    /// SQLite a busy writer surfaces as "database is locked".
    pub async fn lock_batch_nowait<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: BatchKind,
        id: Uuid,
    ) -> Result<Option<batch::Model>> {
        let mut query = entities::Batch::find_by_id(id).filter(batch::Column::Kind.eq(kind.as_str()));
        if self.backend_type == DatabaseBackendType::PostgreSQL {
            query = query.lock_with_behavior(LockType::Update, LockBehavior::Nowait);
        }
        query.one(conn).await.map_err(ServiceError::Database)
    }

    /// Update a batch's lifecycle status
    pub async fn set_batch_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: batch::Model,
        status: BatchStatus,
    ) -> Result<batch::Model> {
        debug!("Updating batch status: {} -> {}", model.id, status.as_str());

        let mut active: batch::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.update(conn).await.map_err(ServiceError::Database)
    }

    /// Delete a batch row. Items are removed by the foreign key cascade,
    /// but SQLite builds may run without foreign_keys enabled, so the
    /// items are deleted explicitly first.
    pub async fn delete_batch<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: batch::Model,
    ) -> Result<()> {
        debug!("Deleting batch: {}", model.id);

        entities::BatchItem::delete_many()
            .filter(batch_item::Column::BatchId.eq(model.id))
            .exec(conn)
            .await
            .map_err(ServiceError::Database)?;

        model.delete(conn).await.map_err(ServiceError::Database)?;
        Ok(())
    }

    /// List batches of one kind, newest first, with their item counts
    pub async fn list_batches(
        &self,
        kind: BatchKind,
        params: ListParams,
    ) -> Result<Vec<BatchWithCount>> {
        let mut query = entities::Batch::find()
            .filter(batch::Column::Kind.eq(kind.as_str()))
            .join(JoinType::LeftJoin, batch::Relation::Items.def())
            .column_as(batch_item::Column::Id.count(), "item_count")
            .group_by(batch::Column::Id)
            .group_by(batch::Column::Kind)
            .group_by(batch::Column::Status)
            .group_by(batch::Column::RequestPayload)
            .group_by(batch::Column::CreatedAt)
            .order_by_desc(batch::Column::CreatedAt)
            .order_by_desc(batch::Column::Id);

        if let Some(status) = params.status {
            query = query.filter(batch::Column::Status.eq(status.as_str()));
        }
        if let Some(limit) = params.limit {
            query = query.limit(limit);
        }
        if let Some(offset) = params.offset {
            query = query.offset(offset);
        }

        query
            .into_model::<BatchWithCount>()
            .all(&self.db)
            .await
            .map_err(ServiceError::Database)
    }

    /// Fetch one batch of the given kind together with its item count
    pub async fn batch_with_count(
        &self,
        kind: BatchKind,
        id: Uuid,
    ) -> Result<Option<BatchWithCount>> {
        entities::Batch::find_by_id(id)
            .filter(batch::Column::Kind.eq(kind.as_str()))
            .join(JoinType::LeftJoin, batch::Relation::Items.def())
            .column_as(batch_item::Column::Id.count(), "item_count")
            .group_by(batch::Column::Id)
            .group_by(batch::Column::Kind)
            .group_by(batch::Column::Status)
            .group_by(batch::Column::RequestPayload)
            .group_by(batch::Column::CreatedAt)
            .into_model::<BatchWithCount>()
            .one(&self.db)
            .await
            .map_err(ServiceError::Database)
    }
}
