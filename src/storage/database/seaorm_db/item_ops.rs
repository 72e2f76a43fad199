use crate::core::batch::{ItemRecord, ItemStatus};
use crate::utils::error::{Result, ServiceError};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, batch_item};
use super::types::SeaOrmDatabase;

fn record_from_model(model: batch_item::Model) -> Result<ItemRecord> {
    let status = ItemStatus::from_str(&model.status).ok_or_else(|| {
        ServiceError::Internal(format!("unknown item status: {}", model.status))
    })?;
    let messages = serde_json::from_value(model.messages)?;
    Ok(ItemRecord {
        status,
        original: model.original,
        result: model.result,
        messages,
    })
}

impl SeaOrmDatabase {
    /// Insert item rows for a batch, preserving submission order
    pub async fn insert_items<C: ConnectionTrait>(
        &self,
        conn: &C,
        batch_id: Uuid,
        records: &[ItemRecord],
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        debug!("Inserting {} items for batch {}", records.len(), batch_id);

        let mut models = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            models.push(batch_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                batch_id: Set(batch_id),
                position: Set(position as i32),
                status: Set(record.status.as_str().to_string()),
                original: Set(record.original.clone()),
                result: Set(record.result.clone()),
                messages: Set(serde_json::to_value(&record.messages)?),
                created_at: Set(chrono::Utc::now().into()),
            });
        }

        entities::BatchItem::insert_many(models)
            .exec(conn)
            .await
            .map_err(ServiceError::Database)?;
        Ok(())
    }

    /// Remove all items for a batch, returning the number deleted
    pub async fn delete_items<C: ConnectionTrait>(&self, conn: &C, batch_id: Uuid) -> Result<u64> {
        let result = entities::BatchItem::delete_many()
            .filter(batch_item::Column::BatchId.eq(batch_id))
            .exec(conn)
            .await
            .map_err(ServiceError::Database)?;
        Ok(result.rows_affected)
    }

    /// Whether a batch has at least one stored item
    pub async fn has_items<C: ConnectionTrait>(&self, conn: &C, batch_id: Uuid) -> Result<bool> {
        let first = entities::BatchItem::find()
            .filter(batch_item::Column::BatchId.eq(batch_id))
            .limit(1)
            .one(conn)
            .await
            .map_err(ServiceError::Database)?;
        Ok(first.is_some())
    }

    /// Fetch a batch's items in submission order
    pub async fn items_for_batch<C: ConnectionTrait>(
        &self,
        conn: &C,
        batch_id: Uuid,
    ) -> Result<Vec<ItemRecord>> {
        let models = entities::BatchItem::find()
            .filter(batch_item::Column::BatchId.eq(batch_id))
            .order_by_asc(batch_item::Column::Position)
            .all(conn)
            .await
            .map_err(ServiceError::Database)?;

        models.into_iter().map(record_from_model).collect()
    }
}
