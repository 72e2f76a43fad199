use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::address::{Diagnostic, Transform};
use crate::core::batch::types::{
    BatchKind, BatchStatus, BatchSummary, ItemRecord, ItemStatus, ListParams,
};
use crate::storage::database::Database;
use crate::utils::error::{Result, ServiceError};

/// Drives batches through their lifecycle.
///
/// Every mutating operation runs inside a single transaction with the
/// batch row locked, so a batch is processed exactly once even when
/// several workers pick up duplicate deliveries of the same job.
pub struct BatchEngine {
    store: Arc<Database>,
}

impl BatchEngine {
    pub fn new(store: Arc<Database>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Database {
        &self.store
    }

    /// Create a queued batch holding the raw request payload.
    ///
    /// The payload is validated for shape only; an empty payload is
    /// accepted here and turns the batch failed at processing time.
    pub async fn create_queued<T: Transform>(
        &self,
        kind: BatchKind,
        inputs: &[T::Input],
    ) -> Result<Uuid> {
        let payload = serde_json::to_value(inputs)?;
        let txn = self.store.begin().await?;
        let batch = self
            .store
            .create_batch(&txn, kind, BatchStatus::Queued, Some(payload))
            .await?;
        txn.commit().await.map_err(ServiceError::Database)?;

        info!("Queued {} batch {}", kind.as_str(), batch.id);
        Ok(batch.id)
    }

    /// Process a payload synchronously, persisting a completed batch and
    /// its items in one transaction. An empty payload yields a completed
    /// batch with zero items.
    pub async fn process_now<T: Transform>(
        &self,
        kind: BatchKind,
        transform: &T,
        inputs: &[T::Input],
    ) -> Result<(Uuid, Vec<ItemRecord>)> {
        let payload = serde_json::to_value(inputs)?;
        let records = run_transform(transform, inputs)?;

        let txn = self.store.begin().await?;
        let batch = self
            .store
            .create_batch(&txn, kind, BatchStatus::Completed, Some(payload))
            .await?;
        self.store.insert_items(&txn, batch.id, &records).await?;
        txn.commit().await.map_err(ServiceError::Database)?;

        info!(
            "Processed {} batch {} synchronously ({} items)",
            kind.as_str(),
            batch.id,
            records.len()
        );
        Ok((batch.id, records))
    }

    /// Process a queued batch.
    ///
    /// Takes a blocking row lock, so concurrent deliveries of the same
    /// batch serialize and the second run hits the idempotency guard.
    /// An unknown id is a no-op; workers must not crash on stale jobs.
    pub async fn process_batch<T: Transform>(
        &self,
        kind: BatchKind,
        transform: &T,
        id: Uuid,
    ) -> Result<()> {
        let txn = self.store.begin().await?;

        let batch = match self.store.lock_batch(&txn, kind, id).await? {
            Some(batch) => batch,
            None => {
                warn!("Batch {} not found for processing, skipping", id);
                return Ok(());
            }
        };

        let status = BatchStatus::from_str(&batch.status).ok_or_else(|| {
            ServiceError::Internal(format!("unknown batch status: {}", batch.status))
        })?;

        // Idempotency guard: a reprocessed batch that already holds its
        // results is left untouched.
        if status == BatchStatus::Completed && self.store.has_items(&txn, id).await? {
            debug!("Batch {} already completed with items, skipping", id);
            txn.commit().await.map_err(ServiceError::Database)?;
            return Ok(());
        }

        let inputs = decode_payload::<T>(batch.request_payload.as_ref());
        let inputs = match inputs {
            Some(inputs) if !inputs.is_empty() => inputs,
            _ => {
                warn!("Batch {} has an empty payload, marking failed", id);
                self.store.delete_items(&txn, id).await?;
                self.store
                    .set_batch_status(&txn, batch, BatchStatus::Failed)
                    .await?;
                txn.commit().await.map_err(ServiceError::Database)?;
                return Ok(());
            }
        };

        let batch = self
            .store
            .set_batch_status(&txn, batch, BatchStatus::Processing)
            .await?;

        // Replace, never append: reprocessing must not duplicate items.
        self.store.delete_items(&txn, id).await?;
        let records = run_transform(transform, &inputs)?;
        self.store.insert_items(&txn, id, &records).await?;
        self.store
            .set_batch_status(&txn, batch, BatchStatus::Completed)
            .await?;

        txn.commit().await.map_err(ServiceError::Database)?;
        info!(
            "Processed {} batch {} ({} items)",
            kind.as_str(),
            id,
            records.len()
        );
        Ok(())
    }

    /// Reset a batch to queued so it can be processed again.
    ///
    /// Returns false for an unknown id and for a batch whose payload is
    /// empty (which is marked failed instead). A batch currently being
    /// processed holds the row lock, so the non-blocking lock here fails
    /// and surfaces as a conflict.
    pub async fn requeue(&self, kind: BatchKind, id: Uuid) -> Result<bool> {
        let txn = self.store.begin().await?;

        let batch = self
            .store
            .lock_batch_nowait(&txn, kind, id)
            .await
            .map_err(|e| e.into_conflict_on_contention("batch is currently processing"))?;
        let batch = match batch {
            Some(batch) => batch,
            None => return Ok(false),
        };

        if batch.status == BatchStatus::Processing.as_str() {
            return Err(ServiceError::Conflict(
                "batch is currently processing".to_string(),
            ));
        }

        let payload_is_empty = decode_payload_len(batch.request_payload.as_ref()) == 0;

        self.store.delete_items(&txn, id).await?;
        if payload_is_empty {
            warn!("Batch {} has an empty payload, marking failed", id);
            self.store
                .set_batch_status(&txn, batch, BatchStatus::Failed)
                .await?;
            txn.commit().await.map_err(ServiceError::Database)?;
            return Ok(false);
        }

        self.store
            .set_batch_status(&txn, batch, BatchStatus::Queued)
            .await?;
        txn.commit().await.map_err(ServiceError::Database)?;

        info!("Requeued {} batch {}", kind.as_str(), id);
        Ok(true)
    }

    /// Delete a batch and its items. Returns false for an unknown id; a
    /// batch currently being processed surfaces as a conflict.
    pub async fn delete(&self, kind: BatchKind, id: Uuid) -> Result<bool> {
        let txn = self.store.begin().await?;

        let batch = self
            .store
            .lock_batch_nowait(&txn, kind, id)
            .await
            .map_err(|e| e.into_conflict_on_contention("batch is currently processing"))?;
        let batch = match batch {
            Some(batch) => batch,
            None => return Ok(false),
        };

        if batch.status == BatchStatus::Processing.as_str() {
            return Err(ServiceError::Conflict(
                "batch is currently processing".to_string(),
            ));
        }

        self.store.delete_batch(&txn, batch).await?;
        txn.commit().await.map_err(ServiceError::Database)?;

        info!("Deleted {} batch {}", kind.as_str(), id);
        Ok(true)
    }

    /// Fetch a batch's items in submission order; None for an unknown id.
    pub async fn items(&self, kind: BatchKind, id: Uuid) -> Result<Option<Vec<ItemRecord>>> {
        let conn = self.store.connection();
        let batch = match self.store.batch_by_id(conn, kind, id).await? {
            Some(batch) => batch,
            None => return Ok(None),
        };
        let records = self.store.items_for_batch(conn, batch.id).await?;
        Ok(Some(records))
    }

    /// Fetch batch metadata with its item count; None for an unknown id.
    pub async fn batch_info(&self, kind: BatchKind, id: Uuid) -> Result<Option<BatchSummary>> {
        match self.store.batch_with_count(kind, id).await? {
            Some(row) => Ok(Some(row.into_summary()?)),
            None => Ok(None),
        }
    }

    /// List batches of one kind, newest first.
    pub async fn list(&self, kind: BatchKind, params: ListParams) -> Result<Vec<BatchSummary>> {
        let rows = self.store.list_batches(kind, params).await?;
        rows.into_iter().map(|row| row.into_summary()).collect()
    }
}

/// Apply a transformation to every input. A failing record becomes an
/// error item; it never fails the batch.
fn run_transform<T: Transform>(transform: &T, inputs: &[T::Input]) -> Result<Vec<ItemRecord>> {
    let mut records = Vec::with_capacity(inputs.len());
    for input in inputs {
        let original = serde_json::to_value(input)?;
        let record = match transform.apply(input) {
            Ok(outcome) => ItemRecord {
                status: outcome.status,
                original,
                result: serde_json::to_value(&outcome.output)?,
                messages: outcome.messages,
            },
            Err(e) => ItemRecord {
                status: ItemStatus::Error,
                original,
                result: Value::Null,
                messages: vec![Diagnostic::error("transform_failed", &e.to_string())],
            },
        };
        records.push(record);
    }
    Ok(records)
}

fn decode_payload<T: Transform>(payload: Option<&Value>) -> Option<Vec<T::Input>> {
    let payload = payload?;
    serde_json::from_value(payload.clone()).ok()
}

fn decode_payload_len(payload: Option<&Value>) -> usize {
    payload
        .and_then(Value::as_array)
        .map(|items| items.len())
        .unwrap_or(0)
}
