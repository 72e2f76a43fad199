use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::core::address::{RecognitionTransform, ValidationTransform};
use crate::core::batch::{BatchEngine, BatchKind};
use crate::utils::error::Result;

use super::{JobMessage, JobQueue};

/// Pool of worker tasks draining the job queue.
///
/// Each worker polls the queue and runs one batch at a time; the number
/// of workers bounds how many batches process concurrently. Duplicate
/// deliveries are harmless, the engine's row locking and idempotency
/// guard make the second run a no-op.
pub struct WorkerPool {
    engine: Arc<BatchEngine>,
    queue: Arc<dyn JobQueue>,
    config: WorkerConfig,
}

impl WorkerPool {
    pub fn new(engine: Arc<BatchEngine>, queue: Arc<dyn JobQueue>, config: WorkerConfig) -> Self {
        Self {
            engine,
            queue,
            config,
        }
    }

    /// Spawn the worker tasks. Handles are returned so a shutting-down
    /// host can abort them.
    pub fn spawn(&self) -> Vec<JoinHandle<()>> {
        info!("Starting {} batch workers", self.config.max_jobs);

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        (0..self.config.max_jobs)
            .map(|worker_id| {
                let engine = Arc::clone(&self.engine);
                let queue = Arc::clone(&self.queue);
                tokio::spawn(async move {
                    debug!("Worker {} started", worker_id);
                    loop {
                        match queue.dequeue().await {
                            Ok(Some(job)) => {
                                if let Err(e) = Self::process(&engine, &job).await {
                                    warn!(
                                        "Worker {} failed to process batch {}: {}",
                                        worker_id, job.batch_id, e
                                    );
                                }
                            }
                            Ok(None) => tokio::time::sleep(poll_interval).await,
                            Err(e) => {
                                warn!("Worker {} failed to poll queue: {}", worker_id, e);
                                tokio::time::sleep(poll_interval).await;
                            }
                        }
                    }
                })
            })
            .collect()
    }

    /// Run one job to completion.
    pub async fn process(engine: &BatchEngine, job: &JobMessage) -> Result<()> {
        debug!("Processing {} batch {}", job.kind.as_str(), job.batch_id);
        match job.kind {
            BatchKind::Validate => {
                engine
                    .process_batch(BatchKind::Validate, &ValidationTransform, job.batch_id)
                    .await
            }
            BatchKind::Recognize => {
                engine
                    .process_batch(BatchKind::Recognize, &RecognitionTransform, job.batch_id)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::AddressRecord;
    use crate::core::batch::BatchStatus;
    use crate::dispatch::InMemoryJobQueue;
    use crate::storage::database::migration::Migrator;
    use crate::storage::database::Database;
    use sea_orm_migration::MigratorTrait;

    async fn engine() -> Arc<BatchEngine> {
        let conn = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        Migrator::up(&conn, None).await.expect("migrations");
        Arc::new(BatchEngine::new(Arc::new(Database::from_connection(conn))))
    }

    fn inputs() -> Vec<AddressRecord> {
        vec![AddressRecord {
            address_line1: Some("500 main st".to_string()),
            country_code: Some("us".to_string()),
            postal_code: Some("10001".to_string()),
            ..Default::default()
        }]
    }

    #[tokio::test]
    async fn duplicate_deliveries_process_a_batch_once() {
        let engine = engine().await;
        let id = engine
            .create_queued::<ValidationTransform>(BatchKind::Validate, &inputs())
            .await
            .unwrap();

        let job = JobMessage {
            batch_id: id,
            kind: BatchKind::Validate,
        };
        WorkerPool::process(&engine, &job).await.unwrap();
        WorkerPool::process(&engine, &job).await.unwrap();

        let info = engine
            .batch_info(BatchKind::Validate, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.status, BatchStatus::Completed);
        assert_eq!(info.items_count, 1);
    }

    #[tokio::test]
    async fn worker_pool_drains_the_queue() {
        let engine = engine().await;
        let queue = Arc::new(InMemoryJobQueue::new());
        let id = engine
            .create_queued::<ValidationTransform>(BatchKind::Validate, &inputs())
            .await
            .unwrap();
        queue
            .enqueue(&JobMessage {
                batch_id: id,
                kind: BatchKind::Validate,
            })
            .await
            .unwrap();

        let pool = WorkerPool::new(
            Arc::clone(&engine),
            queue.clone(),
            WorkerConfig {
                max_jobs: 2,
                poll_interval_ms: 10,
                ..Default::default()
            },
        );
        let handles = pool.spawn();

        // Give the workers a moment to pick the job up.
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if queue.len().await == 0 {
                let info = engine.batch_info(BatchKind::Validate, id).await.unwrap();
                if info.map(|i| i.status) == Some(BatchStatus::Completed) {
                    break;
                }
            }
        }

        for handle in handles {
            handle.abort();
        }

        let info = engine
            .batch_info(BatchKind::Validate, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.status, BatchStatus::Completed);
        assert_eq!(info.items_count, 1);
    }
}
