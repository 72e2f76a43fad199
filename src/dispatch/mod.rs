//! Job dispatch for queued batch processing
//!
//! Batches queued for asynchronous processing are handed to workers as
//! small JSON job messages. Redis backs the queue in deployment; an
//! in-memory queue covers single-process setups and tests.

pub mod worker;

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::batch::BatchKind;
use crate::storage::redis::RedisPool;
use crate::utils::error::Result;

pub use worker::WorkerPool;

/// One unit of queued work: which batch to process and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMessage {
    pub batch_id: Uuid,
    pub kind: BatchKind,
}

/// FIFO job queue shared between the server and its workers.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: &JobMessage) -> Result<()>;
    async fn dequeue(&self) -> Result<Option<JobMessage>>;
}

/// Redis-backed queue. Jobs are pushed to the head of a list and popped
/// from its tail, so delivery order matches submission order.
pub struct RedisJobQueue {
    pool: Arc<RedisPool>,
    queue_key: String,
}

impl RedisJobQueue {
    pub fn new(pool: Arc<RedisPool>, queue_key: impl Into<String>) -> Self {
        Self {
            pool,
            queue_key: queue_key.into(),
        }
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, job: &JobMessage) -> Result<()> {
        let payload = serde_json::to_string(job)?;
        self.pool.list_push(&self.queue_key, &payload).await?;
        debug!("Enqueued job for batch {}", job.batch_id);
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<JobMessage>> {
        let payload = match self.pool.list_pop(&self.queue_key).await? {
            Some(payload) => payload,
            None => return Ok(None),
        };
        match serde_json::from_str(&payload) {
            Ok(job) => Ok(Some(job)),
            Err(e) => {
                // A malformed message must not wedge the queue.
                warn!("Dropping malformed job message: {}", e);
                Ok(None)
            }
        }
    }
}

/// Process-local queue used when Redis is disabled and in tests.
#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<VecDeque<JobMessage>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: &JobMessage) -> Result<()> {
        self.jobs.lock().await.push_back(job.clone());
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<JobMessage>> {
        Ok(self.jobs.lock().await.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_queue_is_first_in_first_out() {
        let queue = InMemoryJobQueue::new();
        let first = JobMessage {
            batch_id: Uuid::new_v4(),
            kind: BatchKind::Validate,
        };
        let second = JobMessage {
            batch_id: Uuid::new_v4(),
            kind: BatchKind::Recognize,
        };

        queue.enqueue(&first).await.unwrap();
        queue.enqueue(&second).await.unwrap();

        assert_eq!(queue.dequeue().await.unwrap(), Some(first));
        assert_eq!(queue.dequeue().await.unwrap(), Some(second));
        assert_eq!(queue.dequeue().await.unwrap(), None);
    }

    #[test]
    fn job_message_round_trips_through_json() {
        let job = JobMessage {
            batch_id: Uuid::new_v4(),
            kind: BatchKind::Validate,
        };
        let payload = serde_json::to_string(&job).unwrap();
        assert_eq!(serde_json::from_str::<JobMessage>(&payload).unwrap(), job);
    }
}
