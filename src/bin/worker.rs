//! Standalone batch worker binary
//!
//! Consumes the redis job queue and processes queued batches. Runs as a
//! separate process from the server so processing capacity can scale
//! independently.

#![allow(missing_docs)]

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{info, Level};

use address_gateway::config::Config;
use address_gateway::core::batch::BatchEngine;
use address_gateway::dispatch::{JobQueue, RedisJobQueue, WorkerPool};
use address_gateway::storage::StorageLayer;
use address_gateway::utils::error::{Result, ServiceError};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    match run_worker().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_worker() -> Result<()> {
    info!("Starting address gateway worker");

    let config_path = "config/gateway.yaml";
    let config = match Config::from_file(config_path).await {
        Ok(config) => config,
        Err(e) => {
            info!(
                "Configuration file {} not loaded ({}), using defaults with env overrides",
                config_path, e
            );
            Config::from_env()?
        }
    };

    let storage = StorageLayer::new(&config.storage).await?;
    storage.migrate().await?;

    let redis = storage.redis.clone().ok_or_else(|| {
        ServiceError::Config("The worker binary requires redis (storage.redis.enabled)".to_string())
    })?;

    let engine = Arc::new(BatchEngine::new(Arc::clone(&storage.database)));
    let queue: Arc<dyn JobQueue> = Arc::new(RedisJobQueue::new(redis, &config.worker.queue_key));

    let pool = WorkerPool::new(engine, queue, config.worker.clone());
    let handles = pool.spawn();

    info!("Worker running, press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(ServiceError::Io)?;

    info!("Shutting down workers");
    for handle in handles {
        handle.abort();
    }
    storage.close().await?;

    Ok(())
}
