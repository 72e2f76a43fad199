//! Storage layer for the gateway
//!
//! This module provides data persistence and the queue backend.

/// Database storage module
pub mod database;
/// Redis queue module
pub mod redis;

use crate::config::StorageConfig;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main storage layer that orchestrates all storage backends
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// Database connection pool
    pub database: Arc<database::Database>,
    /// Redis connection pool, absent when Redis is disabled
    pub redis: Option<Arc<redis::RedisPool>>,
}

impl StorageLayer {
    /// Create a new storage layer
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");

        debug!("Connecting to database");
        let database = Arc::new(database::Database::new(&config.database).await?);

        let redis = if config.redis.enabled {
            debug!("Connecting to Redis");
            match redis::RedisPool::new(&config.redis).await {
                Ok(pool) => Some(Arc::new(pool)),
                Err(e) => {
                    warn!("Redis connection failed, continuing without Redis: {}", e);
                    None
                }
            }
        } else {
            debug!("Redis disabled, skipping Redis connection");
            None
        };

        info!("Storage layer initialized successfully");

        Ok(Self { database, redis })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");
        self.database.migrate().await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Health check for all storage backends
    pub async fn health_check(&self) -> Result<StorageHealthStatus> {
        let mut status = StorageHealthStatus {
            database: false,
            redis: self.redis.is_none(),
            overall: false,
        };

        match self.database.health_check().await {
            Ok(_) => status.database = true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
            }
        }

        if let Some(redis) = &self.redis {
            match redis.health_check().await {
                Ok(_) => status.redis = true,
                Err(e) => {
                    warn!("Redis health check failed: {}", e);
                }
            }
        }

        status.overall = status.database && status.redis;

        Ok(status)
    }

    /// Close all connections
    pub async fn close(&self) -> Result<()> {
        info!("Closing storage connections");

        if let Some(redis) = &self.redis {
            redis.close().await?;
        }

        info!("Storage connections closed");
        Ok(())
    }

    /// Get database pool
    pub fn db(&self) -> &database::Database {
        &self.database
    }
}

/// Storage health status
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageHealthStatus {
    /// Database health status
    pub database: bool,
    /// Redis health status (true when Redis is not configured)
    pub redis: bool,
    /// Overall health status
    pub overall: bool,
}
