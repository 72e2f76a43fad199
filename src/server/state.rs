//! Application state shared across HTTP handlers

use std::sync::Arc;

use crate::config::Config;
use crate::core::batch::BatchEngine;
use crate::dispatch::JobQueue;
use crate::storage::StorageLayer;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for efficient sharing across threads.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Storage layer
    pub storage: Arc<StorageLayer>,
    /// Batch lifecycle engine
    pub engine: Arc<BatchEngine>,
    /// Job queue feeding the workers
    pub queue: Arc<dyn JobQueue>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: StorageLayer,
        engine: Arc<BatchEngine>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            engine,
            queue,
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
