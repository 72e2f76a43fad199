//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::core::batch::BatchEngine;
use crate::dispatch::{InMemoryJobQueue, JobQueue, RedisJobQueue, WorkerPool};
use crate::server::handlers::health_check;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use tracing::{debug, info};

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let storage = crate::storage::StorageLayer::new(&config.storage).await?;
        storage.migrate().await?;

        let engine = Arc::new(BatchEngine::new(Arc::clone(&storage.database)));

        // Queued batches go through redis when it is available; otherwise an
        // in-process queue keeps async mode working, with the workers
        // embedded here since no external worker can see that queue.
        let (queue, embed_workers): (Arc<dyn JobQueue>, bool) = match &storage.redis {
            Some(redis) => {
                let queue = RedisJobQueue::new(Arc::clone(redis), &config.worker.queue_key);
                (Arc::new(queue), config.worker.embedded)
            }
            None => {
                debug!("Redis unavailable, using in-process job queue");
                (Arc::new(InMemoryJobQueue::new()), true)
            }
        };

        if embed_workers {
            let pool = WorkerPool::new(Arc::clone(&engine), Arc::clone(&queue), config.worker.clone());
            pool.spawn();
        }

        let state = AppState::new(config.clone(), storage, engine, queue);

        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Create the Actix-web application
    fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "Address-Gateway-RS")))
            .configure(configure_app)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let workers = self.config.workers;

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .bind(&bind_addr)
            .map_err(|e| {
                ServiceError::Config(format!("Failed to bind to {}: {}", bind_addr, e))
            })?;

        if let Some(workers) = workers {
            server = server.workers(workers);
        }

        info!("HTTP server listening on {}", bind_addr);

        server
            .run()
            .await
            .map_err(|e| ServiceError::Internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Register every route of the application. Shared with the route-level
/// tests so they exercise the same table the server runs.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(routes::addresses::configure_routes)
        .configure(routes::batches::configure_routes);
}
