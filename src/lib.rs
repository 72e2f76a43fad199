//! # Address Gateway
//!
//! Batch address validation and recognition service with synchronous and
//! queued processing paths.
//!
//! Submitted address records are normalized by deterministic transforms
//! and stored as batches that move through a queued -> processing ->
//! completed/failed lifecycle. Every batch mutation runs inside a single
//! database transaction with the batch row locked, so batches are
//! processed exactly once even under duplicate job deliveries, and
//! completed batches can be requeued without duplicating their items.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use address_gateway::server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Loads config/gateway.yaml, falls back to env/defaults
//!     server::builder::run_server().await?;
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;
/// Core domain logic: address records, transforms, batch lifecycle
pub mod core;
/// Job queue and worker pool
pub mod dispatch;
/// HTTP server and routes
pub mod server;
/// Database and queue backends
pub mod storage;
/// Error types and shared utilities
pub mod utils;

pub use config::Config;
pub use utils::error::{Result, ServiceError};
