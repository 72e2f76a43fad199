// Module declarations
mod types;
mod connection;
mod batch_ops;
mod item_ops;

// Re-export public types
pub use batch_ops::BatchWithCount;
pub use types::{DatabaseBackendType, SeaOrmDatabase};
