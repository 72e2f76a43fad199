//! Batch lifecycle engine
//!
//! Owns the batch state machine: creation, the synchronous processing path,
//! the queued/asynchronous processing path, and safe requeue/reset.

pub mod lifecycle;
#[cfg(test)]
mod tests;
pub mod types;

pub use lifecycle::BatchEngine;
pub use types::{BatchKind, BatchStatus, BatchSummary, ItemRecord, ItemStatus, ListParams};
