//! HTTP route modules
//!
//! Route handlers organized by resource: address submission/results and
//! batch administration.

pub mod addresses;
pub mod batches;
