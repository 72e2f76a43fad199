//! Error handling for the gateway
//!
//! This module defines the error taxonomy used throughout the service and
//! its mapping to HTTP responses.

mod response;
#[cfg(test)]
mod tests;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{Result, ServiceError};
