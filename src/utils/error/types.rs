//! Error types for the gateway

use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Redis errors
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Whether a database error reports row-lock contention.
    ///
    /// Covers PostgreSQL `FOR UPDATE NOWAIT` refusals (SQLSTATE 55P03) and
    /// SQLite's busy-writer error. Used to surface `Conflict` when a requeue
    /// or delete races an in-flight processing transaction.
    pub fn is_lock_contention(&self) -> bool {
        match self {
            ServiceError::Database(err) => {
                let text = err.to_string();
                text.contains("55P03")
                    || text.contains("could not obtain lock")
                    || text.contains("database is locked")
            }
            _ => false,
        }
    }

    /// Translate lock contention into an explicit `Conflict`, leaving every
    /// other error untouched.
    pub fn into_conflict_on_contention(self, detail: &str) -> ServiceError {
        if self.is_lock_contention() {
            ServiceError::Conflict(detail.to_string())
        } else {
            self
        }
    }
}
