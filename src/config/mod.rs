//! Configuration management for the gateway
//!
//! Configuration is loaded once at process start (YAML file plus environment
//! overrides) and passed by reference to every component that needs it.

pub mod models;

pub use models::*;

use crate::utils::error::{Result, ServiceError};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration (database + queue backend)
    #[serde(default)]
    pub storage: StorageConfig,
    /// Background worker configuration
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))?;

        config.apply_env()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Config::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid port: {}", e)))?;
        }
        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            self.storage.database.url = db_url;
        }
        if let Ok(redis_url) = std::env::var("REDIS_URL") {
            self.storage.redis.url = redis_url;
        }
        if let Ok(max_jobs) = std::env::var("WORKER_MAX_JOBS") {
            self.worker.max_jobs = max_jobs
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid worker count: {}", e)))?;
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if self.server.port == 0 {
            return Err(ServiceError::Config("Server port must be non-zero".into()));
        }
        if self.storage.database.url.is_empty() {
            return Err(ServiceError::Config("Database URL must be set".into()));
        }
        if self.storage.redis.enabled && self.storage.redis.url.is_empty() {
            return Err(ServiceError::Config(
                "Redis URL must be set when redis is enabled".into(),
            ));
        }
        if self.worker.max_jobs == 0 {
            return Err(ServiceError::Config(
                "Worker max_jobs must be at least 1".into(),
            ));
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
server:
  host: "127.0.0.1"
  port: 8080
storage:
  database:
    url: "sqlite::memory:"
  redis:
    url: "redis://localhost:6379"
    enabled: false
worker:
  max_jobs: 4
  poll_interval_ms: 100
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.database.url, "sqlite::memory:");
        assert!(!config.storage.redis.enabled);
        assert_eq!(config.worker.max_jobs, 4);
        assert_eq!(config.worker.poll_interval_ms, 100);
    }

    #[tokio::test]
    async fn test_config_missing_file() {
        let result = Config::from_file("/nonexistent/gateway.yaml").await;
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.worker.max_jobs, 10);
        assert_eq!(config.worker.queue_key, "addresses:jobs");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_workers() {
        let mut config = Config::default();
        config.worker.max_jobs = 0;
        assert!(config.validate().is_err());
    }
}
