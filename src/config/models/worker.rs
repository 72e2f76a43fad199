//! Background worker configuration

use serde::{Deserialize, Serialize};

/// Background worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Maximum concurrent processing jobs
    #[serde(default = "default_max_jobs")]
    pub max_jobs: usize,
    /// Queue polling interval in milliseconds when the queue is empty
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Redis list key carrying job messages
    #[serde(default = "default_queue_key")]
    pub queue_key: String,
    /// Run the worker pool inside the server process.
    ///
    /// Forced on when redis is disabled, since the in-process queue is not
    /// visible to a separate worker binary.
    #[serde(default)]
    pub embedded: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_jobs: default_max_jobs(),
            poll_interval_ms: default_poll_interval_ms(),
            queue_key: default_queue_key(),
            embedded: false,
        }
    }
}

fn default_max_jobs() -> usize {
    10
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_queue_key() -> String {
    "addresses:jobs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_config_default() {
        let config = WorkerConfig::default();
        assert_eq!(config.max_jobs, 10);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.queue_key, "addresses:jobs");
        assert!(!config.embedded);
    }

    #[test]
    fn test_worker_config_deserialization() {
        let yaml = "max_jobs: 3\nembedded: true\n";
        let config: WorkerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_jobs, 3);
        assert!(config.embedded);
        assert_eq!(config.queue_key, "addresses:jobs");
    }
}
