use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::address::Diagnostic;

/// Which transformation family a batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    Validate,
    Recognize,
}

impl BatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchKind::Validate => "validate",
            BatchKind::Recognize => "recognize",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "validate" => Some(BatchKind::Validate),
            "recognize" => Some(BatchKind::Recognize),
            _ => None,
        }
    }
}

/// Lifecycle state of a batch.
///
/// Legal transitions are queued -> processing -> completed | failed.
/// A completed or failed batch only leaves its terminal state through
/// an explicit requeue, which resets it to queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Queued => "queued",
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "queued" => Some(BatchStatus::Queued),
            "processing" => Some(BatchStatus::Processing),
            "completed" => Some(BatchStatus::Completed),
            "failed" => Some(BatchStatus::Failed),
            _ => None,
        }
    }
}

/// Per-record outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Verified,
    Unverified,
    Completed,
    Error,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Verified => "verified",
            ItemStatus::Unverified => "unverified",
            ItemStatus::Completed => "completed",
            ItemStatus::Error => "error",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "verified" => Some(ItemStatus::Verified),
            "unverified" => Some(ItemStatus::Unverified),
            "completed" => Some(ItemStatus::Completed),
            "error" => Some(ItemStatus::Error),
            _ => None,
        }
    }
}

/// One processed record, either freshly produced by a transformation or
/// read back from storage. Submission order is preserved by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub status: ItemStatus,
    pub original: serde_json::Value,
    pub result: serde_json::Value,
    pub messages: Vec<Diagnostic>,
}

/// Batch metadata plus its item count, as returned by the listing and
/// detail queries.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub id: Uuid,
    pub kind: BatchKind,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    pub items_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_payload: Option<serde_json::Value>,
}

/// Pagination and filter parameters for batch listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub status: Option<BatchStatus>,
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn batch_status_round_trips_through_strings() {
        for status in [
            BatchStatus::Queued,
            BatchStatus::Processing,
            BatchStatus::Completed,
            BatchStatus::Failed,
        ] {
            assert_eq!(BatchStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(BatchStatus::from_str("bogus"), None);
    }

    #[test]
    fn item_status_round_trips_through_strings() {
        for status in [
            ItemStatus::Verified,
            ItemStatus::Unverified,
            ItemStatus::Completed,
            ItemStatus::Error,
        ] {
            assert_eq!(ItemStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn batch_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BatchKind::Recognize).unwrap(),
            "\"recognize\""
        );
        assert_eq!(BatchKind::from_str("validate"), Some(BatchKind::Validate));
    }
}
