//! Address submission and result endpoints
//!
//! Validation and recognition share one shape: POST/PUT a list of records,
//! either processed synchronously (200 with results) or queued (202 with an
//! empty body), with the batch id always returned in a response header.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::address::{
    AddressRecord, Diagnostic, RecognitionRecord, RecognitionTransform, ValidationTransform,
};
use crate::core::batch::{BatchKind, ItemRecord, ItemStatus};
use crate::dispatch::JobMessage;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};

const VALIDATION_BATCH_HEADER: &str = "X-Validation-Batch-Id";
const RECOGNITION_HEADER: &str = "X-Recognition-Id";

/// Configure address routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/addresses")
            .route("/validate", web::post().to(validate_addresses))
            .route("/validate/{batch_id}", web::get().to(validation_results))
            .route("/recognize", web::put().to(recognize_addresses))
            .route("/recognize/{recognition_id}", web::get().to(recognition_results)),
    );
}

#[derive(Debug, Deserialize)]
pub struct ProcessQuery {
    /// Queue the batch instead of processing it in the request.
    #[serde(rename = "async", default)]
    pub async_mode: bool,
}

/// Per-record validation outcome returned to the client.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub status: ItemStatus,
    pub original_address: Value,
    pub matched_address: Value,
    pub messages: Vec<Diagnostic>,
}

/// Per-record recognition outcome returned to the client.
#[derive(Debug, Serialize)]
pub struct RecognitionResult {
    pub status: &'static str,
    pub original_address: Value,
    pub recognized_address: Value,
}

fn validation_result(record: ItemRecord) -> ValidationResult {
    ValidationResult {
        status: record.status,
        original_address: record.original,
        matched_address: record.result,
        messages: record.messages,
    }
}

fn recognition_result(record: ItemRecord) -> RecognitionResult {
    let original_address = match record.original.get("address") {
        Some(address) if !address.is_null() => address.clone(),
        _ => json!({}),
    };
    RecognitionResult {
        status: if record.status == ItemStatus::Error {
            "error"
        } else {
            "recognized"
        },
        original_address,
        recognized_address: record.result,
    }
}

/// Validate addresses synchronously or queue them for background processing.
pub async fn validate_addresses(
    state: web::Data<AppState>,
    query: web::Query<ProcessQuery>,
    addresses: web::Json<Vec<AddressRecord>>,
) -> Result<HttpResponse> {
    if query.async_mode {
        let batch_id = state
            .engine
            .create_queued::<ValidationTransform>(BatchKind::Validate, &addresses)
            .await?;
        state
            .queue
            .enqueue(&JobMessage {
                batch_id,
                kind: BatchKind::Validate,
            })
            .await?;

        return Ok(HttpResponse::Accepted()
            .insert_header((VALIDATION_BATCH_HEADER, batch_id.to_string()))
            .json(Vec::<ValidationResult>::new()));
    }

    let (batch_id, records) = state
        .engine
        .process_now(BatchKind::Validate, &ValidationTransform, &addresses)
        .await?;
    let results: Vec<ValidationResult> = records.into_iter().map(validation_result).collect();

    Ok(HttpResponse::Ok()
        .insert_header((VALIDATION_BATCH_HEADER, batch_id.to_string()))
        .json(results))
}

/// Retrieve validation results for a batch.
pub async fn validation_results(
    state: web::Data<AppState>,
    batch_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let records = state
        .engine
        .items(BatchKind::Validate, *batch_id)
        .await?
        .filter(|records| !records.is_empty())
        .ok_or_else(|| ServiceError::NotFound("batch_id not found or empty".to_string()))?;

    let results: Vec<ValidationResult> = records.into_iter().map(validation_result).collect();
    Ok(HttpResponse::Ok().json(results))
}

/// Recognize addresses synchronously or queue them for background processing.
pub async fn recognize_addresses(
    state: web::Data<AppState>,
    query: web::Query<ProcessQuery>,
    payload: web::Json<Vec<RecognitionRecord>>,
) -> Result<HttpResponse> {
    if query.async_mode {
        let batch_id = state
            .engine
            .create_queued::<RecognitionTransform>(BatchKind::Recognize, &payload)
            .await?;
        state
            .queue
            .enqueue(&JobMessage {
                batch_id,
                kind: BatchKind::Recognize,
            })
            .await?;

        return Ok(HttpResponse::Accepted()
            .insert_header((RECOGNITION_HEADER, batch_id.to_string()))
            .json(Vec::<RecognitionResult>::new()));
    }

    let (batch_id, records) = state
        .engine
        .process_now(BatchKind::Recognize, &RecognitionTransform, &payload)
        .await?;
    let results: Vec<RecognitionResult> = records.into_iter().map(recognition_result).collect();

    Ok(HttpResponse::Ok()
        .insert_header((RECOGNITION_HEADER, batch_id.to_string()))
        .json(results))
}

/// Retrieve recognition results for a batch.
pub async fn recognition_results(
    state: web::Data<AppState>,
    recognition_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let records = state
        .engine
        .items(BatchKind::Recognize, *recognition_id)
        .await?
        .filter(|records| !records.is_empty())
        .ok_or_else(|| ServiceError::NotFound("recognition_id not found or empty".to_string()))?;

    let results: Vec<RecognitionResult> = records.into_iter().map(recognition_result).collect();
    Ok(HttpResponse::Ok().json(results))
}
