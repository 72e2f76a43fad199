//! Batch administration endpoints
//!
//! Listing, inspection, deletion and requeueing for validation and
//! recognition batches. Both kinds share the same handlers; only the
//! URL prefix differs.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::batch::{BatchKind, BatchStatus, BatchSummary, ListParams};
use crate::dispatch::JobMessage;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// Configure batch administration routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/validation-batches")
            .route("", web::get().to(list_validation_batches))
            .route("/{batch_id}", web::get().to(get_validation_batch))
            .route("/{batch_id}", web::delete().to(delete_validation_batch))
            .route("/{batch_id}/requeue", web::post().to(requeue_validation_batch)),
    )
    .service(
        web::scope("/v1/recognition-batches")
            .route("", web::get().to(list_recognition_batches))
            .route("/{batch_id}", web::get().to(get_recognition_batch))
            .route("/{batch_id}", web::delete().to(delete_recognition_batch))
            .route("/{batch_id}/requeue", web::post().to(requeue_recognition_batch)),
    );
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub status: Option<String>,
}

/// Batch metadata returned to the client.
#[derive(Debug, Serialize)]
pub struct BatchInfo {
    pub id: Uuid,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    pub items_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_payload: Option<Value>,
}

impl From<BatchSummary> for BatchInfo {
    fn from(summary: BatchSummary) -> Self {
        Self {
            id: summary.id,
            status: summary.status,
            created_at: summary.created_at,
            items_count: summary.items_count,
            request_payload: summary.request_payload,
        }
    }
}

fn list_params(query: &ListQuery) -> Result<ListParams> {
    let status = match &query.status {
        Some(raw) => Some(BatchStatus::from_str(raw).ok_or_else(|| {
            ServiceError::Validation(format!("unknown status filter: {}", raw))
        })?),
        None => None,
    };
    Ok(ListParams {
        limit: Some(query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)),
        offset: Some(query.offset.unwrap_or(0)),
        status,
    })
}

async fn list_batches(
    state: &AppState,
    kind: BatchKind,
    query: &ListQuery,
) -> Result<HttpResponse> {
    let summaries = state.engine.list(kind, list_params(query)?).await?;
    let infos: Vec<BatchInfo> = summaries.into_iter().map(BatchInfo::from).collect();
    Ok(HttpResponse::Ok().json(infos))
}

async fn get_batch(state: &AppState, kind: BatchKind, id: Uuid) -> Result<HttpResponse> {
    let summary = state
        .engine
        .batch_info(kind, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("batch_id not found".to_string()))?;
    Ok(HttpResponse::Ok().json(BatchInfo::from(summary)))
}

async fn delete_batch(state: &AppState, kind: BatchKind, id: Uuid) -> Result<HttpResponse> {
    if !state.engine.delete(kind, id).await? {
        return Err(ServiceError::NotFound("batch_id not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

async fn requeue_batch(state: &AppState, kind: BatchKind, id: Uuid) -> Result<HttpResponse> {
    if !state.engine.requeue(kind, id).await? {
        return Err(ServiceError::NotFound("batch_id not found".to_string()));
    }
    state
        .queue
        .enqueue(&JobMessage { batch_id: id, kind })
        .await?;
    Ok(HttpResponse::Accepted().finish())
}

pub async fn list_validation_batches(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    list_batches(&state, BatchKind::Validate, &query).await
}

pub async fn get_validation_batch(
    state: web::Data<AppState>,
    batch_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    get_batch(&state, BatchKind::Validate, *batch_id).await
}

pub async fn delete_validation_batch(
    state: web::Data<AppState>,
    batch_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    delete_batch(&state, BatchKind::Validate, *batch_id).await
}

pub async fn requeue_validation_batch(
    state: web::Data<AppState>,
    batch_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    requeue_batch(&state, BatchKind::Validate, *batch_id).await
}

pub async fn list_recognition_batches(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    list_batches(&state, BatchKind::Recognize, &query).await
}

pub async fn get_recognition_batch(
    state: web::Data<AppState>,
    batch_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    get_batch(&state, BatchKind::Recognize, *batch_id).await
}

pub async fn delete_recognition_batch(
    state: web::Data<AppState>,
    batch_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    delete_batch(&state, BatchKind::Recognize, *batch_id).await
}

pub async fn requeue_recognition_batch(
    state: web::Data<AppState>,
    batch_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    requeue_batch(&state, BatchKind::Recognize, *batch_id).await
}
