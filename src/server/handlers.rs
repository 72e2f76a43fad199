//! HTTP route handler functions shared by the whole app

use actix_web::{web, HttpResponse, Result as ActixResult};
use serde_json::json;
use tracing::debug;

use crate::server::state::AppState;

/// Health check endpoint handler
///
/// Used by load balancers and monitoring systems; reports storage health
/// alongside liveness.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let storage = state.storage.health_check().await.ok();
    let healthy = storage.as_ref().map(|s| s.overall).unwrap_or(false);

    let body = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage,
    });

    if healthy {
        Ok(HttpResponse::Ok().json(body))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(body))
    }
}
