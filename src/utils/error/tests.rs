//! Tests for error handling

use super::types::ServiceError;
use actix_web::ResponseError;

#[test]
fn test_error_display() {
    let error = ServiceError::NotFound("batch_id not found".to_string());
    assert_eq!(error.to_string(), "Not found: batch_id not found");

    let error = ServiceError::Conflict("batch is processing".to_string());
    assert_eq!(error.to_string(), "Conflict: batch is processing");
}

#[test]
fn test_not_found_maps_to_404() {
    let error = ServiceError::NotFound("unknown batch".to_string());
    let response = error.error_response();
    assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[test]
fn test_conflict_maps_to_409() {
    let error = ServiceError::Conflict("batch is processing".to_string());
    let response = error.error_response();
    assert_eq!(response.status(), actix_web::http::StatusCode::CONFLICT);
}

#[test]
fn test_validation_maps_to_400() {
    let error = ServiceError::Validation("bad payload".to_string());
    let response = error.error_response();
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[test]
fn test_internal_maps_to_500() {
    let error = ServiceError::Internal("boom".to_string());
    let response = error.error_response();
    assert_eq!(
        response.status(),
        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_serde_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: ServiceError = json_err.into();
    assert!(matches!(error, ServiceError::Serialization(_)));
}

#[test]
fn test_lock_contention_detection() {
    let error = ServiceError::Database(sea_orm::DbErr::Custom(
        "error returned from database: database is locked".to_string(),
    ));
    assert!(error.is_lock_contention());

    let error = ServiceError::Database(sea_orm::DbErr::Custom(
        "relation does not exist".to_string(),
    ));
    assert!(!error.is_lock_contention());

    let error = ServiceError::NotFound("nope".to_string());
    assert!(!error.is_lock_contention());
}

#[test]
fn test_contention_becomes_conflict() {
    let error = ServiceError::Database(sea_orm::DbErr::Custom(
        "could not obtain lock on row in relation \"address_batches\"".to_string(),
    ));
    let mapped = error.into_conflict_on_contention("batch is processing");
    assert!(matches!(mapped, ServiceError::Conflict(msg) if msg == "batch is processing"));

    let error = ServiceError::Timeout("slow".to_string());
    let mapped = error.into_conflict_on_contention("batch is processing");
    assert!(matches!(mapped, ServiceError::Timeout(_)));
}
