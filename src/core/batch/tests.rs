use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::core::address::{AddressRecord, RecognitionRecord, RecognitionTransform, ValidationTransform};
use crate::core::batch::{BatchEngine, BatchKind, BatchStatus, ItemStatus, ListParams};
use crate::storage::database::migration::Migrator;
use crate::storage::database::Database;
use crate::utils::error::ServiceError;

async fn engine() -> BatchEngine {
    let conn = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    Migrator::up(&conn, None).await.expect("migrations");
    BatchEngine::new(Arc::new(Database::from_connection(conn)))
}

fn address(line1: &str) -> AddressRecord {
    AddressRecord {
        address_line1: Some(line1.to_string()),
        city_locality: Some("austin".to_string()),
        state_province: Some("tx".to_string()),
        postal_code: Some("78701".to_string()),
        country_code: Some("us".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn process_now_persists_completed_batch_with_ordered_items() {
    let engine = engine().await;
    let inputs = vec![address("1 first st"), address("2 second st"), address("3 third st")];

    let (id, records) = engine
        .process_now(BatchKind::Validate, &ValidationTransform, &inputs)
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.status, ItemStatus::Verified);
    }

    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Completed);
    assert_eq!(info.items_count, 3);

    let stored = engine.items(BatchKind::Validate, id).await.unwrap().unwrap();
    let lines: Vec<_> = stored
        .iter()
        .map(|r| r.result["address_line1"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(lines, vec!["1 FIRST ST", "2 SECOND ST", "3 THIRD ST"]);
}

#[tokio::test]
async fn process_now_with_empty_payload_completes_with_zero_items() {
    let engine = engine().await;

    let (id, records) = engine
        .process_now(BatchKind::Validate, &ValidationTransform, &[])
        .await
        .unwrap();

    assert!(records.is_empty());
    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Completed);
    assert_eq!(info.items_count, 0);
    assert_eq!(
        engine.items(BatchKind::Validate, id).await.unwrap().unwrap().len(),
        0
    );
}

#[tokio::test]
async fn queued_batch_processes_to_completed() {
    let engine = engine().await;
    let inputs = vec![address("10 oak ave"), address("11 oak ave")];

    let id = engine
        .create_queued::<ValidationTransform>(BatchKind::Validate, &inputs)
        .await
        .unwrap();

    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Queued);
    assert_eq!(info.items_count, 0);

    engine
        .process_batch(BatchKind::Validate, &ValidationTransform, id)
        .await
        .unwrap();

    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Completed);
    assert_eq!(info.items_count, 2);
}

#[tokio::test]
async fn reprocessing_a_completed_batch_is_a_no_op() {
    let engine = engine().await;
    let inputs = vec![address("42 elm st")];

    let id = engine
        .create_queued::<ValidationTransform>(BatchKind::Validate, &inputs)
        .await
        .unwrap();
    engine
        .process_batch(BatchKind::Validate, &ValidationTransform, id)
        .await
        .unwrap();
    engine
        .process_batch(BatchKind::Validate, &ValidationTransform, id)
        .await
        .unwrap();

    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Completed);
    assert_eq!(info.items_count, 1);
}

#[tokio::test]
async fn processing_an_unknown_batch_is_a_no_op() {
    let engine = engine().await;
    engine
        .process_batch(BatchKind::Validate, &ValidationTransform, Uuid::new_v4())
        .await
        .unwrap();
}

#[tokio::test]
async fn processing_an_empty_payload_marks_the_batch_failed() {
    let engine = engine().await;

    let id = engine
        .create_queued::<ValidationTransform>(BatchKind::Validate, &[])
        .await
        .unwrap();
    engine
        .process_batch(BatchKind::Validate, &ValidationTransform, id)
        .await
        .unwrap();

    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Failed);
    assert_eq!(info.items_count, 0);
}

#[tokio::test]
async fn requeue_resets_a_completed_batch_and_clears_its_items() {
    let engine = engine().await;
    let inputs = vec![address("7 pine rd"), address("8 pine rd")];

    let id = engine
        .create_queued::<ValidationTransform>(BatchKind::Validate, &inputs)
        .await
        .unwrap();
    engine
        .process_batch(BatchKind::Validate, &ValidationTransform, id)
        .await
        .unwrap();

    assert!(engine.requeue(BatchKind::Validate, id).await.unwrap());

    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Queued);
    assert_eq!(info.items_count, 0);

    // Reprocessing repopulates the items without duplicating them.
    engine
        .process_batch(BatchKind::Validate, &ValidationTransform, id)
        .await
        .unwrap();
    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Completed);
    assert_eq!(info.items_count, 2);
}

#[tokio::test]
async fn requeue_of_a_processing_batch_is_a_conflict() {
    let engine = engine().await;
    let inputs = vec![address("9 maple dr")];

    let id = engine
        .create_queued::<ValidationTransform>(BatchKind::Validate, &inputs)
        .await
        .unwrap();

    let store = engine.store();
    let txn = store.begin().await.unwrap();
    let model = store
        .batch_by_id(&txn, BatchKind::Validate, id)
        .await
        .unwrap()
        .unwrap();
    store
        .set_batch_status(&txn, model, BatchStatus::Processing)
        .await
        .unwrap();
    txn.commit().await.unwrap();

    let err = engine.requeue(BatchKind::Validate, id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn requeue_with_an_empty_payload_fails_the_batch() {
    let engine = engine().await;

    let id = engine
        .create_queued::<ValidationTransform>(BatchKind::Validate, &[])
        .await
        .unwrap();

    assert!(!engine.requeue(BatchKind::Validate, id).await.unwrap());
    let info = engine.batch_info(BatchKind::Validate, id).await.unwrap().unwrap();
    assert_eq!(info.status, BatchStatus::Failed);
}

#[tokio::test]
async fn requeue_and_delete_return_false_for_unknown_ids() {
    let engine = engine().await;
    let id = Uuid::new_v4();

    assert!(!engine.requeue(BatchKind::Validate, id).await.unwrap());
    assert!(!engine.delete(BatchKind::Validate, id).await.unwrap());
}

#[tokio::test]
async fn delete_removes_the_batch_and_its_items() {
    let engine = engine().await;
    let inputs = vec![address("12 cedar ln")];

    let (id, _) = engine
        .process_now(BatchKind::Validate, &ValidationTransform, &inputs)
        .await
        .unwrap();

    assert!(engine.delete(BatchKind::Validate, id).await.unwrap());
    assert!(engine.batch_info(BatchKind::Validate, id).await.unwrap().is_none());
    assert!(engine.items(BatchKind::Validate, id).await.unwrap().is_none());
}

#[tokio::test]
async fn listing_filters_by_kind_and_status() {
    let engine = engine().await;

    let (completed_id, _) = engine
        .process_now(
            BatchKind::Validate,
            &ValidationTransform,
            &[address("1 a st"), address("2 a st")],
        )
        .await
        .unwrap();
    let queued_id = engine
        .create_queued::<ValidationTransform>(BatchKind::Validate, &[address("3 a st")])
        .await
        .unwrap();
    let recognition = vec![RecognitionRecord {
        text: "deliver to 4 b st".to_string(),
        address: Some(address("4 b st")),
    }];
    engine
        .process_now(BatchKind::Recognize, &RecognitionTransform, &recognition)
        .await
        .unwrap();

    let all = engine
        .list(BatchKind::Validate, ListParams::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let queued = engine
        .list(
            BatchKind::Validate,
            ListParams {
                status: Some(BatchStatus::Queued),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].id, queued_id);
    assert_eq!(queued[0].items_count, 0);

    let completed = engine
        .list(
            BatchKind::Validate,
            ListParams {
                status: Some(BatchStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, completed_id);
    assert_eq!(completed[0].items_count, 2);

    let limited = engine
        .list(
            BatchKind::Validate,
            ListParams {
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}
