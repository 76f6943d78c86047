//! Integration tests for sequence submission.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use serde_json::json;
use sqlx::PgPool;

use profold_db::models::queue_entry::QueueKind;
use profold_db::repositories::PredictionQueueRepo;

const SEQ: &str = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ";

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_creates_record_and_queue_entry(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/sequences",
        json!({ "sequence": SEQ, "tool": "alphafold" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let data = body_json(response).await["data"].take();
    assert_eq!(data["created"], true);
    assert_eq!(data["record"]["sequence"], SEQ);
    assert!(data["record"]["parent_id"].is_null());
    assert_eq!(data["subsequences"].as_array().unwrap().len(), 0);

    let counts = PredictionQueueRepo::status_counts(&pool, QueueKind::Alphafold)
        .await
        .unwrap();
    assert_eq!(counts.pending, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_submission_resolves_to_existing_record(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let first = post_json(
        app.clone(),
        "/api/v1/sequences",
        json!({ "sequence": SEQ, "tool": "alphafold" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first_id = body_json(first).await["data"]["record"]["id"].as_i64().unwrap();

    let second = post_json(
        app,
        "/api/v1/sequences",
        json!({ "sequence": SEQ, "tool": "alphafold" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let data = body_json(second).await["data"].take();
    assert_eq!(data["created"], false);
    assert_eq!(data["record"]["id"].as_i64().unwrap(), first_id);

    // Still only one pending entry.
    let counts = PredictionQueueRepo::status_counts(&pool, QueueKind::Alphafold)
        .await
        .unwrap();
    assert_eq!(counts.pending, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submission_is_normalized_before_dedup(pool: PgPool) {
    let app = common::build_test_app(pool);
    let lower = post_json(
        app.clone(),
        "/api/v1/sequences",
        json!({ "sequence": SEQ.to_lowercase(), "tool": "itasser" }),
    )
    .await;
    assert_eq!(lower.status(), StatusCode::CREATED);
    assert_eq!(body_json(lower).await["data"]["record"]["sequence"], SEQ);

    // The uppercase form is the same record.
    let upper = post_json(
        app,
        "/api/v1/sequences",
        json!({ "sequence": SEQ, "tool": "itasser" }),
    )
    .await;
    assert_eq!(upper.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_sequence_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    for bad in ["", "MKTZ", "MKT1", "MKT X"] {
        let response = post_json(
            app.clone(),
            "/api/v1/sequences",
            json!({ "sequence": bad, "tool": "alphafold" }),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "sequence {bad:?} should be rejected"
        );
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_tool_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/sequences",
        json!({ "sequence": SEQ, "tool": "rosetta" }),
    )
    .await;

    // Serde rejects the unknown enum variant at extraction time.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
