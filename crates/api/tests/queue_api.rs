//! Integration tests for the queue status endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

use profold_db::models::queue_entry::QueueKind;
use profold_db::repositories::PredictionQueueRepo;

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_queues_report_zero_counts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/queue/status").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    // The scheduler loop is not running inside the test app.
    assert_eq!(data["scheduler_running"], false);
    for tool in ["alphafold", "itasser"] {
        for status in ["pending", "processing", "completed", "failed"] {
            assert_eq!(data[tool][status], 0, "{tool}.{status}");
        }
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn counts_follow_queue_state(pool: PgPool) {
    PredictionQueueRepo::enroll(&pool, QueueKind::Alphafold, "MKTAYIAKQR", None)
        .await
        .unwrap()
        .unwrap();
    PredictionQueueRepo::enroll(&pool, QueueKind::Alphafold, "GAVLIPFMW", None)
        .await
        .unwrap()
        .unwrap();
    PredictionQueueRepo::claim_oldest_pending(&pool, QueueKind::Alphafold)
        .await
        .unwrap()
        .unwrap();
    PredictionQueueRepo::enroll(&pool, QueueKind::Itasser, "MKTAYIAKQR", None)
        .await
        .unwrap()
        .unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/queue/status").await;
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["alphafold"]["pending"], 1);
    assert_eq!(data["alphafold"]["processing"], 1);
    assert_eq!(data["itasser"]["pending"], 1);
    assert_eq!(data["itasser"]["processing"], 0);
}
