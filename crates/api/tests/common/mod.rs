use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use profold_api::config::ServerConfig;
use profold_api::routes;
use profold_api::state::AppState;
use profold_pipeline::config::PipelineConfig;
use profold_pipeline::Pipeline;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Pipeline config whose external tools and endpoints all point nowhere,
/// so a test that accidentally reaches one fails fast instead of calling
/// out.
pub fn test_pipeline_config() -> PipelineConfig {
    let root = std::env::temp_dir().join("profold-api-tests");
    PipelineConfig {
        poll_interval_secs: 1,
        retention_hours: 24,
        models_dir: root.join("models"),
        work_root: root.join("work"),
        rpsblast_path: PathBuf::from("/nonexistent/rpsblast"),
        rpsbproc_path: PathBuf::from("/nonexistent/rpsbproc"),
        cdd_db_path: PathBuf::from("/nonexistent/Cdd"),
        conda_sh: PathBuf::from("/nonexistent/conda.sh"),
        alphafold_script: PathBuf::from("/nonexistent/run_alphafold.sh"),
        alphafold_data_dir: PathBuf::from("/nonexistent/alphadata"),
        itasser_script: PathBuf::from("/nonexistent/runI-TASSER.pl"),
        itasser_lib_dir: PathBuf::from("/nonexistent/itasser_lib"),
        esmfold_endpoint: "http://127.0.0.1:9/".to_string(),
        rcsb_endpoint: "http://127.0.0.1:9/".to_string(),
        solvent_accessibility_script: None,
        rc_score_script: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The scheduler is not started.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_server_config();
    let Pipeline {
        registry,
        decomposer,
        scheduler,
    } = Pipeline::new(pool.clone(), &test_pipeline_config());

    let state = AppState {
        pool,
        config: Arc::new(config),
        registry: Arc::new(registry),
        decomposer: Arc::new(decomposer),
        scheduler_running: scheduler.running_flag(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
