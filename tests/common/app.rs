use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;

use vocab_review_backend::config::{Config, ReviewEnvConfig};
use vocab_review_backend::review::ReviewScheduler;
use vocab_review_backend::routes::build_router;
use vocab_review_backend::state::AppState;
use vocab_review_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<Store>,
    pub config: Config,
    _temp_dir: TempDir,
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with_review_config(ReviewEnvConfig {
        jitter_seed: Some(42),
        ..ReviewEnvConfig::default()
    })
    .await
}

pub async fn spawn_with_review_config(review: ReviewEnvConfig) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("vocab-review-test.sled");

    // Built directly instead of via set_var so parallel tests don't race on env.
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        jwt_secret: format!("integration-test-jwt-secret-{}", uuid::Uuid::new_v4()),
        cors_origin: "http://localhost:5173".to_string(),
        review,
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let scheduler = Arc::new(ReviewScheduler::new(store.clone(), config.review.jitter_seed));
    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(store.clone(), scheduler, &config, shutdown_tx);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        store,
        config,
        _temp_dir: temp_dir,
    }
}
