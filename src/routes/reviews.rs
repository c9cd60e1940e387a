use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthLearner;
use crate::extractors::{JsonBody, QueryParams};
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation::{clamp_limit, parse_difficulty, parse_review_status, validate_id};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/initialize/:topic_id", post(initialize_topic))
        .route("/review/:topic_id", get(review_words))
        .route("/update", post(update_review))
        .route("/stats/:topic_id", get(topic_stats))
        .route("/by-status/:topic_id", get(words_by_status))
        .route("/items/:topic_id/:word_id", get(review_item))
        .route("/learned-topics", get(learned_topics))
}

async fn initialize_topic(
    auth: AuthLearner,
    Path(topic_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_id("topicId", &topic_id)?;
    let scheduler = state.scheduler();
    let active = scheduler.active_track(&auth.learner_id)?;
    let outcome = scheduler.initialize_topic(&active, &topic_id)?;
    Ok(ok(outcome))
}

#[derive(Debug, Deserialize)]
struct ReviewQuery {
    limit: Option<usize>,
}

async fn review_words(
    auth: AuthLearner,
    Path(topic_id): Path<String>,
    QueryParams(q): QueryParams<ReviewQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_id("topicId", &topic_id)?;
    let review_cfg = &state.config().review;
    let limit = clamp_limit(q.limit, review_cfg.default_limit, review_cfg.max_limit);

    let scheduler = state.scheduler();
    let active = scheduler.active_track(&auth.learner_id)?;
    let words = scheduler.select_due_words(&active, &topic_id, limit)?;
    Ok(ok(words))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateReviewRequest {
    topic_id: String,
    word_id: String,
    difficulty: String,
}

async fn update_review(
    auth: AuthLearner,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateReviewRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_id("topicId", &req.topic_id)?;
    validate_id("wordId", &req.word_id)?;
    let grade = parse_difficulty(&req.difficulty)?;

    let scheduler = state.scheduler();
    let active = scheduler.active_track(&auth.learner_id)?;
    scheduler.record_review(&active, &req.topic_id, &req.word_id, grade)?;
    Ok(ok(serde_json::Value::Null))
}

async fn topic_stats(
    auth: AuthLearner,
    Path(topic_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_id("topicId", &topic_id)?;
    let scheduler = state.scheduler();
    let active = scheduler.active_track(&auth.learner_id)?;
    Ok(ok(scheduler.stats(&active, &topic_id)?))
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

async fn words_by_status(
    auth: AuthLearner,
    Path(topic_id): Path<String>,
    QueryParams(q): QueryParams<StatusQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_id("topicId", &topic_id)?;
    let filter = parse_review_status(q.status.as_deref())?;

    let scheduler = state.scheduler();
    let active = scheduler.active_track(&auth.learner_id)?;
    Ok(ok(scheduler.list_by_status(&active, &topic_id, filter)?))
}

async fn review_item(
    auth: AuthLearner,
    Path((topic_id, word_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_id("topicId", &topic_id)?;
    validate_id("wordId", &word_id)?;

    let scheduler = state.scheduler();
    let active = scheduler.active_track(&auth.learner_id)?;
    Ok(ok(scheduler.review_item(&active, &topic_id, &word_id)?))
}

#[derive(Debug, Serialize)]
struct LearnedTopics {
    count: u64,
}

async fn learned_topics(
    auth: AuthLearner,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let scheduler = state.scheduler();
    let active = scheduler.active_track(&auth.learner_id)?;
    let count = scheduler.learned_topic_count(&active)?;
    Ok(ok(LearnedTopics { count }))
}
