use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::auth::AuthLearner;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation::validate_language_code;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activate", post(activate))
        .route("/active", get(active))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivateRequest {
    language_code: String,
}

async fn activate(
    auth: AuthLearner,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ActivateRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let language_code = req.language_code.trim();
    validate_language_code(language_code)?;

    let track = state
        .store()
        .activate_learning_track(&auth.learner_id, language_code)?;
    Ok(ok(track))
}

async fn active(
    auth: AuthLearner,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let track = state
        .store()
        .get_active_learning_track(&auth.learner_id)?
        .ok_or_else(|| {
            AppError::not_found(
                "NO_ACTIVE_TRACK",
                "No active learning track; choose a language to study first",
            )
        })?;
    Ok(ok(track))
}
