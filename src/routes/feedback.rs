use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::current_user::CurrentUser,
    models::{Feedback, RecommendationCategory},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub chart_id: Uuid,
    pub suggestion_category: RecommendationCategory,
    pub should_hide: bool,
}

/// Records a show/hide signal for one recommendation
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<FeedbackRequest>,
) -> AppResult<Json<Value>> {
    let feedback = Feedback {
        chart_id: request.chart_id,
        suggestion_category: request.suggestion_category,
        should_hide: request.should_hide,
    };
    state.engine.submit_feedback(user.0, feedback).await?;

    Ok(Json(json!({ "recorded": true })))
}

/// Lists the caller's stored feedback
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Feedback>>> {
    let feedback = state.engine.feedback(user.0).await?;
    Ok(Json(feedback))
}
