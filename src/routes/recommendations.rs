use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    error::AppResult, middleware::current_user::CurrentUser, models::ChartRecommendation,
    routes::AppState,
};

/// Handler for the recommendations endpoint
///
/// The request is cancelled when it exceeds the configured timeout or when
/// the client goes away.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ChartRecommendation>>> {
    tracing::info!(user_id = %user, "Processing recommendation request");

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let timeout = state.request_timeout;
    let deadline = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!(timeout_ms = timeout.as_millis(), "Recommendation request timed out");
            cancel.cancel();
        }
    });

    let result = state.engine.get_recommendations(user.0, &cancel).await;
    deadline.abort();

    Ok(Json(result?))
}
