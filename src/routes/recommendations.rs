use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Recommendation, RecommendationRequest},
    routes::AppState,
    services::recommendations,
};

/// Handler for the recommendations endpoint
///
/// Responds with the bare array of recommendations on success. Every failure
/// is logged here and rendered by `AppError` as a `{message, error?}` body.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    if let Err(e) = state.provider.ensure_configured() {
        tracing::error!(
            request_id = %request_id,
            status = e.status().as_u16(),
            error = %e,
            "Recommendation request failed"
        );
        return Err(e);
    }

    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(
            request_id = %request_id,
            error = %rejection.body_text(),
            "Rejected malformed recommendation request"
        );
        AppError::InvalidInput(rejection.body_text())
    })?;

    tracing::info!(
        request_id = %request_id,
        city = %request.city,
        profile_len = request.profile.len(),
        images = request.images.len(),
        "Processing recommendation request"
    );

    let result = recommendations::get_recommendations(state.provider.clone(), request).await;

    match result {
        Ok(recommendations) => {
            tracing::info!(
                request_id = %request_id,
                count = recommendations.len(),
                "Recommendation request completed"
            );
            Ok(Json(recommendations))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                status = e.status().as_u16(),
                error = %e,
                "Recommendation request failed"
            );
            Err(e)
        }
    }
}

/// Any verb other than POST on the recommendations path
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
