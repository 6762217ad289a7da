//! Recommendation gateway endpoint

use crate::error::ApiResult;
use crate::routes::metrics::RECOMMENDATION_REQUESTS;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use health_calculators_shared::{RecommendationRequest, RecommendationResponse};
use tracing::{info, instrument};

/// POST /api/v1/recommendations
///
/// Validates the snapshot, calls the upstream once and returns
/// `{recommendations}`. Failures come back as `{error, code}`.
#[instrument(skip_all)]
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendationResponse>> {
    let outcome = generate(&state, payload).await;

    let label = match &outcome {
        Ok(_) => "success",
        Err(_) => "failure",
    };
    ::metrics::counter!(RECOMMENDATION_REQUESTS, "outcome" => label).increment(1);

    outcome
}

async fn generate(
    state: &AppState,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;
    let snapshot = request.into_snapshot()?;

    info!(bmi = snapshot.bmi, "Requesting recommendations");
    let recommendations = state.gateway().recommend(&snapshot).await?;

    Ok(Json(RecommendationResponse { recommendations }))
}
