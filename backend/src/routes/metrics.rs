//! Prometheus exposition endpoint

use crate::state::AppState;
use axum::extract::State;

/// Counter incremented once per recommendation request, labelled by outcome
pub const RECOMMENDATION_REQUESTS: &str = "recommendation_requests_total";

pub async fn render(State(state): State<AppState>) -> String {
    state.metrics.render()
}
