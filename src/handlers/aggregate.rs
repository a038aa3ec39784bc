use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::aggregate;
use crate::error::ApiError;
use crate::lastfm::LastfmClient;
use crate::metrics::{AGGREGATE_LATENCY, RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::models::ChartBundle;
use crate::rate_limit::client_key;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AggregateParams {
    user: Option<String>,
}

pub async fn aggregate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AggregateParams>,
    headers: HeaderMap,
) -> Result<Json<ChartBundle>, ApiError> {
    REQUEST_TOTAL.inc();

    // throttle first, before any parameter validation
    admit(&state, &headers)?;

    let user = required_user(params.user)?;
    let lastfm = upstream(&state)?;

    let start_time = Instant::now();
    let now = chrono::Utc::now().timestamp();
    let bundle = aggregate::aggregate(lastfm, &user, now).await?;
    AGGREGATE_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(bundle))
}

// Shared request plumbing for the aggregation-backed endpoints

pub fn admit(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let key = client_key(headers);
    let now_ms = chrono::Utc::now().timestamp_millis() as u64;
    if !state.throttle.admit(&key, now_ms) {
        RATE_LIMITED_TOTAL.inc();
        return Err(ApiError::RateLimited);
    }
    Ok(())
}

pub fn required_user(user: Option<String>) -> Result<String, ApiError> {
    user.filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingParameter("user"))
}

pub fn upstream(state: &AppState) -> Result<&LastfmClient, ApiError> {
    state.lastfm.as_ref().ok_or(ApiError::MissingApiKey)
}
