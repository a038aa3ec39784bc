use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::aggregate;
use crate::error::ApiError;
use crate::handlers::aggregate::{admit, required_user, upstream};
use crate::metrics::{AGGREGATE_LATENCY, REQUEST_TOTAL};
use crate::models::RosterEntry;
use crate::period::Period;
use crate::roster::{self, RosterSelection};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RosterParams {
    user: Option<String>,
    period: Option<String>,
    comparison: Option<String>,
    health: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterReply {
    username: String,
    current_period: Period,
    comparison_period: Period,
    health_period: Period,
    roster: Vec<RosterEntry>,
}

// Aggregates and derives in one request: the roster for `period`, leveled
// against `comparison`. Same throttle as /api/aggregate.
pub async fn roster_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RosterParams>,
    headers: HeaderMap,
) -> Result<Json<RosterReply>, ApiError> {
    REQUEST_TOTAL.inc();

    admit(&state, &headers)?;

    let user = required_user(params.user)?;
    let current = parse_period(params.period.as_deref(), Period::SevenDay)?;
    let comparison = parse_period(params.comparison.as_deref(), Period::Overall)?;
    let health = match params.health.as_deref() {
        Some(tag) => Some(parse_tag(tag)?),
        None => None,
    };
    let selection = RosterSelection::new(current, comparison, health)?;

    let lastfm = upstream(&state)?;

    let start_time = Instant::now();
    let now = chrono::Utc::now().timestamp();
    let bundle = aggregate::aggregate(lastfm, &user, now).await?;
    AGGREGATE_LATENCY.observe(start_time.elapsed().as_secs_f64());

    let roster = roster::derive(&bundle, &selection);

    Ok(Json(RosterReply {
        username: user,
        current_period: selection.current,
        comparison_period: selection.comparison,
        health_period: selection.health,
        roster,
    }))
}

fn parse_period(tag: Option<&str>, default: Period) -> Result<Period, ApiError> {
    match tag {
        Some(tag) => parse_tag(tag),
        None => Ok(default),
    }
}

fn parse_tag(tag: &str) -> Result<Period, ApiError> {
    tag.parse()
        .map_err(|_| ApiError::InvalidPeriod(tag.to_string()))
}
