use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{SaveRosterRequest, SavedRoster};
use crate::state::AppState;

// Trivial keyed store for a user's arranged roster (sprites and such).
// Payloads are opaque; nothing here survives a restart.

pub async fn save_roster_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveRosterRequest>,
) -> Result<Json<Value>, ApiError> {
    let username = payload
        .username
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingParameter("username"))?;
    let artists = payload
        .artists
        .ok_or(ApiError::MissingParameter("artists"))?;

    state.saved_rosters.insert(username, artists);
    Ok(Json(serde_json::json!({ "message": "saved successfully" })))
}

#[derive(Deserialize)]
pub struct LoadRosterParams {
    user: Option<String>,
}

pub async fn load_roster_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoadRosterParams>,
) -> Result<Json<SavedRoster>, ApiError> {
    let username = params
        .user
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingParameter("user"))?;

    let artists = state
        .saved_rosters
        .get(&username)
        .map(|entry| entry.value().clone())
        .unwrap_or(Value::Array(Vec::new()));

    Ok(Json(SavedRoster { username, artists }))
}
