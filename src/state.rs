use dashmap::DashMap;
use serde_json::Value;

use crate::lastfm::LastfmClient;
use crate::rate_limit::RequestThrottle;

// app's shared state. The throttle is the only mutable state the pipeline
// itself needs; saved rosters are an unrelated keyed store.
pub struct AppState {
    pub lastfm: Option<LastfmClient>, // None until a credential is configured
    pub throttle: RequestThrottle,
    pub saved_rosters: DashMap<String, Value>,
}
