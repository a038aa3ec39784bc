mod aggregate;
mod config;
mod error;
mod handlers;
mod lastfm;
mod metrics;
mod models;
mod period;
mod rate_limit;
mod roster;
mod state;

use axum::{Router, routing::get};
use clap::Parser;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Args;
use crate::lastfm::LastfmClient;
use crate::rate_limit::RequestThrottle;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    // parse cli arguments
    let args = Args::parse();

    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("LASTFM_API_KEY").ok());
    if api_key.is_none() {
        println!("Warning: no API key configured, aggregation requests will return 500");
    }

    let lastfm = api_key.map(|key| {
        LastfmClient::new(
            reqwest::Client::new(),
            args.api_url.clone(),
            key,
            Duration::from_secs(args.upstream_timeout),
        )
    });

    // creating shared state
    let state = Arc::new(AppState {
        lastfm,
        throttle: RequestThrottle::new(args.rate_limit, args.rate_window * 1000),
        saved_rosters: DashMap::new(),
    });

    // creating the router with routes
    let app = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/aggregate", get(handlers::aggregate_handler))
        .route("/api/roster", get(handlers::roster_handler))
        .route(
            "/api/saved",
            get(handlers::load_roster_handler).post(handlers::save_roster_handler),
        )
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    println!("Gateway running on http://localhost:{}", args.port);
    println!("Forwarding to stats API at {}", args.api_url);
    println!(
        "Rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );
    axum::serve(listener, app).await.unwrap();
}
