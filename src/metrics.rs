use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("roster_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "roster_rate_limited_total",
        "Requests rejected by the throttle"
    )
    .unwrap();
    pub static ref UPSTREAM_ERRORS: Counter = register_counter!(
        "roster_upstream_errors_total",
        "Failed upstream stats calls"
    )
    .unwrap();
    pub static ref AGGREGATE_LATENCY: Histogram = register_histogram!(
        "roster_aggregate_latency_seconds",
        "Chart aggregation latency in seconds"
    )
    .unwrap();
}
