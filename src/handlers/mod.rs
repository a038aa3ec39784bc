mod aggregate;
mod health;
mod metrics;
mod roster;
mod saved;

pub use aggregate::aggregate_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use roster::roster_handler;
pub use saved::{load_roster_handler, save_roster_handler};
