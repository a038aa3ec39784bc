use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "roster-gateway")]
#[command(about = "Chart aggregation gateway that turns Last.fm history into game rosters")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Upstream stats API root
    #[arg(long, default_value = "http://ws.audioscrobbler.com/2.0/")]
    pub api_url: String,

    // Shared upstream credential; falls back to the LASTFM_API_KEY env var.
    // A server without one still boots and answers 500 on aggregation.
    #[arg(long)]
    pub api_key: Option<String>,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 300)]
    pub rate_window: u64,

    // Timeout for each upstream call in seconds
    #[arg(long, default_value_t = 10)]
    pub upstream_timeout: u64,
}
