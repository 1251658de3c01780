//! CLI argument definitions.

use clap::Parser;

use crate::prediction::{DEFAULT_API_BASE_URL, XTTS_V2_VERSION};

/// Voice-cloning prediction proxy.
#[derive(Parser, Debug)]
#[command(name = "clone-proxy")]
#[command(about = "HTTP proxy that runs voice-cloning predictions on Replicate")]
#[command(version)]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Replicate API token
    #[arg(long, env = "REPLICATE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Prediction service base URL
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Model version used for every prediction
    #[arg(long, default_value = XTTS_V2_VERSION)]
    pub model_version: String,

    /// Wait before the first status poll, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Longest wait between status polls, in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub poll_max_interval_ms: u64,

    /// Growth factor applied to the wait after each poll
    #[arg(long, default_value_t = 1.5)]
    pub poll_multiplier: f64,

    /// Give up after this many status polls
    #[arg(long, default_value_t = 120)]
    pub poll_max_attempts: u32,

    /// Limit on each request to the prediction service, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub request_timeout_ms: u64,

    /// Limit on connecting to the prediction service, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub connect_timeout_ms: u64,

    /// Largest accepted request body, in bytes
    #[arg(long, default_value_t = 4_718_592)]
    pub max_body_bytes: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "clone_proxy=debug,info"
        } else {
            "info"
        }
    }
}
