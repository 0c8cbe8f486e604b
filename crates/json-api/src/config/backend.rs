//! Backend Config

use clap::Args;

/// Hosted tabular backend and identity service settings.
#[derive(Debug, Args)]
pub struct BackendSettings {
    /// Project base URL
    #[arg(long = "url", env = "BACKEND_URL")]
    pub url: String,

    /// Public API key sent with every request
    #[arg(long, env = "BACKEND_ANON_KEY", hide_env_values = true)]
    pub anon_key: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub timeout_seconds: u64,
}
