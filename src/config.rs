use serde::Deserialize;

use crate::services::client::{DEFAULT_BASE_URL, DEFAULT_LIMIT};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommendation backend base URL, including the `/api` prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Result count requested when a command does not give one
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            default_limit: default_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
