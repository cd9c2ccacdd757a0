use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Seconds between periodic refresh ticks
    pub refresh_interval_secs: u64,
    /// How many coins the top-coins list holds
    pub top_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            top_limit: 100,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let refresh_interval_secs = std::env::var("CRYPTOWATCH_REFRESH_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.refresh_interval_secs);
        let top_limit = std::env::var("CRYPTOWATCH_TOP_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.top_limit);

        Self {
            refresh_interval_secs,
            top_limit,
        }
    }
}
