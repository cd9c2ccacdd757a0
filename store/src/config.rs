use std::path::PathBuf;

const DEFAULT_DATA_FILE: &str = "cryptowatch.json";

/// Configuration for the local settings store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the JSON file holding all persisted key-value entries
    pub data_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl StoreConfig {
    /// Create a store configuration from environment variables,
    /// falling back to defaults
    pub fn from_env() -> Self {
        let data_file = std::env::var("CRYPTOWATCH_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));

        Self { data_file }
    }
}
