use crate::{StoreConfig, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Local key-value settings store backed by a single JSON object file.
///
/// The whole map is held in memory and rewritten on every `set`, so each
/// persisted value is a full-snapshot overwrite. A corrupt file on open is
/// reported and replaced with an empty map rather than treated as fatal.
pub struct SettingsStore {
    config: StoreConfig,
    values: Mutex<Map<String, Value>>,
}

impl SettingsStore {
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let values = match fs::read_to_string(&config.data_file) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "Corrupt settings file {}, starting empty: {}",
                        config.data_file.display(),
                        e
                    );
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(StoreError::ReadError(e)),
        };

        debug!(
            "Opened settings store at {} ({} entries)",
            config.data_file.display(),
            values.len()
        );

        Ok(Self {
            config,
            values: Mutex::new(values),
        })
    }

    /// Read and decode the value stored under `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let values = self.values.lock().unwrap();
        match values.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Store `value` under `key` and synchronously rewrite the backing file.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), serde_json::to_value(value)?);

        let serialized = serde_json::to_string_pretty(&*values)?;
        fs::write(&self.config.data_file, serialized).map_err(StoreError::WriteError)?;

        Ok(())
    }
}
