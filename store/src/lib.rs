mod config;
mod error;
mod favorites;
mod settings;

pub use config::StoreConfig;
pub use error::StoreError;
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use settings::SettingsStore;
