use crate::SettingsStore;
use common::models::Coin;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Storage key the serialized favorites blob lives under.
pub const FAVORITES_KEY: &str = "favorite_coins";

/// The user's tracked coins: an ordered sequence, unique by coin id,
/// persisted through the settings store after every mutation.
///
/// The sequence is held in a `watch` channel so the presentation layer can
/// subscribe to changes; all mutation goes through this store. Persistence
/// failures are reported and swallowed, never surfaced as fatal.
pub struct FavoritesStore {
    settings: SettingsStore,
    state: watch::Sender<Vec<Coin>>,
}

impl FavoritesStore {
    /// Load favorites from the settings store. Missing or undecodable
    /// stored data falls back to an empty list.
    pub fn new(settings: SettingsStore) -> Self {
        let favorites = match settings.get::<Vec<Coin>>(FAVORITES_KEY) {
            Ok(Some(coins)) => coins,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load favorites, starting empty: {}", e);
                Vec::new()
            }
        };

        debug!("Loaded {} favorite coins", favorites.len());
        let (state, _) = watch::channel(favorites);

        Self { settings, state }
    }

    /// Subscribe to favorites changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Coin>> {
        self.state.subscribe()
    }

    /// Snapshot of the current favorites, in insertion order.
    pub fn favorites(&self) -> Vec<Coin> {
        self.state.borrow().clone()
    }

    /// Ids of the current favorites, in insertion order.
    pub fn ids(&self) -> Vec<String> {
        self.state.borrow().iter().map(|c| c.id.clone()).collect()
    }

    pub fn contains(&self, coin: &Coin) -> bool {
        self.state.borrow().iter().any(|c| c.id == coin.id)
    }

    /// Append `coin` unless a record with the same id is already present.
    pub fn add(&self, coin: Coin) {
        let added = self.state.send_if_modified(|favorites| {
            if favorites.iter().any(|c| c.id == coin.id) {
                false
            } else {
                favorites.push(coin.clone());
                true
            }
        });

        if added {
            self.persist();
        }
    }

    /// Remove any record matching `coin`'s id. Persists whether or not a
    /// match was found.
    pub fn remove(&self, coin: &Coin) {
        self.state
            .send_if_modified(|favorites| {
                let before = favorites.len();
                favorites.retain(|c| c.id != coin.id);
                favorites.len() != before
            });

        self.persist();
    }

    /// Replace the record matching `coin`'s id in place, preserving its
    /// position. No-op if absent.
    pub fn update(&self, coin: &Coin) {
        if self.apply_update(coin) {
            self.persist();
        }
    }

    /// Apply [`update`](Self::update) for each record in input order,
    /// persisting once at the end if anything changed.
    pub fn update_many(&self, coins: &[Coin]) {
        let mut changed = false;
        for coin in coins {
            changed |= self.apply_update(coin);
        }

        if changed {
            self.persist();
        }
    }

    fn apply_update(&self, coin: &Coin) -> bool {
        self.state.send_if_modified(|favorites| {
            match favorites.iter_mut().find(|c| c.id == coin.id) {
                Some(existing) => {
                    *existing = coin.clone();
                    true
                }
                None => false,
            }
        })
    }

    fn persist(&self) {
        let favorites = self.state.borrow().clone();
        if let Err(e) = self.settings.set(FAVORITES_KEY, &favorites) {
            warn!("Failed to save favorites: {}", e);
        }
    }
}
