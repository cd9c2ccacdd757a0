use common::models::Coin;
use connectors::MarketDataSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use store::FavoritesStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// How many coins a refresh tick re-fetches for the top list.
pub const DEFAULT_TOP_LIMIT: usize = 100;
/// Search hits hydrated into full market records per query.
const MAX_SEARCH_HYDRATIONS: usize = 20;

/// Observable service state, published through a `watch` channel.
#[derive(Debug, Clone, Default)]
pub struct MarketState {
    /// Top coins by market cap, in the order the API returned them
    pub top_coins: Vec<Coin>,
    /// Hydrated search results (also holds detail-lookup results)
    pub search_results: Vec<Coin>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// Fetches coin lists and search results from a [`MarketDataSource`] and
/// keeps the favorites store fed with fresh records via a periodic refresh
/// task.
///
/// Result lists are replaced wholesale on each successful fetch. Each list
/// carries a sequence counter bumped when a fetch is issued; a completion
/// is applied only if no later fetch of the same list was issued meanwhile,
/// so a slow response cannot overwrite a faster, newer one.
pub struct MarketDataService {
    source: Arc<dyn MarketDataSource>,
    favorites: Arc<FavoritesStore>,
    state: watch::Sender<MarketState>,
    top_seq: AtomicU64,
    search_seq: AtomicU64,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl MarketDataService {
    pub fn new(source: Arc<dyn MarketDataSource>, favorites: Arc<FavoritesStore>) -> Self {
        let (state, _) = watch::channel(MarketState::default());

        Self {
            source,
            favorites,
            state,
            top_seq: AtomicU64::new(0),
            search_seq: AtomicU64::new(0),
            refresh_task: Mutex::new(None),
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<MarketState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> MarketState {
        self.state.borrow().clone()
    }

    /// Fetch the top `limit` coins by market cap and replace `top_coins`
    /// with the result. On failure the previous list is kept and
    /// `error_message` is set.
    pub async fn fetch_top_coins(&self, limit: usize) {
        let seq = self.top_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });

        let result = self.source.top_markets(limit).await;

        if self.top_seq.load(Ordering::SeqCst) != seq {
            debug!("Discarding stale top coins response (seq {})", seq);
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = false;
            match result {
                Ok(coins) => {
                    debug!("Fetched {} top coins", coins.len());
                    s.top_coins = coins;
                }
                Err(e) => {
                    warn!("Failed to fetch top coins: {}", e);
                    s.error_message = Some(format!("Failed to fetch coins: {}", e));
                }
            }
        });
    }

    /// Search coins by name or symbol and hydrate the first matches into
    /// full market records. A blank query clears the results without
    /// touching the network.
    pub async fn search_coins(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.search_seq.fetch_add(1, Ordering::SeqCst);
            self.state.send_modify(|s| s.search_results.clear());
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });

        let hits = self.source.search(query).await;
        self.state.send_modify(|s| s.is_loading = false);

        match hits {
            Ok(hits) => {
                let ids: Vec<String> = hits
                    .into_iter()
                    .take(MAX_SEARCH_HYDRATIONS)
                    .map(|hit| hit.id)
                    .collect();
                self.fetch_coin_details(&ids).await;
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                self.state
                    .send_modify(|s| s.error_message = Some(format!("Search failed: {}", e)));
            }
        }
    }

    /// Resolve `ids` into full market records and replace `search_results`.
    /// Empty `ids` clears the results synchronously, without a request.
    ///
    /// Returns the decoded records so the refresh path can feed them into
    /// the favorites store; `None` means the fetch failed and
    /// `error_message` was set.
    pub async fn fetch_coin_details(&self, ids: &[String]) -> Option<Vec<Coin>> {
        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        if ids.is_empty() {
            self.state.send_modify(|s| s.search_results.clear());
            return Some(Vec::new());
        }

        match self.source.markets_by_ids(ids).await {
            Ok(coins) => {
                if self.search_seq.load(Ordering::SeqCst) == seq {
                    let snapshot = coins.clone();
                    self.state.send_modify(move |s| s.search_results = snapshot);
                } else {
                    debug!("Discarding stale coin details response (seq {})", seq);
                }
                Some(coins)
            }
            Err(e) => {
                warn!("Failed to fetch coin details: {}", e);
                self.state.send_modify(|s| {
                    s.error_message = Some(format!("Failed to fetch coin details: {}", e))
                });
                None
            }
        }
    }

    /// Re-fetch the given favorite ids and push the fresh records into the
    /// favorites store. No-op on empty input.
    pub async fn update_favorite_coins(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }

        if let Some(coins) = self.fetch_coin_details(ids).await {
            self.favorites.update_many(&coins);
        }
    }

    /// Arm the repeating refresh task, cancelling any existing one. The
    /// first refresh runs one interval after the call.
    pub fn start_periodic_refresh(self: &Arc<Self>, interval_secs: u64) {
        self.stop_periodic_refresh();

        // Weak, so the timer dies with the service instead of keeping it alive.
        let service = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the interval yields immediately on the first tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(service) = service.upgrade() else {
                    break;
                };
                service.refresh_tick().await;
            }
        });

        *self.refresh_task.lock().unwrap() = Some(handle);
    }

    /// Cancel the refresh task. Idempotent; in-flight fetches are not
    /// cancelled, merely discarded if stale.
    pub fn stop_periodic_refresh(&self) {
        if let Some(handle) = self.refresh_task.lock().unwrap().take() {
            handle.abort();
        }
    }

    async fn refresh_tick(&self) {
        let favorite_ids = self.favorites.ids();
        if !favorite_ids.is_empty() {
            self.update_favorite_coins(&favorite_ids).await;
        }

        let top_coins_shown = !self.state.borrow().top_coins.is_empty();
        if top_coins_shown {
            self.fetch_top_coins(DEFAULT_TOP_LIMIT).await;
        }
    }
}

impl Drop for MarketDataService {
    fn drop(&mut self) {
        self.stop_periodic_refresh();
    }
}
