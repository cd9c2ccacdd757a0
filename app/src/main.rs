mod config;
mod service;

use config::AppConfig;
use connectors::coingecko::CoinGeckoConnector;
use service::MarketDataService;
use std::sync::Arc;
use store::{FavoritesStore, SettingsStore, StoreConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting CryptoWatch");

    // Load configuration from environment
    let app_config = AppConfig::from_env();
    let store_config = StoreConfig::from_env();

    // Open local persistence and load favorites
    let settings = SettingsStore::open(store_config)
        .map_err(|e| format!("Failed to open settings store: {}", e))?;
    let favorites = Arc::new(FavoritesStore::new(settings));

    // Create the market-data service against the live CoinGecko API
    let source = Arc::new(CoinGeckoConnector::new());
    let service = Arc::new(MarketDataService::new(source, Arc::clone(&favorites)));

    // Log state changes; a real presentation layer subscribes the same way
    let mut market_updates = service.subscribe();
    let mut favorite_updates = favorites.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = market_updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = market_updates.borrow_and_update().clone();
                    if let Some(message) = state.error_message {
                        warn!("{}", message);
                    } else if !state.is_loading {
                        info!(
                            "{} top coins, {} search results",
                            state.top_coins.len(),
                            state.search_results.len()
                        );
                    }
                }
                changed = favorite_updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let favorites = favorite_updates.borrow_and_update().clone();
                    for coin in &favorites {
                        info!(
                            "{}: {} ({})",
                            coin.name,
                            coin.formatted_price(),
                            coin.formatted_price_change()
                        );
                    }
                }
            }
        }
    });

    service.fetch_top_coins(app_config.top_limit).await;
    service.start_periodic_refresh(app_config.refresh_interval_secs);

    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    service.stop_periodic_refresh();

    Ok(())
}
