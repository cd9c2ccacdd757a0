pub mod coingecko;

use async_trait::async_trait;
use common::{
    models::{Coin, SearchHit},
    Result,
};

/// Trait defining the interface for market-data API clients
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Get the top `limit` coins by descending market cap, priced in USD
    async fn top_markets(&self, limit: usize) -> Result<Vec<Coin>>;

    /// Search coins by name or symbol; returns lightweight metadata only
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Resolve a set of coin ids into full market records
    async fn markets_by_ids(&self, ids: &[String]) -> Result<Vec<Coin>>;
}
