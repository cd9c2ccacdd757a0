use serde::{Deserialize, Serialize};

/// Lightweight match returned by the CoinGecko `/search` endpoint.
///
/// Carries no market data; hits must be hydrated into full [`Coin`] records
/// through a follow-up `/coins/markets` lookup by id.
///
/// [`Coin`]: crate::models::Coin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// Thumbnail icon URL
    pub thumb: Option<String>,
    /// Full-size icon URL
    pub large: Option<String>,
}
