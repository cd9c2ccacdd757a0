use crate::MarketDataSource;
use async_trait::async_trait;
use common::{
    models::{Coin, SearchHit},
    Error, Result,
};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, error};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Detail lookups resolve at most this many ids per request.
const MAX_IDS_PER_PAGE: usize = 250;

pub struct CoinGeckoConnector {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    coins: Vec<SearchHit>,
}

impl Default for CoinGeckoConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoConnector {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: COINGECKO_API_URL.to_string(),
        }
    }

    /// Point the connector at a different API root, e.g. a pro-tier mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn markets_url(&self, params: &[(&str, &str)]) -> Result<Url> {
        Url::parse_with_params(&format!("{}/coins/markets", self.base_url), params)
            .map_err(|e| Error::InvalidRequest(format!("bad markets URL: {}", e)))
    }

    async fn fetch_markets(&self, url: Url) -> Result<Vec<Coin>> {
        debug!("Fetching markets from CoinGecko: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("CoinGecko API error: {} - {}", status, error_text);
            return Err(Error::NetworkFailure(format!(
                "CoinGecko API error: {} - {}",
                status, error_text
            )));
        }

        let coins = response.json::<Vec<Coin>>().await?;
        Ok(coins)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoConnector {
    async fn top_markets(&self, limit: usize) -> Result<Vec<Coin>> {
        let per_page = limit.to_string();
        let url = self.markets_url(&[
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", &per_page),
            ("page", "1"),
            ("sparkline", "false"),
            ("price_change_percentage", "24h"),
        ])?;

        self.fetch_markets(url).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("query", query)],
        )
        .map_err(|e| Error::InvalidRequest(format!("bad search URL: {}", e)))?;

        debug!("Searching CoinGecko: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("CoinGecko API error: {} - {}", status, error_text);
            return Err(Error::NetworkFailure(format!(
                "CoinGecko API error: {} - {}",
                status, error_text
            )));
        }

        let results = response.json::<SearchResponse>().await?;
        Ok(results.coins)
    }

    async fn markets_by_ids(&self, ids: &[String]) -> Result<Vec<Coin>> {
        let ids_csv = ids.join(",");
        let per_page = MAX_IDS_PER_PAGE.to_string();
        let url = self.markets_url(&[
            ("vs_currency", "usd"),
            ("ids", &ids_csv),
            ("order", "market_cap_desc"),
            ("per_page", &per_page),
            ("page", "1"),
            ("sparkline", "false"),
            ("price_change_percentage", "24h"),
        ])?;

        self.fetch_markets(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_top_markets_url_with_fixed_query_shape() {
        let connector = CoinGeckoConnector::new();
        let url = connector
            .markets_url(&[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", "100"),
                ("page", "1"),
                ("sparkline", "false"),
                ("price_change_percentage", "24h"),
            ])
            .unwrap();

        assert_eq!(url.path(), "/api/v3/coins/markets");
        assert_eq!(
            url.query().unwrap(),
            "vs_currency=usd&order=market_cap_desc&per_page=100&page=1&sparkline=false&price_change_percentage=24h"
        );
    }

    #[test]
    fn search_query_is_percent_encoded() {
        let url = Url::parse_with_params(
            &format!("{}/search", COINGECKO_API_URL),
            &[("query", "bitcoin cash")],
        )
        .unwrap();
        assert_eq!(url.query().unwrap(), "query=bitcoin+cash");
    }

    #[test]
    fn decodes_search_response_envelope() {
        let body = r#"{
            "coins": [
                {"id": "bitcoin", "name": "Bitcoin", "symbol": "BTC",
                 "thumb": "https://example.com/t.png", "large": "https://example.com/l.png"},
                {"id": "bitcoin-cash", "name": "Bitcoin Cash", "symbol": "BCH"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.coins.len(), 2);
        assert_eq!(response.coins[0].id, "bitcoin");
        assert_eq!(response.coins[1].thumb, None);
    }
}
