use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cryptocurrency's market snapshot, as returned by the CoinGecko
/// `/coins/markets` endpoint. Field names match the API's snake_case JSON
/// one to one, so no serde renames are needed.
///
/// Every market field is optional: the API omits values it does not have
/// for a given coin. Only `id`, `symbol` and `name` are guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coin {
    /// Unique identifier for the coin (e.g., "bitcoin", "ethereum")
    pub id: String,
    /// Ticker symbol (e.g., "btc", "eth")
    pub symbol: String,
    /// Human-readable name (e.g., "Bitcoin", "Ethereum")
    pub name: String,
    /// Icon URL
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub fully_diluted_valuation: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    pub ath_date: Option<DateTime<Utc>>,
    pub atl: Option<f64>,
    pub atl_change_percentage: Option<f64>,
    pub atl_date: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Semantic classification of a 24h price move, for the display layer to
/// map onto colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
    /// No change data available
    Flat,
}

impl Coin {
    /// True when `other` is a later snapshot of the same coin.
    pub fn same_coin(&self, other: &Coin) -> bool {
        self.id == other.id
    }

    /// Price formatted for display: "$0.000123" below a dollar, "$123.45"
    /// otherwise, "N/A" when absent.
    pub fn formatted_price(&self) -> String {
        match self.current_price {
            Some(price) if price < 1.0 => format!("${:.6}", price),
            Some(price) => format!("${:.2}", price),
            None => "N/A".to_string(),
        }
    }

    /// 24h change with an explicit sign, e.g. "+2.31%" or "-0.50%".
    pub fn formatted_price_change(&self) -> String {
        match self.price_change_percentage_24h {
            Some(change) if change >= 0.0 => format!("+{:.2}%", change),
            Some(change) => format!("{:.2}%", change),
            None => "N/A".to_string(),
        }
    }

    pub fn price_direction(&self) -> PriceDirection {
        match self.price_change_percentage_24h {
            Some(change) if change >= 0.0 => PriceDirection::Up,
            Some(_) => PriceDirection::Down,
            None => PriceDirection::Flat,
        }
    }

    pub fn formatted_market_cap(&self) -> String {
        match self.market_cap {
            Some(cap) => format_large_number(cap),
            None => "N/A".to_string(),
        }
    }

    pub fn formatted_volume(&self) -> String {
        match self.total_volume {
            Some(volume) => format_large_number(volume),
            None => "N/A".to_string(),
        }
    }
}

/// Human-scaled dollar amount: "$1.23B", "$45.60M", "$7.80K", "$123.00".
fn format_large_number(value: f64) -> String {
    const BILLION: f64 = 1_000_000_000.0;
    const MILLION: f64 = 1_000_000.0;
    const THOUSAND: f64 = 1_000.0;

    if value >= BILLION {
        format!("${:.2}B", value / BILLION)
    } else if value >= MILLION {
        format!("${:.2}M", value / MILLION)
    } else if value >= THOUSAND {
        format!("${:.2}K", value / THOUSAND)
    } else {
        format!("${:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coin(id: &str, price: Option<f64>, change: Option<f64>) -> Coin {
        serde_json::from_value(json!({
            "id": id,
            "symbol": id.chars().take(3).collect::<String>(),
            "name": id,
            "current_price": price,
            "price_change_percentage_24h": change,
        }))
        .unwrap()
    }

    #[test]
    fn decodes_full_markets_row() {
        let value = json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 45000.0,
            "market_cap": 880_000_000_000.0_f64,
            "market_cap_rank": 1,
            "fully_diluted_valuation": 945_000_000_000.0_f64,
            "total_volume": 32_000_000_000.0_f64,
            "high_24h": 45900.0,
            "low_24h": 44100.0,
            "price_change_24h": 350.5,
            "price_change_percentage_24h": 0.78,
            "market_cap_change_24h": 6_500_000_000.0_f64,
            "market_cap_change_percentage_24h": 0.74,
            "circulating_supply": 19_500_000.0,
            "total_supply": 21_000_000.0,
            "max_supply": 21_000_000.0,
            "ath": 69045.0,
            "ath_change_percentage": -34.8,
            "ath_date": "2021-11-10T14:24:11.849Z",
            "atl": 67.81,
            "atl_change_percentage": 66263.3,
            "atl_date": "2013-07-06T00:00:00.000Z",
            "last_updated": "2024-05-01T12:00:00.000Z"
        });

        let coin: Coin = serde_json::from_value(value).unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.market_cap_rank, Some(1));
        assert_eq!(coin.ath_date.unwrap().to_rfc3339(), "2021-11-10T14:24:11.849+00:00");
    }

    #[test]
    fn decodes_row_with_missing_market_fields() {
        let value = json!({ "id": "obscurecoin", "symbol": "obs", "name": "ObscureCoin" });
        let coin: Coin = serde_json::from_value(value).unwrap();
        assert_eq!(coin.current_price, None);
        assert_eq!(coin.formatted_price(), "N/A");
        assert_eq!(coin.price_direction(), PriceDirection::Flat);
    }

    #[test]
    fn formats_prices_by_magnitude() {
        assert_eq!(coin("bitcoin", Some(45000.0), None).formatted_price(), "$45000.00");
        assert_eq!(coin("shiba-inu", Some(0.000024), None).formatted_price(), "$0.000024");
    }

    #[test]
    fn formats_signed_percentage_change() {
        assert_eq!(coin("a", None, Some(2.345)).formatted_price_change(), "+2.35%");
        assert_eq!(coin("b", None, Some(-0.5)).formatted_price_change(), "-0.50%");
        assert_eq!(coin("c", None, None).formatted_price_change(), "N/A");
    }

    #[test]
    fn classifies_price_direction() {
        assert_eq!(coin("a", None, Some(0.0)).price_direction(), PriceDirection::Up);
        assert_eq!(coin("b", None, Some(-3.2)).price_direction(), PriceDirection::Down);
    }

    #[test]
    fn scales_large_numbers() {
        assert_eq!(format_large_number(1_230_000_000.0), "$1.23B");
        assert_eq!(format_large_number(45_600_000.0), "$45.60M");
        assert_eq!(format_large_number(7_800.0), "$7.80K");
        assert_eq!(format_large_number(123.0), "$123.00");
    }

    #[test]
    fn same_coin_ignores_field_differences() {
        let old = coin("bitcoin", Some(45000.0), None);
        let new = coin("bitcoin", Some(46000.0), None);
        assert!(old.same_coin(&new));
        assert_ne!(old, new);
    }
}
