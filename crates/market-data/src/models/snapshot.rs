use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse asset classification used by the dashboard.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    Stock,
    Etf,
}

impl AssetType {
    /// Map the primary provider's `quoteType` field. Equities are stocks;
    /// everything else the dashboard treats as an ETF.
    pub fn from_quote_type(quote_type: &str) -> Self {
        if quote_type.eq_ignore_ascii_case("EQUITY") {
            Self::Stock
        } else {
            Self::Etf
        }
    }
}

/// Lightweight per-ticker quote for list views.
///
/// Constructed per request, never persisted. `price` is never negative.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub daily_change: Decimal,
    pub daily_change_percent: Decimal,
    pub asset_type: AssetType,
    /// Community URL from the injected lookup; absent for most tickers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reddit_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quote_type_mapping() {
        assert_eq!(AssetType::from_quote_type("EQUITY"), AssetType::Stock);
        assert_eq!(AssetType::from_quote_type("equity"), AssetType::Stock);
        assert_eq!(AssetType::from_quote_type("ETF"), AssetType::Etf);
        assert_eq!(AssetType::from_quote_type("MUTUALFUND"), AssetType::Etf);
    }

    #[test]
    fn snapshot_serializes_asset_type_uppercase() {
        let snapshot = MarketSnapshot {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            price: dec!(195.50),
            daily_change: dec!(1.25),
            daily_change_percent: dec!(0.64),
            asset_type: AssetType::Stock,
            reddit_url: None,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"asset_type\":\"STOCK\""));
        // Absent community URL is omitted, not null.
        assert!(!json.contains("reddit_url"));
    }
}
