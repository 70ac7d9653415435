use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::history::HistoryPoint;
use super::snapshot::AssetType;

/// One sector allocation row, weight in percent after normalization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectorWeight {
    pub sector: String,
    pub weight: Decimal,
}

/// One top-holdings row for funds, weight in percent after normalization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub weight: Decimal,
}

/// Full per-asset view: snapshot fields plus fundamentals and history.
///
/// Every fundamental is independently optional because no single source
/// guarantees all fields; `None` means "unknown", never zero. Percent-like
/// fields (dividend yield, expense ratio, weights) are normalized to
/// percent scale by the reconciler before this struct leaves the layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetDetails {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub daily_change: Decimal,
    pub daily_change_percent: Decimal,
    pub asset_type: AssetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reddit_url: Option<String>,

    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_pe: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_growth: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sector_weights: Vec<SectorWeight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_holdings: Vec<Holding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryPoint>,
}
