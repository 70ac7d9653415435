use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::snapshot::AssetType;

/// Fields heuristically parsed from a scraped profile page.
///
/// A label that cannot be located anywhere in the document yields an
/// absent field, never zero. Percent fields carry whatever scale the page
/// printed; scale normalization happens in the reconciler.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScrapedProfile {
    /// Which profile category URL answered (stocks vs etf), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_change_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

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
}

/// One row from a market-movers listing page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoverRow {
    pub symbol: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,
}
