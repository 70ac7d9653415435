//! Yahoo Finance API response models.
//!
//! Covers the three endpoints this layer consumes: the bulk quote endpoint
//! (v7), the quoteSummary endpoint (v10, module-based) and the chart
//! endpoint (v8). The quoteSummary endpoint wraps most numbers as
//! `{"raw": 1.23, "fmt": "1.23"}` objects, or empty objects `{}` when no
//! data is available; only the raw value is used.

use std::collections::HashMap;

use serde::Deserialize;

// ============================================================================
// v7 bulk quote endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteEnvelope {
    pub quote_response: YahooQuoteBody,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteBody {
    pub result: Option<Vec<YahooQuote>>,
}

/// One row from the bulk quote endpoint. Unlike quoteSummary, this endpoint
/// reports plain numbers, and its change percent is already percent-scaled.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuote {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub currency: Option<String>,
    pub full_exchange_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_change: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub regular_market_volume: Option<f64>,
}

// ============================================================================
// v10 quoteSummary endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryEnvelope {
    pub quote_summary: YahooQuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    /// Null (not empty) when the endpoint reports an error.
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_profile: Option<YahooSummaryProfile>,
    pub summary_detail: Option<YahooSummaryDetail>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
    pub top_holdings: Option<YahooTopHoldings>,
    pub fund_profile: Option<YahooFundProfile>,
    pub financial_data: Option<YahooFinancialData>,
}

/// Wrapped numeric value; `{}` deserializes with `raw: None`.
#[derive(Debug, Deserialize, Clone)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub currency: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub exchange_name: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
    pub regular_market_change: Option<YahooPriceDetail>,
    /// Fraction, not percent (0.0123 for +1.23%).
    pub regular_market_change_percent: Option<YahooPriceDetail>,
    pub regular_market_volume: Option<YahooPriceDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub long_business_summary: Option<String>,
    #[serde(alias = "description")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub market_cap: Option<YahooPriceDetail>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<YahooPriceDetail>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooPriceDetail>,
    /// Fraction for most listings (0.005 for 0.5%).
    pub dividend_yield: Option<YahooPriceDetail>,
    pub beta: Option<YahooPriceDetail>,
    pub fifty_two_week_high: Option<YahooPriceDetail>,
    pub fifty_two_week_low: Option<YahooPriceDetail>,
    pub volume: Option<YahooPriceDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    pub trailing_eps: Option<YahooPriceDetail>,
    pub shares_outstanding: Option<YahooPriceDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooFinancialData {
    pub total_revenue: Option<YahooPriceDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooFundProfile {
    pub fees_expenses_investment: Option<YahooFeesExpenses>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooFeesExpenses {
    pub annual_report_expense_ratio: Option<YahooPriceDetail>,
}

/// Fund holdings data. Sector weightings arrive as an array of single-key
/// maps, e.g. `[{"technology": {"raw": 0.30}}, {"healthcare": {"raw": 0.15}}]`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooTopHoldings {
    #[serde(default)]
    pub sector_weightings: Vec<HashMap<String, YahooPriceDetail>>,
    #[serde(default)]
    pub holdings: Vec<YahooHolding>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooHolding {
    pub symbol: Option<String>,
    pub holding_name: Option<String>,
    pub holding_percent: Option<YahooPriceDetail>,
}

// ============================================================================
// v8 chart endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YahooChartEnvelope {
    pub chart: YahooChartBody,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartBody {
    pub result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartIndicators {
    #[serde(default)]
    pub quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
