//! Yahoo Finance primary client.
//!
//! Thin typed wrapper over the three public endpoints this layer consumes:
//!
//! - `v7/finance/quote` - bulk quotes for N symbols in one request
//! - `v10/finance/quoteSummary` - per-symbol detail modules
//! - `v8/finance/chart` - historical closes at a given granularity
//!
//! The client owns no retry or alias logic; callers wrap it in the retry
//! executor and the ticker resolver. All I/O goes through the injected
//! [`HttpTransport`].

mod models;

pub use models::*;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use urlencoding::encode;

use crate::errors::FetchError;
use crate::http::HttpTransport;

/// Source identifier used in errors and logs.
pub const PROVIDER_ID: &str = "YAHOO";

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// quoteSummary modules requested for asset details.
const SUMMARY_MODULES: &str =
    "price,summaryDetail,summaryProfile,defaultKeyStatistics,topHoldings,fundProfile,financialData";

/// Date range selector for chart requests.
#[derive(Clone, Copy, Debug)]
pub enum ChartWindow {
    /// Named lookback window ("5d", "1y", "5y", "max").
    Range(&'static str),
    /// Explicit start; the end is always "now".
    Since(DateTime<Utc>),
}

#[derive(Clone)]
pub struct YahooClient {
    transport: Arc<dyn HttpTransport>,
}

impl YahooClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, FetchError> {
        let body = self.transport.get(url).await?.into_body(url, PROVIDER_ID)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse {
            message: format!("{}: {}", what, e),
        })
    }

    /// Bulk quote for N symbols in one request. Symbols unknown to the
    /// provider are simply absent from the result.
    pub async fn get_quotes(&self, symbols: &[String]) -> Result<Vec<YahooQuote>, FetchError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let joined = symbols
            .iter()
            .map(|s| encode(s).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/v7/finance/quote?symbols={}", BASE_URL, joined);
        let envelope: YahooQuoteEnvelope = self.get_json(&url, "quote response").await?;
        Ok(envelope.quote_response.result.unwrap_or_default())
    }

    /// Per-symbol detail modules. An empty result set means the provider
    /// does not know the symbol.
    pub async fn get_quote_summary(
        &self,
        symbol: &str,
    ) -> Result<YahooQuoteSummaryResult, FetchError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules={}",
            BASE_URL,
            encode(symbol),
            SUMMARY_MODULES
        );
        let envelope: YahooQuoteSummaryEnvelope = self.get_json(&url, "quote summary").await?;
        envelope
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }

    /// Historical closes, ascending by timestamp. Null closes (holidays,
    /// halted sessions) are skipped.
    pub async fn get_chart(
        &self,
        symbol: &str,
        window: ChartWindow,
        granularity: &str,
    ) -> Result<Vec<(DateTime<Utc>, Decimal)>, FetchError> {
        let url = match window {
            ChartWindow::Range(range) => format!(
                "{}/v8/finance/chart/{}?range={}&interval={}",
                BASE_URL,
                encode(symbol),
                range,
                granularity
            ),
            ChartWindow::Since(start) => format!(
                "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}",
                BASE_URL,
                encode(symbol),
                start.timestamp(),
                Utc::now().timestamp(),
                granularity
            ),
        };
        let envelope: YahooChartEnvelope = self.get_json(&url, "chart response").await?;
        let result = envelope
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;

        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let mut points = Vec::with_capacity(result.timestamp.len());
        for (ts, close) in result.timestamp.into_iter().zip(closes) {
            let Some(close) = close else { continue };
            let Some(date) = Utc.timestamp_opt(ts, 0).single() else {
                continue;
            };
            let Some(close) = Decimal::from_f64(close) else {
                continue;
            };
            points.push((date, close));
        }
        Ok(points)
    }
}
