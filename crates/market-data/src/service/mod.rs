//! Fetch orchestration across the primary and fallback sources.
//!
//! [`MarketDataService`] owns the source clients and implements the three
//! public operations:
//!
//! - [`fetch_market_snapshot`](MarketDataService::fetch_market_snapshot):
//!   bulk quote first, then a concurrency-capped per-ticker fallback
//! - [`fetch_asset_details`](MarketDataService::fetch_asset_details):
//!   primary detail modules reconciled with a best-effort scrape, plus the
//!   stitched history series
//! - [`fetch_trending`](MarketDataService::fetch_trending): scraped movers
//!   listing, degrading to empty on failure
//!
//! Per-ticker failures inside batch operations degrade (the ticker is
//! dropped with a warning); only the per-asset detail fetch surfaces an
//! error, and only once every source has failed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tokio::sync::Semaphore;

use crate::cache::PageCache;
use crate::communities::CommunityLookup;
use crate::errors::FetchError;
use crate::history::fetch_history;
use crate::http::HttpTransport;
use crate::models::{
    AssetDetails, AssetType, Holding, Interval, MarketSnapshot, MoverRow, ScrapedProfile,
    SectorWeight,
};
use crate::provider::yahoo::{YahooQuote, YahooQuoteSummaryResult};
use crate::provider::YahooClient;
use crate::reconcile::merge_details;
use crate::resolver::{normalize_symbol, resolve_with_alias};
use crate::retry::{retry, RetryPolicy};
use crate::scrape::{MoverDirection, ScraperSource};

fn dec(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

/// Prices are required and never negative; a source reporting otherwise is
/// treated as having no price.
fn valid_price(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|p| !p.is_sign_negative())
}

fn wrapped(detail: &Option<crate::provider::yahoo::YahooPriceDetail>) -> Option<Decimal> {
    detail.as_ref().and_then(|d| d.raw).and_then(Decimal::from_f64)
}

pub struct MarketDataService {
    yahoo: YahooClient,
    scraper: ScraperSource,
    communities: Arc<dyn CommunityLookup>,
    bulk_policy: RetryPolicy,
    ticker_policy: RetryPolicy,
}

impl MarketDataService {
    /// Per-ticker fallback requests in flight at once.
    pub const FALLBACK_CONCURRENCY: usize = 2;

    pub fn new(
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn PageCache>,
        communities: Arc<dyn CommunityLookup>,
    ) -> Self {
        Self::with_policies(
            transport,
            cache,
            communities,
            RetryPolicy::bulk(),
            RetryPolicy::standard(),
        )
    }

    pub fn with_policies(
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn PageCache>,
        communities: Arc<dyn CommunityLookup>,
        bulk_policy: RetryPolicy,
        ticker_policy: RetryPolicy,
    ) -> Self {
        Self {
            yahoo: YahooClient::new(transport.clone()),
            scraper: ScraperSource::with_policy(transport, cache, ticker_policy),
            communities,
            bulk_policy,
            ticker_policy,
        }
    }

    /// Quotes for a list of tickers.
    ///
    /// One bulk request first; tickers it cannot answer (or the whole
    /// batch, when the bulk request fails) fall back to per-ticker fetches
    /// capped at [`Self::FALLBACK_CONCURRENCY`] in flight. Tickers that
    /// fail every source are dropped with a warning, so the result may be
    /// shorter than the request. Bulk-resolved tickers keep request order;
    /// fallback-resolved ones follow them.
    pub async fn fetch_market_snapshot(&self, tickers: &[String]) -> Vec<MarketSnapshot> {
        let mut seen = HashSet::new();
        let symbols: Vec<String> = tickers
            .iter()
            .map(|t| normalize_symbol(t))
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        if symbols.is_empty() {
            return Vec::new();
        }

        let bulk = retry(self.bulk_policy, "bulk quotes", || {
            let client = self.yahoo.clone();
            let symbols = symbols.clone();
            async move { client.get_quotes(&symbols).await }
        })
        .await;

        match bulk {
            Ok(rows) => {
                let mut by_symbol: HashMap<String, YahooQuote> = rows
                    .into_iter()
                    .map(|q| (q.symbol.to_uppercase(), q))
                    .collect();

                let mut snapshots = Vec::new();
                let mut missing = Vec::new();
                for symbol in &symbols {
                    match by_symbol
                        .remove(symbol)
                        .and_then(|quote| self.snapshot_from_quote(symbol, &quote))
                    {
                        Some(snapshot) => snapshots.push(snapshot),
                        None => missing.push(symbol.clone()),
                    }
                }
                if !missing.is_empty() {
                    debug!("bulk quote left {} tickers unanswered", missing.len());
                    snapshots.extend(self.fallback_snapshots(&missing).await);
                }
                snapshots
            }
            Err(err) => {
                warn!("bulk quote failed, falling back per ticker: {}", err);
                self.fallback_snapshots(&symbols).await
            }
        }
    }

    async fn fallback_snapshots(&self, symbols: &[String]) -> Vec<MarketSnapshot> {
        let semaphore = Semaphore::new(Self::FALLBACK_CONCURRENCY);
        let tasks = symbols.iter().map(|symbol| {
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore.acquire().await.ok()?;
                self.single_snapshot(symbol).await
            }
        });
        join_all(tasks).await.into_iter().flatten().collect()
    }

    /// One ticker through the full source chain: aliased quote, then
    /// scrape. `None` means every source failed.
    async fn single_snapshot(&self, symbol: &str) -> Option<MarketSnapshot> {
        let resolved = resolve_with_alias(symbol, |s| {
            let client = self.yahoo.clone();
            let policy = self.ticker_policy;
            async move {
                let label = format!("quote {}", s);
                retry(policy, &label, || {
                    let client = client.clone();
                    let s = s.clone();
                    async move {
                        let rows = client.get_quotes(&[s.clone()]).await?;
                        rows.into_iter()
                            .next()
                            .ok_or(FetchError::SymbolNotFound { symbol: s })
                    }
                })
                .await
            }
        })
        .await;

        match resolved {
            Ok(resolved) => {
                if let Some(snapshot) = self.snapshot_from_quote(&resolved.symbol, &resolved.data)
                {
                    return Some(snapshot);
                }
                debug!("{}: quote row lacked a price, scraping", resolved.symbol);
            }
            Err(err) => debug!("{}: primary quote failed, scraping: {}", symbol, err),
        }

        let normalized = normalize_symbol(symbol);
        match self.scraper.scrape_profile(&normalized).await {
            Ok(profile) => {
                let snapshot = self.snapshot_from_profile(&normalized, profile);
                if snapshot.is_none() {
                    warn!("{}: scraped profile lacked a price, dropping", normalized);
                }
                snapshot
            }
            Err(err) => {
                warn!("{}: all sources failed, dropping: {}", normalized, err);
                None
            }
        }
    }

    fn snapshot_from_quote(&self, symbol: &str, quote: &YahooQuote) -> Option<MarketSnapshot> {
        let price = valid_price(dec(quote.regular_market_price))?;
        let name = quote
            .long_name
            .clone()
            .or_else(|| quote.short_name.clone())
            .unwrap_or_else(|| symbol.to_string());
        let reddit_url = self.communities.community_url(symbol, &name);
        Some(MarketSnapshot {
            symbol: symbol.to_string(),
            name,
            price,
            daily_change: dec(quote.regular_market_change).unwrap_or(Decimal::ZERO),
            // The bulk endpoint reports percent scale already.
            daily_change_percent: dec(quote.regular_market_change_percent)
                .unwrap_or(Decimal::ZERO),
            asset_type: AssetType::from_quote_type(quote.quote_type.as_deref().unwrap_or("")),
            reddit_url,
        })
    }

    fn snapshot_from_profile(
        &self,
        symbol: &str,
        profile: ScrapedProfile,
    ) -> Option<MarketSnapshot> {
        let price = valid_price(profile.price)?;
        let percent = profile.daily_change_percent.unwrap_or(Decimal::ZERO);
        let name = profile.name.unwrap_or_else(|| symbol.to_string());
        let reddit_url = self.communities.community_url(symbol, &name);
        Some(MarketSnapshot {
            symbol: symbol.to_string(),
            name,
            price,
            daily_change: price * percent / Decimal::ONE_HUNDRED,
            daily_change_percent: percent,
            asset_type: profile.asset_type.unwrap_or(AssetType::Stock),
            reddit_url,
        })
    }

    /// Full detail view for one ticker.
    ///
    /// Primary detail modules (with alias resolution) are reconciled with a
    /// best-effort scrape, then the history buckets in `intervals` are
    /// stitched on. When the primary fails entirely the scrape alone
    /// carries the result, with an empty history. `from` narrows the daily
    /// bucket's start.
    pub async fn fetch_asset_details(
        &self,
        ticker: &str,
        from: Option<NaiveDate>,
        intervals: &[Interval],
    ) -> Result<AssetDetails, FetchError> {
        let normalized = normalize_symbol(ticker);

        let primary = resolve_with_alias(ticker, |s| {
            let client = self.yahoo.clone();
            let policy = self.ticker_policy;
            async move {
                let label = format!("summary {}", s);
                retry(policy, &label, || {
                    let client = client.clone();
                    let s = s.clone();
                    async move {
                        let summary = client.get_quote_summary(&s).await?;
                        let priced = summary
                            .price
                            .as_ref()
                            .and_then(|p| p.regular_market_price.as_ref())
                            .and_then(|d| d.raw)
                            .is_some();
                        if priced {
                            Ok(summary)
                        } else {
                            Err(FetchError::SymbolNotFound { symbol: s })
                        }
                    }
                })
                .await
            }
        })
        .await;

        match primary {
            Ok(resolved) => {
                let symbol = resolved.symbol;
                let details = details_from_summary(&symbol, resolved.data).ok_or_else(|| {
                    FetchError::Parse {
                        message: format!("{}: summary price was not a finite number", symbol),
                    }
                })?;

                let scraped = match self.scraper.scrape_profile(&normalized).await {
                    Ok(profile) => Some(profile),
                    Err(err) => {
                        debug!("{}: scrape unavailable, primary only: {}", normalized, err);
                        None
                    }
                };

                let mut merged = merge_details(details, scraped);
                merged.history =
                    fetch_history(&self.yahoo, &symbol, from, intervals, Some(merged.price))
                        .await;
                merged.reddit_url = self.communities.community_url(&symbol, &merged.name);
                Ok(merged)
            }
            Err(err) => {
                warn!("{}: primary details failed, scraping: {}", normalized, err);
                let profile = self
                    .scraper
                    .scrape_profile(&normalized)
                    .await
                    .map_err(|_| FetchError::SourceExhausted {
                        symbol: normalized.clone(),
                    })?;
                let details = details_from_profile(&normalized, profile).ok_or(
                    FetchError::SourceExhausted {
                        symbol: normalized.clone(),
                    },
                )?;
                let mut merged = merge_details(details, None);
                merged.reddit_url = self.communities.community_url(&normalized, &merged.name);
                Ok(merged)
            }
        }
    }

    /// Top movers from the scraped listing page. Degrades to empty on
    /// failure, never errors.
    pub async fn fetch_trending(&self, direction: MoverDirection, limit: usize) -> Vec<MoverRow> {
        match self.scraper.scrape_movers(direction).await {
            Ok(mut rows) => {
                rows.truncate(limit);
                rows
            }
            Err(err) => {
                warn!("movers listing failed: {}", err);
                Vec::new()
            }
        }
    }
}

/// Details straight from the primary's modules, percent-like fields on
/// whatever scale the endpoint reports (fractions included); the
/// reconciler normalizes after merging. `None` when the price cannot be
/// represented.
fn details_from_summary(symbol: &str, summary: YahooQuoteSummaryResult) -> Option<AssetDetails> {
    let price_data = summary.price?;
    let price = valid_price(wrapped(&price_data.regular_market_price))?;

    let detail = summary.summary_detail;
    let stats = summary.default_key_statistics;
    let profile = summary.summary_profile;
    let financial = summary.financial_data;

    let sector_weights: Vec<SectorWeight> = summary
        .top_holdings
        .as_ref()
        .map(|h| {
            h.sector_weightings
                .iter()
                .flat_map(|entry| entry.iter())
                .filter_map(|(sector, weight)| {
                    dec(weight.raw).map(|w| SectorWeight {
                        sector: sector.clone(),
                        weight: w,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let top_holdings: Vec<Holding> = summary
        .top_holdings
        .as_ref()
        .map(|h| {
            h.holdings
                .iter()
                .filter_map(|row| {
                    let weight = wrapped(&row.holding_percent)?;
                    let symbol = row.symbol.clone()?;
                    Some(Holding {
                        name: row.holding_name.clone().unwrap_or_else(|| symbol.clone()),
                        symbol,
                        weight,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let name = price_data
        .long_name
        .clone()
        .or_else(|| price_data.short_name.clone())
        .unwrap_or_else(|| symbol.to_string());

    Some(AssetDetails {
        symbol: symbol.to_string(),
        name,
        price,
        daily_change: wrapped(&price_data.regular_market_change).unwrap_or(Decimal::ZERO),
        // quoteSummary reports the change as a fraction, unlike the bulk
        // quote endpoint.
        daily_change_percent: wrapped(&price_data.regular_market_change_percent)
            .map(|f| f * Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO),
        asset_type: AssetType::from_quote_type(price_data.quote_type.as_deref().unwrap_or("")),
        reddit_url: None,
        currency: price_data.currency.unwrap_or_else(|| "USD".to_string()),
        exchange: price_data.exchange_name,
        pe_ratio: detail.as_ref().and_then(|d| wrapped(&d.trailing_pe)),
        forward_pe: detail.as_ref().and_then(|d| wrapped(&d.forward_pe)),
        dividend_yield: detail.as_ref().and_then(|d| wrapped(&d.dividend_yield)),
        dividend_growth: None,
        beta: detail.as_ref().and_then(|d| wrapped(&d.beta)),
        expense_ratio: summary
            .fund_profile
            .as_ref()
            .and_then(|f| f.fees_expenses_investment.as_ref())
            .and_then(|f| wrapped(&f.annual_report_expense_ratio)),
        week_52_high: detail.as_ref().and_then(|d| wrapped(&d.fifty_two_week_high)),
        week_52_low: detail.as_ref().and_then(|d| wrapped(&d.fifty_two_week_low)),
        market_cap: detail.as_ref().and_then(|d| wrapped(&d.market_cap)),
        revenue: financial.as_ref().and_then(|f| wrapped(&f.total_revenue)),
        eps: stats.as_ref().and_then(|s| wrapped(&s.trailing_eps)),
        shares_outstanding: stats.as_ref().and_then(|s| wrapped(&s.shares_outstanding)),
        volume: detail
            .as_ref()
            .and_then(|d| wrapped(&d.volume))
            .or_else(|| wrapped(&price_data.regular_market_volume)),
        description: profile
            .as_ref()
            .and_then(|p| p.long_business_summary.clone())
            .or_else(|| profile.as_ref().and_then(|p| p.description.clone())),
        sector: profile.and_then(|p| p.sector),
        sector_weights,
        top_holdings,
        history: Vec::new(),
    })
}

/// Details from the scrape alone, used when the primary fails entirely.
/// `None` when the page yielded no price.
fn details_from_profile(symbol: &str, profile: ScrapedProfile) -> Option<AssetDetails> {
    let price = valid_price(profile.price)?;
    let percent = profile.daily_change_percent.unwrap_or(Decimal::ZERO);
    Some(AssetDetails {
        symbol: symbol.to_string(),
        name: profile.name.unwrap_or_else(|| symbol.to_string()),
        price,
        daily_change: price * percent / Decimal::ONE_HUNDRED,
        daily_change_percent: percent,
        asset_type: profile.asset_type.unwrap_or(AssetType::Stock),
        reddit_url: None,
        currency: "USD".to_string(),
        exchange: None,
        pe_ratio: profile.pe_ratio,
        forward_pe: profile.forward_pe,
        dividend_yield: profile.dividend_yield,
        dividend_growth: profile.dividend_growth,
        beta: profile.beta,
        expense_ratio: profile.expense_ratio,
        week_52_high: profile.week_52_high,
        week_52_low: profile.week_52_low,
        market_cap: profile.market_cap,
        revenue: profile.revenue,
        eps: profile.eps,
        shares_outstanding: profile.shares_outstanding,
        volume: profile.volume,
        description: profile.description,
        sector: profile.sector,
        sector_weights: Vec::new(),
        top_holdings: Vec::new(),
        history: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use crate::cache::TtlPageCache;
    use crate::communities::{NullCommunityLookup, StaticCommunityLookup};
    use crate::http::HttpResponse;

    /// Routes by URL shape: bulk quote (comma-joined symbols), single
    /// quote, quote summary, chart, scrape page. Tracks concurrency on
    /// single-quote requests.
    struct ScriptedTransport {
        fail_bulk: bool,
        fail_summary: bool,
        unknown_symbols: Vec<&'static str>,
        scrape_pages: HashMap<String, &'static str>,
        quote_calls: AtomicU32,
        in_flight: AtomicU32,
        max_in_flight: AtomicU32,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            Self {
                fail_bulk: false,
                fail_summary: false,
                unknown_symbols: Vec::new(),
                scrape_pages: HashMap::new(),
                quote_calls: AtomicU32::new(0),
                in_flight: AtomicU32::new(0),
                max_in_flight: AtomicU32::new(0),
            }
        }

        fn knows(&self, symbol: &str) -> bool {
            let base = symbol.trim_end_matches(".TO");
            !self.unknown_symbols.iter().any(|s| *s == base)
        }

        fn quote_row(symbol: &str) -> String {
            format!(
                r#"{{"symbol":"{0}","shortName":"{0} Corp","quoteType":"EQUITY",
                    "regularMarketPrice":100.5,"regularMarketChange":1.25,
                    "regularMarketChangePercent":1.26,"currency":"USD"}}"#,
                symbol
            )
        }

        fn summary_body() -> &'static str {
            r#"{"quoteSummary":{"result":[{
                "price":{"currency":"USD","shortName":"Apple Inc.","quoteType":"EQUITY",
                    "exchangeName":"NMS",
                    "regularMarketPrice":{"raw":195.5},
                    "regularMarketChange":{"raw":1.25},
                    "regularMarketChangePercent":{"raw":0.0064}},
                "summaryDetail":{"trailingPE":{"raw":28.5},
                    "dividendYield":{"raw":0.0055},
                    "fiftyTwoWeekHigh":{"raw":199.62}},
                "summaryProfile":{"sector":"Technology",
                    "longBusinessSummary":"Designs consumer electronics."},
                "defaultKeyStatistics":{"trailingEps":{"raw":6.42}},
                "financialData":{"totalRevenue":{"raw":383000000000}}
            }],"error":null}}"#
        }

        fn chart_body() -> String {
            let now = chrono::Utc::now().timestamp();
            format!(
                r#"{{"chart":{{"result":[{{"timestamp":[{},{}],"indicators":{{"quote":[{{"close":[150.0,151.0]}}]}}}}]}}}}"#,
                now - 2 * 86_400,
                now - 86_400
            )
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
            if url.contains("/v7/finance/quote?") {
                if url.contains(',') {
                    let status = if self.fail_bulk { 500 } else { 200 };
                    // Bulk answers are only needed by tests that fail it.
                    return Ok(HttpResponse {
                        status,
                        body: r#"{"quoteResponse":{"result":[]}}"#.to_string(),
                    });
                }

                self.quote_calls.fetch_add(1, Ordering::SeqCst);
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);

                let symbol = url.rsplit('=').next().unwrap_or_default();
                let body = if self.knows(symbol) {
                    format!(
                        r#"{{"quoteResponse":{{"result":[{}]}}}}"#,
                        Self::quote_row(symbol)
                    )
                } else {
                    r#"{"quoteResponse":{"result":[]}}"#.to_string()
                };
                return Ok(HttpResponse { status: 200, body });
            }

            if url.contains("/v10/finance/quoteSummary/") {
                if self.fail_summary {
                    return Ok(HttpResponse {
                        status: 500,
                        body: String::new(),
                    });
                }
                return Ok(HttpResponse {
                    status: 200,
                    body: Self::summary_body().to_string(),
                });
            }

            if url.contains("/v8/finance/chart/") {
                return Ok(HttpResponse {
                    status: 200,
                    body: Self::chart_body(),
                });
            }

            match self.scrape_pages.get(url) {
                Some(page) => Ok(HttpResponse {
                    status: 200,
                    body: page.to_string(),
                }),
                None => Ok(HttpResponse {
                    status: 404,
                    body: String::new(),
                }),
            }
        }
    }

    fn service(transport: Arc<ScriptedTransport>) -> MarketDataService {
        MarketDataService::with_policies(
            transport,
            Arc::new(TtlPageCache::new()),
            Arc::new(NullCommunityLookup),
            RetryPolicy::immediate(1),
            RetryPolicy::immediate(1),
        )
    }

    fn tickers(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn failed_bulk_falls_back_per_ticker_capped_at_two() {
        let mut transport = ScriptedTransport::new();
        transport.fail_bulk = true;
        let transport = Arc::new(transport);
        let service = service(transport.clone());

        let snapshots = service
            .fetch_market_snapshot(&tickers(&["A", "B", "C", "D", "E"]))
            .await;

        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[0].price, dec!(100.5));
        assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert_eq!(transport.quote_calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn unknown_ticker_is_dropped_not_fatal() {
        let mut transport = ScriptedTransport::new();
        transport.fail_bulk = true;
        transport.unknown_symbols = vec!["BAD"];
        let service = service(Arc::new(transport));

        let snapshots = service
            .fetch_market_snapshot(&tickers(&["A", "B", "BAD", "C"]))
            .await;

        assert_eq!(snapshots.len(), 3);
        assert!(snapshots.iter().all(|s| s.symbol != "BAD"));
    }

    #[tokio::test]
    async fn duplicate_and_empty_tickers_are_skipped() {
        let mut transport = ScriptedTransport::new();
        transport.fail_bulk = true;
        let transport = Arc::new(transport);
        let service = service(transport.clone());

        let snapshots = service
            .fetch_market_snapshot(&tickers(&["a", "A", " ", "A "]))
            .await;

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].symbol, "A");
        assert_eq!(transport.quote_calls.load(Ordering::SeqCst), 1);
    }

    const AAPL_PAGE: &str = r#"
        <html><body>
        <h1>Apple Inc.</h1>
        <table><tbody>
            <tr><td>PE Ratio</td><td>10.8</td></tr>
            <tr><td>Dividend Yield</td><td>5.10%</td></tr>
        </tbody></table>
        </body></html>
    "#;

    #[tokio::test]
    async fn details_merge_scrape_over_primary_and_stitch_history() {
        let mut transport = ScriptedTransport::new();
        transport.scrape_pages.insert(
            "https://stockanalysis.com/stocks/aapl/".to_string(),
            AAPL_PAGE,
        );
        let service = MarketDataService::with_policies(
            Arc::new(transport),
            Arc::new(TtlPageCache::new()),
            Arc::new(StaticCommunityLookup::new([(
                "AAPL".to_string(),
                "https://www.reddit.com/r/AAPL/".to_string(),
            )])),
            RetryPolicy::immediate(1),
            RetryPolicy::immediate(1),
        );

        let details = service
            .fetch_asset_details("aapl", None, &[Interval::Day])
            .await
            .unwrap();

        assert_eq!(details.price, dec!(195.5));
        assert_eq!(details.daily_change_percent, dec!(0.64));
        // Scrape wins for valuation fields, primary fills the rest.
        assert_eq!(details.pe_ratio, Some(dec!(10.8)));
        assert_eq!(details.dividend_yield, Some(dec!(5.10)));
        assert_eq!(details.week_52_high, Some(dec!(199.62)));
        assert_eq!(details.sector.as_deref(), Some("Technology"));
        // Two chart closes plus the synthetic current-price point.
        assert_eq!(details.history.len(), 3);
        assert_eq!(details.history.last().unwrap().close, dec!(195.5));
        assert_eq!(
            details.reddit_url.as_deref(),
            Some("https://www.reddit.com/r/AAPL/")
        );
    }

    const SCRAPE_ONLY_PAGE: &str = r#"
        <html><body>
        <h1>Obscure Holdings</h1>
        <table><tbody>
            <tr><td>Stock Price</td><td>45.10</td></tr>
            <tr><td>PE Ratio</td><td>7.2</td></tr>
        </tbody></table>
        </body></html>
    "#;

    #[tokio::test]
    async fn scrape_alone_carries_details_when_primary_fails() {
        let mut transport = ScriptedTransport::new();
        transport.fail_summary = true;
        transport.scrape_pages.insert(
            "https://stockanalysis.com/stocks/obsc/".to_string(),
            SCRAPE_ONLY_PAGE,
        );
        let service = service(Arc::new(transport));

        let details = service
            .fetch_asset_details("OBSC", None, &[Interval::Day])
            .await
            .unwrap();

        assert_eq!(details.price, dec!(45.10));
        assert_eq!(details.name, "Obscure Holdings");
        assert_eq!(details.pe_ratio, Some(dec!(7.2)));
        assert_eq!(details.asset_type, AssetType::Stock);
        assert!(details.history.is_empty());
    }

    #[tokio::test]
    async fn all_sources_failing_is_source_exhausted() {
        let mut transport = ScriptedTransport::new();
        transport.fail_summary = true;
        let service = service(Arc::new(transport));

        let err = service
            .fetch_asset_details("ZZZZ", None, &[Interval::Day])
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::SourceExhausted { ref symbol } if symbol == "ZZZZ"));
    }

    #[tokio::test]
    async fn trending_truncates_and_degrades_to_empty() {
        let page = r#"
            <table><tbody>
                <tr><td>1</td><td>NVDA</td><td>NVIDIA Corp</td><td>+4.12%</td><td>485.20</td></tr>
                <tr><td>2</td><td>AMD</td><td>Advanced Micro</td><td>+2.50%</td><td>118.40</td></tr>
                <tr><td>3</td><td>TSLA</td><td>Tesla Inc</td><td>+2.10%</td><td>242.10</td></tr>
            </tbody></table>
        "#;
        let mut transport = ScriptedTransport::new();
        transport
            .scrape_pages
            .insert("https://stockanalysis.com/markets/gainers/".to_string(), page);
        let service = service(Arc::new(transport));

        let rows = service.fetch_trending(MoverDirection::Gainers, 2).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "NVDA");

        let losers = service.fetch_trending(MoverDirection::Losers, 5).await;
        assert!(losers.is_empty());
    }
}
