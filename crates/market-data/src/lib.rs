//! Resilient multi-source market data acquisition.
//!
//! A structured primary source backed by an HTML-scraping fallback, with
//! retry, ticker alias resolution, per-field reconciliation and history
//! aggregation layered on top. [`MarketDataService`] is the entry point;
//! the layers underneath are public so callers can compose them directly:
//!
//! - [`http`] - the transport boundary where statuses become [`FetchError`]s
//! - [`retry`] - exponential-backoff executor over any fetch
//! - [`resolver`] - `.TO` exchange-suffix alias resolution
//! - [`cache`] - TTL/capacity-bounded page cache for the scraper
//! - [`provider`] - typed client for the structured primary source
//! - [`scrape`] - heuristic HTML fallback source
//! - [`reconcile`] - field-wise merge plus percent-scale normalization
//! - [`history`] - interval-bucket fetch and stitching

pub mod cache;
pub mod communities;
pub mod errors;
pub mod history;
pub mod http;
pub mod models;
pub mod provider;
pub mod reconcile;
pub mod resolver;
pub mod retry;
pub mod scrape;
pub mod service;

pub use cache::{PageCache, TtlPageCache};
pub use communities::{CommunityLookup, NullCommunityLookup, StaticCommunityLookup};
pub use errors::{FetchError, RetryClass};
pub use history::fetch_history;
pub use http::{HttpTransport, ReqwestTransport};
pub use models::{
    AssetDetails, AssetType, HistoryPoint, Holding, Interval, MarketSnapshot, MoverRow,
    ScrapedProfile, SectorWeight,
};
pub use provider::{ChartWindow, YahooClient};
pub use reconcile::{merge_details, normalize_percent};
pub use resolver::{normalize_symbol, resolve_with_alias, Resolved};
pub use retry::{retry, retry_or, RetryPolicy};
pub use scrape::{MoverDirection, ScraperSource};
pub use service::MarketDataService;
