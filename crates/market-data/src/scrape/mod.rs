//! HTML-scraping fallback source.
//!
//! Fetches public profile and movers pages and extracts fields
//! heuristically. Pages go through the injected [`PageCache`] so repeated
//! scrapes inside the TTL cost one network call; fetches themselves go
//! through the retry executor.
//!
//! A symbol's profile lives under one of two category paths. The stock
//! path is tried first; a 404 switches to the ETF path exactly once, and
//! the category that answered is recorded on the profile.

mod numeric;
mod parse;

pub use numeric::{parse_numeric, parse_percent};
pub use parse::{parse_movers, parse_profile, FieldSpec, ProfileField, ValueKind, FIELD_SPECS};

use std::sync::Arc;

use log::debug;

use crate::cache::PageCache;
use crate::errors::FetchError;
use crate::http::HttpTransport;
use crate::models::{AssetType, MoverRow, ScrapedProfile};
use crate::retry::{retry, RetryPolicy};

/// Source identifier used in errors and logs.
pub const SOURCE_ID: &str = "STOCKANALYSIS";

const BASE_URL: &str = "https://stockanalysis.com";

/// Profile page category. Stocks and funds live under different paths.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProfileCategory {
    Stocks,
    Etf,
}

impl ProfileCategory {
    fn path(self) -> &'static str {
        match self {
            ProfileCategory::Stocks => "stocks",
            ProfileCategory::Etf => "etf",
        }
    }

    fn asset_type(self) -> AssetType {
        match self {
            ProfileCategory::Stocks => AssetType::Stock,
            ProfileCategory::Etf => AssetType::Etf,
        }
    }

    fn url(self, symbol: &str) -> String {
        format!("{}/{}/{}/", BASE_URL, self.path(), symbol.to_lowercase())
    }
}

/// Direction of a market-movers listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoverDirection {
    Gainers,
    Losers,
}

impl MoverDirection {
    fn url(self) -> String {
        let path = match self {
            MoverDirection::Gainers => "markets/gainers",
            MoverDirection::Losers => "markets/losers",
        };
        format!("{}/{}/", BASE_URL, path)
    }
}

pub struct ScraperSource {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn PageCache>,
    policy: RetryPolicy,
}

impl ScraperSource {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: Arc<dyn PageCache>) -> Self {
        Self::with_policy(transport, cache, RetryPolicy::standard())
    }

    pub fn with_policy(
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn PageCache>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            cache,
            policy,
        }
    }

    /// Raw page body for `url`, from cache when fresh.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        if let Some(body) = self.cache.get(url) {
            return Ok(body);
        }

        let body = retry(self.policy, url, || {
            let transport = self.transport.clone();
            let url = url.to_string();
            async move { transport.get(&url).await?.into_body(&url, SOURCE_ID) }
        })
        .await?;

        self.cache.insert(url, body.clone());
        Ok(body)
    }

    /// Scrape a symbol's profile page, trying the stock category first and
    /// falling back to the ETF category on 404.
    pub async fn scrape_profile(&self, symbol: &str) -> Result<ScrapedProfile, FetchError> {
        let mut category = ProfileCategory::Stocks;
        let body = match self.fetch_page(&category.url(symbol)).await {
            Ok(body) => body,
            Err(FetchError::NotFound { .. }) => {
                debug!("{}: not under stocks, trying etf", symbol);
                category = ProfileCategory::Etf;
                self.fetch_page(&category.url(symbol)).await?
            }
            Err(err) => return Err(err),
        };

        let mut profile = parse_profile(&body);
        profile.asset_type = Some(category.asset_type());
        Ok(profile)
    }

    /// Scrape a market-movers listing page.
    pub async fn scrape_movers(
        &self,
        direction: MoverDirection,
    ) -> Result<Vec<MoverRow>, FetchError> {
        let body = self.fetch_page(&direction.url()).await?;
        Ok(parse_movers(&body))
    }
}
