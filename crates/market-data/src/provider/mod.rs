//! Primary structured market-data provider.
//!
//! The primary source is the first choice for every fetch; the scrape
//! source (`crate::scrape`) backfills or replaces it when it fails.

pub mod yahoo;

pub use yahoo::{ChartWindow, YahooClient};
