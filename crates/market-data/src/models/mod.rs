//! Data model for the acquisition layer.
//!
//! - `snapshot` - lightweight per-ticker quote ([`MarketSnapshot`], [`AssetType`])
//! - `details` - full fundamentals + history ([`AssetDetails`])
//! - `history` - interval-tagged price points ([`HistoryPoint`], [`Interval`])
//! - `profile` - fields parsed from the scrape source ([`ScrapedProfile`], [`MoverRow`])
//!
//! Everything here is ephemeral - constructed per request, never persisted.
//! Optional fundamentals stay `None` when a source doesn't supply them;
//! downstream consumers treat missing as "unknown", never as zero.

mod details;
mod history;
mod profile;
mod snapshot;

pub use details::{AssetDetails, Holding, SectorWeight};
pub use history::{HistoryPoint, Interval};
pub use profile::{MoverRow, ScrapedProfile};
pub use snapshot::{AssetType, MarketSnapshot};
