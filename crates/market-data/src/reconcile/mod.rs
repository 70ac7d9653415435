//! Per-field reconciliation of primary and scraped asset details.
//!
//! Merging is field-wise, never record-wise: each field takes the value
//! from its preferred source and falls back to the other, so a partial
//! scrape still improves a partial primary response. Scale normalization
//! for percent-like fields runs once, after the merge, so both sources
//! feed raw values in.

use rust_decimal::Decimal;

use crate::models::{AssetDetails, ScrapedProfile};

/// Threshold below which a percent-like value is assumed to be a raw
/// fraction. Real-world yields and expense ratios above 1.5% exist, but
/// fractions above 1.5 (150%) effectively do not.
const FRACTION_CUTOFF: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Bring a percent-like value onto percent scale: a magnitude at or below
/// 1.5 is treated as a fraction and multiplied by 100.
pub fn normalize_percent(value: Decimal) -> Decimal {
    if value.abs() <= FRACTION_CUTOFF {
        value * Decimal::ONE_HUNDRED
    } else {
        value
    }
}

/// Overlay scraped profile fields onto primary-sourced details, then
/// normalize percent-like fields.
///
/// The scraper wins for valuation and dividend figures, where the primary
/// source is frequently stale or absent for non-US listings. The primary
/// wins for size figures (market cap, revenue, shares), where it reports
/// exact values rather than rounded display text.
pub fn merge_details(mut details: AssetDetails, scraped: Option<ScrapedProfile>) -> AssetDetails {
    if let Some(profile) = scraped {
        details.pe_ratio = profile.pe_ratio.or(details.pe_ratio);
        details.forward_pe = profile.forward_pe.or(details.forward_pe);
        details.dividend_yield = profile.dividend_yield.or(details.dividend_yield);
        details.dividend_growth = profile.dividend_growth.or(details.dividend_growth);
        details.beta = profile.beta.or(details.beta);
        details.expense_ratio = profile.expense_ratio.or(details.expense_ratio);
        details.week_52_high = profile.week_52_high.or(details.week_52_high);
        details.week_52_low = profile.week_52_low.or(details.week_52_low);
        details.description = profile.description.or(details.description);
        details.sector = profile.sector.or(details.sector);

        details.market_cap = details.market_cap.or(profile.market_cap);
        details.revenue = details.revenue.or(profile.revenue);
        details.eps = details.eps.or(profile.eps);
        details.shares_outstanding = details.shares_outstanding.or(profile.shares_outstanding);
        details.volume = details.volume.or(profile.volume);
    }

    details.dividend_yield = details.dividend_yield.map(normalize_percent);
    details.expense_ratio = details.expense_ratio.map(normalize_percent);
    for weight in &mut details.sector_weights {
        weight.weight = normalize_percent(weight.weight);
    }
    for holding in &mut details.top_holdings {
        holding.weight = normalize_percent(holding.weight);
    }

    details
}
