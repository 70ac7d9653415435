use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Chart interval bucket. The final history series concatenates buckets in
/// [`Interval::ALL`] order; buckets are never merged or resampled against
/// each other.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1wk")]
    Week,
    #[serde(rename = "1mo")]
    Month,
}

impl Interval {
    /// Canonical bucket order for the stitched series.
    pub const ALL: [Interval; 4] = [Self::Hour, Self::Day, Self::Week, Self::Month];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Hour => "1h",
            Self::Day => "1d",
            Self::Week => "1wk",
            Self::Month => "1mo",
        }
    }

    /// Chart API granularity parameter. Hourly points come back at 60m.
    pub fn granularity(&self) -> &'static str {
        match self {
            Self::Hour => "60m",
            Self::Day => "1d",
            Self::Week => "1wk",
            Self::Month => "1mo",
        }
    }

    /// Default lookback window when the caller supplies no start date.
    pub fn default_range(&self) -> &'static str {
        match self {
            Self::Hour => "5d",
            Self::Day => "1y",
            Self::Week => "5y",
            Self::Month => "max",
        }
    }
}

/// One closing price in an interval bucket. Within a bucket, points are
/// sorted ascending by date.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: DateTime<Utc>,
    pub close: Decimal,
    pub interval: Interval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_tags_match_wire_format() {
        assert_eq!(Interval::Hour.tag(), "1h");
        assert_eq!(Interval::Day.tag(), "1d");
        assert_eq!(Interval::Week.tag(), "1wk");
        assert_eq!(Interval::Month.tag(), "1mo");
    }

    #[test]
    fn interval_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Interval::Week).unwrap(), "\"1wk\"");
    }

    #[test]
    fn hourly_points_are_fetched_at_sixty_minutes() {
        assert_eq!(Interval::Hour.granularity(), "60m");
        assert_eq!(Interval::Hour.default_range(), "5d");
    }
}
