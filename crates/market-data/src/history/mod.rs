//! History aggregation across interval buckets.
//!
//! Each requested interval is fetched independently and the buckets are
//! concatenated in [`Interval::ALL`] order. A failed bucket degrades to an
//! empty bucket rather than failing the whole series. When the daily
//! bucket's last close predates today, a synthetic point at the current
//! price is appended so the series always reaches "now".

use chrono::{NaiveDate, TimeZone, Utc};
use log::debug;
use rust_decimal::Decimal;

use crate::models::{HistoryPoint, Interval};
use crate::provider::{ChartWindow, YahooClient};
use crate::retry::{retry_or, RetryPolicy};

fn window_for(interval: Interval, from: Option<NaiveDate>) -> ChartWindow {
    // An explicit start date only narrows the daily bucket; the other
    // buckets keep their default lookback so the chart retains context.
    match (interval, from) {
        (Interval::Day, Some(date)) => {
            let start = date.and_hms_opt(0, 0, 0).unwrap_or_default();
            ChartWindow::Since(Utc.from_utc_datetime(&start))
        }
        _ => ChartWindow::Range(interval.default_range()),
    }
}

async fn fetch_bucket(
    client: &YahooClient,
    symbol: &str,
    interval: Interval,
    from: Option<NaiveDate>,
) -> Vec<HistoryPoint> {
    let label = format!("{} chart {}", symbol, interval.tag());
    let points = retry_or(RetryPolicy::standard(), &label, Vec::new(), || {
        let client = client.clone();
        let symbol = symbol.to_string();
        async move {
            client
                .get_chart(&symbol, window_for(interval, from), interval.granularity())
                .await
        }
    })
    .await;

    points
        .into_iter()
        .map(|(date, close)| HistoryPoint {
            date,
            close,
            interval,
        })
        .collect()
}

/// True when the bucket's last close is stale relative to the clock and a
/// current-price point should be appended.
fn needs_now_point(bucket: &[HistoryPoint]) -> bool {
    match bucket.last() {
        Some(last) => last.date.date_naive() < Utc::now().date_naive(),
        None => false,
    }
}

/// Fetch and stitch the history series for `symbol`.
///
/// `intervals` selects which buckets to include; order of the output
/// follows [`Interval::ALL`] regardless of the order given. `current_price`
/// feeds the synthetic "now" point on the daily bucket.
pub async fn fetch_history(
    client: &YahooClient,
    symbol: &str,
    from: Option<NaiveDate>,
    intervals: &[Interval],
    current_price: Option<Decimal>,
) -> Vec<HistoryPoint> {
    let mut series = Vec::new();

    for interval in Interval::ALL {
        if !intervals.contains(&interval) {
            continue;
        }
        let mut bucket = fetch_bucket(client, symbol, interval, from).await;

        if interval == Interval::Day {
            if let Some(price) = current_price {
                if needs_now_point(&bucket) {
                    debug!("{}: appending current price to daily bucket", symbol);
                    bucket.push(HistoryPoint {
                        date: Utc::now(),
                        close: price,
                        interval: Interval::Day,
                    });
                }
            }
        }

        series.extend(bucket);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use crate::errors::FetchError;
    use crate::http::{HttpResponse, HttpTransport};

    /// Serves the same chart body for every interval; failures are
    /// simulated with a 500.
    struct ChartTransport {
        timestamps: Vec<i64>,
        fail: bool,
    }

    #[async_trait]
    impl HttpTransport for ChartTransport {
        async fn get(&self, _url: &str) -> Result<HttpResponse, FetchError> {
            if self.fail {
                return Ok(HttpResponse {
                    status: 500,
                    body: String::new(),
                });
            }
            let closes: Vec<String> = (0..self.timestamps.len())
                .map(|i| format!("{}", 100 + i))
                .collect();
            let body = format!(
                r#"{{"chart":{{"result":[{{"timestamp":{:?},"indicators":{{"quote":[{{"close":[{}]}}]}}}}]}}}}"#,
                self.timestamps,
                closes.join(",")
            );
            Ok(HttpResponse { status: 200, body })
        }
    }

    fn client(timestamps: Vec<i64>, fail: bool) -> YahooClient {
        YahooClient::new(Arc::new(ChartTransport { timestamps, fail }))
    }

    #[tokio::test]
    async fn synthetic_point_extends_stale_daily_bucket() {
        let yesterday = (Utc::now() - Duration::days(1)).timestamp();
        let client = client(vec![yesterday - 86_400, yesterday], false);

        let series = fetch_history(
            &client,
            "AAPL",
            None,
            &[Interval::Day],
            Some(dec!(195.50)),
        )
        .await;

        assert_eq!(series.len(), 3);
        let last = series.last().unwrap();
        assert_eq!(last.close, dec!(195.50));
        assert_eq!(last.interval, Interval::Day);
        assert_eq!(last.date.date_naive(), Utc::now().date_naive());
    }

    #[tokio::test]
    async fn fresh_daily_bucket_gets_no_synthetic_point() {
        let today = Utc::now().timestamp();
        let client = client(vec![today - 86_400, today], false);

        let series = fetch_history(
            &client,
            "AAPL",
            None,
            &[Interval::Day],
            Some(dec!(195.50)),
        )
        .await;

        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn empty_daily_bucket_stays_empty() {
        let client = client(Vec::new(), false);
        let series = fetch_history(
            &client,
            "ZZZZ",
            None,
            &[Interval::Day],
            Some(dec!(10.0)),
        )
        .await;
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn failed_bucket_degrades_to_empty() {
        let client = client(Vec::new(), true);
        let series = fetch_history(&client, "AAPL", None, &[Interval::Month], None).await;
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn buckets_follow_canonical_order() {
        let ts = (Utc::now() - Duration::days(2)).timestamp();
        let client = client(vec![ts], false);

        // Request order is reversed on purpose.
        let series = fetch_history(
            &client,
            "AAPL",
            None,
            &[Interval::Month, Interval::Hour],
            None,
        )
        .await;

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].interval, Interval::Hour);
        assert_eq!(series[1].interval, Interval::Month);
    }
}
