//! Command line front end: one subcommand per service operation, JSON on
//! stdout, logs on stderr.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use compass_market_data::models::Interval;
use compass_market_data::{
    MarketDataService, MoverDirection, NullCommunityLookup, ReqwestTransport, TtlPageCache,
};

#[derive(Parser)]
#[command(name = "compass-fetcher", about = "Fetch market data from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quotes for a list of tickers (comma or space separated).
    Snapshot {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Full details and history for one ticker.
    Details {
        ticker: String,
        /// Start date (YYYY-MM-DD) for the daily history bucket.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Interval buckets to include; all four when omitted.
        #[arg(long, value_enum, value_delimiter = ',')]
        intervals: Vec<IntervalArg>,
    },
    /// Top movers from the fallback source's listing pages.
    Trending {
        #[arg(long, value_enum, default_value_t = DirectionArg::Gainers)]
        direction: DirectionArg,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum IntervalArg {
    #[value(name = "1h")]
    Hour,
    #[value(name = "1d")]
    Day,
    #[value(name = "1wk")]
    Week,
    #[value(name = "1mo")]
    Month,
}

impl From<IntervalArg> for Interval {
    fn from(arg: IntervalArg) -> Self {
        match arg {
            IntervalArg::Hour => Interval::Hour,
            IntervalArg::Day => Interval::Day,
            IntervalArg::Week => Interval::Week,
            IntervalArg::Month => Interval::Month,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Gainers,
    Losers,
}

impl From<DirectionArg> for MoverDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Gainers => MoverDirection::Gainers,
            DirectionArg::Losers => MoverDirection::Losers,
        }
    }
}

/// Tickers may arrive as separate arguments or as one comma-joined blob.
fn split_tickers(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|chunk| chunk.split([',', ' ']))
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let service = MarketDataService::new(
        Arc::new(ReqwestTransport::new()),
        Arc::new(TtlPageCache::new()),
        Arc::new(NullCommunityLookup),
    );

    match cli.command {
        Command::Snapshot { tickers } => {
            let tickers = split_tickers(&tickers);
            info!("fetching snapshot for {} tickers", tickers.len());
            let snapshots = service.fetch_market_snapshot(&tickers).await;
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        }
        Command::Details {
            ticker,
            from,
            intervals,
        } => {
            let intervals: Vec<Interval> = if intervals.is_empty() {
                Interval::ALL.to_vec()
            } else {
                intervals.into_iter().map(Into::into).collect()
            };
            let details = service.fetch_asset_details(&ticker, from, &intervals).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Command::Trending { direction, limit } => {
            let rows = service.fetch_trending(direction.into(), limit).await;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
