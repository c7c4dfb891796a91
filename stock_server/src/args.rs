//! Command-line arguments for the stock server.
use clap::Parser;
use stock_common::CurrencyPair;
use stock_common::net::{FOREX_FEED_PORT, STOCK_FEED_PORT, SUBSCRIPTION_PORT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// TCP port on which subscribers connect.
    #[clap(long, default_value_t = SUBSCRIPTION_PORT)]
    pub port: u16,

    /// Address of the upstream stock feed.
    #[clap(long, default_value_t = format!("127.0.0.1:{}", STOCK_FEED_PORT))]
    pub stock_feed: String,

    /// Address of the upstream forex feed.
    #[clap(long, default_value_t = format!("127.0.0.1:{}", FOREX_FEED_PORT))]
    pub forex_feed: String,

    /// Currency pair used to convert stock quotes.
    #[clap(long, default_value_t = CurrencyPair::default())]
    pub pair: CurrencyPair,
}
