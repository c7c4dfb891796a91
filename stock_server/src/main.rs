//! Stock stream-combination server.
//!
//! This binary connects once to an upstream stock feed and once to an upstream forex
//! feed, then accepts downstream subscribers over TCP:
//!
//! - `TcpEventStreamClient` — reads newline-delimited JSON events from each feed.
//! - `StockServer` — routes forex events into the rate state and fans stock quotes out
//!   to every active subscription, converting them with the latest rate.
//! - `SubscriptionListener` — accepts subscribers, reads their `{"STOCK":[...]}`
//!   request and writes converted quotes back as JSON lines.
//!
//! When an upstream feed ends, every subscriber stream ends too; reconnecting to the
//! feed is left to whoever restarts the server.
#![warn(missing_docs)]
use crate::args::Args;
use clap::Parser;
use log::info;
use stock_common::net::addr;
use stock_common::{FeedKind, Result};
use stock_server::{ServerConfig, StockServer, SubscriptionListener, TcpEventStreamClient};
use std::sync::Arc;

mod args;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let stock_feed = TcpEventStreamClient::new(FeedKind::Stock, args.stock_feed);
    let forex_feed = TcpEventStreamClient::new(FeedKind::Forex, args.forex_feed);
    let server = Arc::new(StockServer::start(
        &stock_feed,
        &forex_feed,
        ServerConfig { pair: args.pair },
    )?);

    let listener = SubscriptionListener::new(&addr("0.0.0.0", args.port))?;
    info!("Accepting subscriptions on {}", listener.local_addr()?);
    listener.accept_loop(server)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
