//! Upstream feed simulator.
//!
//! Serves either a stock feed or a forex feed over TCP. Every connected consumer
//! receives the same stream of newline-delimited `{"code":...,"quote":...}` events,
//! produced by a random walk per symbol. Run one instance per feed kind to give the
//! stock server both of its upstream sources:
//!
//! ```bash
//! stock_feed --kind stock --symbols GOOGLE,APPLE,MSFT
//! stock_feed --kind forex --symbols EUR/USD --initial-value 1.1
//! ```
#![warn(missing_docs)]
mod args;
mod generator;

use crate::args::Args;
use crate::generator::FeedGenerator;
use clap::Parser;
use crossbeam_channel::{Sender, unbounded};
use log::{error, info};
use stock_common::net::{FOREX_FEED_PORT, STOCK_FEED_PORT, addr};
use stock_common::pair::DEFAULT_PAIR;
use stock_common::symbols::normalize_symbol;
use stock_common::{FeedKind, Result};
use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Stream generated events to one consumer until it disconnects.
fn handle_consumer(mut stream: TcpStream, subscription_tx: &Sender<Sender<String>>) -> Result<()> {
    let peer = stream.peer_addr()?;
    let (event_tx, event_rx) = unbounded::<String>();
    if subscription_tx.send(event_tx).is_err() {
        return Err(stock_common::StreamError::ChannelSend(
            "feed generator stopped".to_string(),
        ));
    }
    info!("Consumer {} connected", peer);

    for mut line in event_rx.iter() {
        line.push('\n');
        stream.write_all(line.as_bytes())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let (default_port, default_symbols, default_value, max_step) = match args.kind {
        FeedKind::Stock => (STOCK_FEED_PORT, vec!["GOOGLE", "APPLE", "MSFT", "AMAZON"], 100.0, 0.01),
        FeedKind::Forex => (FOREX_FEED_PORT, vec![DEFAULT_PAIR], 1.1, 0.002),
    };
    let mut symbols: Vec<String> = args.symbols.iter().filter_map(|s| normalize_symbol(s)).collect();
    if symbols.is_empty() {
        symbols = default_symbols.into_iter().map(String::from).collect();
    }

    let generator = FeedGenerator::new(
        symbols,
        args.initial_value.unwrap_or(default_value),
        max_step,
        Duration::from_millis(args.interval_ms),
    );
    let subscription_tx = generator.start();

    let listener = TcpListener::bind(addr("0.0.0.0", args.port.unwrap_or(default_port)))?;
    info!("Serving {} feed on {}", args.kind, listener.local_addr()?);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let subscription_tx = subscription_tx.clone();
                thread::spawn(move || {
                    if let Err(e) = handle_consumer(stream, &subscription_tx) {
                        info!("Consumer disconnected: {}", e);
                    }
                });
            }
            Err(e) => error!("TCP connection error: {}", e),
        }
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
