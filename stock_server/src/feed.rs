//! Upstream feed adapters.
//!
//! The server only needs "a live sequence of raw event strings" from each feed. The
//! `EventStreamClient` trait captures exactly that; `TcpEventStreamClient` is the
//! network implementation reading newline-delimited events from a TCP source.

use crossbeam_channel::{Receiver, unbounded};
use log::{debug, error, info};
use stock_common::{FeedKind, Result};
use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::thread;

/// Source of raw serialized events.
pub trait EventStreamClient {
    /// Start a fresh live sequence of raw events.
    ///
    /// Every call opens an independent sequence; the returned receiver disconnects when
    /// the upstream source ends.
    fn read_events(&self) -> Result<Receiver<String>>;
}

/// Reads newline-delimited events from a TCP feed.
pub struct TcpEventStreamClient {
    kind: FeedKind,
    addr: String,
}

impl TcpEventStreamClient {
    /// Create a client for the feed served at `addr` (e.g., `127.0.0.1:8081`).
    pub fn new(kind: FeedKind, addr: impl Into<String>) -> Self {
        Self {
            kind,
            addr: addr.into(),
        }
    }
}

impl EventStreamClient for TcpEventStreamClient {
    fn read_events(&self) -> Result<Receiver<String>> {
        let stream = TcpStream::connect(&self.addr)?;
        info!("Connected to {} feed at {}", self.kind, stream.peer_addr()?);

        let (tx, rx) = unbounded::<String>();
        let kind = self.kind;
        thread::spawn(move || {
            for line in BufReader::new(stream).lines() {
                match line {
                    Ok(line) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        debug!("{} feed event: {}", kind, line);
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to read from {} feed: {}", kind, e);
                        break;
                    }
                }
            }
            info!("{} feed reader stopping", kind);
        });
        Ok(rx)
    }
}
