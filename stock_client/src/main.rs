//! Stock Client — a TCP client that subscribes to converted stock quotes and prints
//! them to stdout. Symbols come from a text file and/or the command line; the client
//! sends a single subscription request and then prints every quote the server pushes
//! until Ctrl+C or until the server ends the stream.
//!
//! Usage example (CLI):
//! ```bash
//! stock_client --server-ip 192.168.0.10 --path ./symbols.txt --symbols GOOGLE,APPLE
//! ```
//!
//! The symbols file should contain symbols separated by commas, spaces, or new lines.
#![warn(missing_docs)]
mod args;
mod sender;

use crate::args::Args;
use crate::sender::RequestSender;
use chrono::Local;
use clap::Parser;
use log::{debug, error, info, warn};
use stock_common::net::addr;
use stock_common::symbols::parse_symbols;
use stock_common::{ConvertedQuote, Result, StreamError, SubscriptionRequest};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::net::TcpStream;
use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// Runs a blocking loop that reads converted quotes from `stream` and prints them.
/// Returns when the server closes the stream or `shutdown` is raised.
fn start_receiver_loop(stream: TcpStream, shutdown: Arc<AtomicBool>) -> Result<()> {
    info!("Quote receiver running on: {}", stream.local_addr()?);
    stream.set_read_timeout(Some(Duration::from_secs(1)))?;
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    while !shutdown.load(Ordering::Relaxed) {
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("Server closed the stream");
                break;
            }
            Ok(_) => {
                match serde_json::from_str::<ConvertedQuote>(line.trim()) {
                    Ok(quote) => {
                        info!(
                            "QUOTE: {} Price={:.4} Received={}",
                            quote.code,
                            quote.quote,
                            Local::now().format("%H:%M:%S%.3f")
                        );
                    }
                    Err(_) => debug!("Received non-JSON message: {}", line.trim()),
                }
                line.clear();
            }
            Err(e) => {
                if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut {
                    continue;
                }
                error!("Receive data error: {}", e);
                return Err(StreamError::Io(e));
            }
        }
    }
    info!("Receiver loop stopping...");
    Ok(())
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Ctrl+C handler not installed: {}", e);
        }
    }

    let mut symbols = args.symbols.clone();
    if let Some(path) = &args.path {
        let file_path = normalize_path(path);
        if !is_file_exist(&file_path) {
            return Err(StreamError::ParseSymbolsFile(format!(
                "file not found: {}",
                file_path.display()
            )));
        }
        symbols.extend(parse_symbols(BufReader::new(File::open(file_path)?))?);
    }

    let request = SubscriptionRequest::new(&symbols);
    if request.is_empty() {
        warn!("No symbols requested; the server will not send any quote");
    }
    info!("Symbols: {:?}", request.symbols());

    let server_address = addr(args.server_ip.trim(), args.server_port);
    info!("Connecting to TCP server at {}", server_address);
    let mut stream = TcpStream::connect(&server_address)
        .map_err(|e| StreamError::Format(format!("Failed to connect to server: {}", e)))?;

    RequestSender::send_request(&mut stream, &request)?;
    info!("Client is running. Press Ctrl+C to exit.");
    start_receiver_loop(stream, shutdown)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}
