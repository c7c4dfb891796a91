//! Command-line arguments for the stock client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use stock_common::net::SUBSCRIPTION_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server IP address (IPv4 or IPv6) where the stock server is running.
    #[clap(long, default_value = "127.0.0.1")]
    pub server_ip: String,

    /// TCP port on which the server accepts subscriptions.
    #[clap(long, default_value_t = SUBSCRIPTION_PORT)]
    pub server_port: u16,

    /// Path to a text file with symbols to subscribe to.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub path: Option<String>,

    /// Symbols to subscribe to, in addition to those read from `--path`.
    #[clap(long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}
