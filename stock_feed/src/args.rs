//! Command-line arguments for the feed simulator.
use clap::Parser;
use stock_common::FeedKind;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Which feed to serve.
    #[clap(long, value_enum, default_value_t = FeedKind::Stock)]
    pub kind: FeedKind,

    /// TCP port to serve on; defaults to the well-known port of the feed kind.
    #[clap(long)]
    pub port: Option<u16>,

    /// Symbols (stock feed) or pair codes (forex feed) to generate.
    #[clap(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Starting value of every generated series.
    #[clap(long)]
    pub initial_value: Option<f64>,

    /// Pause between two generation rounds, in milliseconds.
    #[clap(long, default_value_t = 500)]
    pub interval_ms: u64,
}
