//! Error types shared between server, client and feed simulator.
//!
//! The `StreamError` enum unifies common failure cases for I/O, event decoding,
//! channel communication and server lifecycle, allowing crates to propagate a
//! single error type.
use std::io;

use thiserror::Error;

/// Unified error type shared by every crate in the workspace.
#[derive(Error, Debug)]
pub enum StreamError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// A raw feed event could not be decoded into a `Quote`.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// A currency pair code is not of the `BASE/QUOTE` shape.
    #[error("Invalid currency pair: {0}")]
    InvalidPair(String),

    /// Error while parsing a symbols file.
    #[error("Parse symbols file error: {0}")]
    ParseSymbolsFile(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// The dispatch loop of the server is no longer running.
    #[error("Stock server is stopped")]
    ServerStopped,
}
