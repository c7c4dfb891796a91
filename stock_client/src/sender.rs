//! Sending the subscription request to the stock server over TCP.
use log::info;
use stock_common::{Result, SubscriptionRequest};
use std::io::Write;

/// Helper type for sending requests to the server.
pub struct RequestSender;

impl RequestSender {
    /// Write `request` as a single JSON line of parameters.
    pub fn send_request<W: Write>(stream: &mut W, request: &SubscriptionRequest) -> Result<()> {
        let mut line = serde_json::to_string(&request.to_parameters())?;
        info!("Sending subscription: {}", line);
        line.push('\n');
        stream.write_all(line.as_bytes())?;
        stream.flush()?;
        Ok(())
    }
}
