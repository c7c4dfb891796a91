//! Shared networking constants and helpers used by server, client and feed simulator.

/// TCP port on which the server accepts downstream subscriptions.
pub const SUBSCRIPTION_PORT: u16 = 8080;
/// TCP port on which the simulated stock feed is served.
pub const STOCK_FEED_PORT: u16 = 8081;
/// TCP port on which the simulated forex feed is served.
pub const FOREX_FEED_PORT: u16 = 8082;

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
