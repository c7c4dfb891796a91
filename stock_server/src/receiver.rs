//! Downstream TCP listener turning connections into subscriptions.
use crate::server::{QuoteStream, StockServer};
use crossbeam_channel::{Receiver, bounded, select};
use log::{debug, error, info, warn};
use stock_common::command::Parameters;
use stock_common::{Result, StreamError, SubscriptionRequest};
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

/// TCP listener that accepts downstream subscribers.
///
/// Each connection sends one JSON line with its request parameters (for example
/// `{"STOCK":["GOOGLE"]}`) and then receives converted quotes as JSON lines on the
/// same connection until either side goes away.
pub struct SubscriptionListener {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl SubscriptionListener {
    /// Bind a new listener to the provided `bind_addr` (e.g., `0.0.0.0:8080`).
    pub fn new(bind_addr: &str) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop accepting subscribers, one thread per connection.
    ///
    /// A failing subscriber only ends its own connection; the loop keeps serving others.
    pub fn accept_loop(self, server: Arc<StockServer>) -> Result<()> {
        info!("Subscription TCP server is started on {}", self.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let server = Arc::clone(&server);
                    thread::spawn(move || {
                        if let Err(e) = serve_subscriber(stream, &server) {
                            warn!("Subscriber stream ended: {}", e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Longest request line accepted from a subscriber, newline included.
pub const MAX_REQUEST_BYTES: u64 = 4096;

/// Read one request line from `reader` and decode it into a subscription request.
///
/// At most `MAX_REQUEST_BYTES` are read; a longer line is rejected.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<SubscriptionRequest> {
    let mut line = String::new();
    let size = reader.by_ref().take(MAX_REQUEST_BYTES).read_line(&mut line)?;
    if size == 0 {
        return Err(StreamError::Format(
            "connection closed before a request was sent".to_string(),
        ));
    }
    if size as u64 == MAX_REQUEST_BYTES && !line.ends_with('\n') {
        return Err(StreamError::Format(format!(
            "request exceeds {} bytes",
            MAX_REQUEST_BYTES
        )));
    }
    let parameters: Parameters = serde_json::from_str(line.trim())?;
    Ok(SubscriptionRequest::from_parameters(&parameters))
}

/// Serve a single subscriber connection.
///
/// Quotes are written until the stream ends, a write fails or the client closes its
/// side of the connection. The subscription is cancelled on return in every case.
pub fn serve_subscriber(stream: TcpStream, server: &StockServer) -> Result<()> {
    let peer = stream.peer_addr()?;
    debug!("client_tcp_addr: {:?}", &peer);

    let mut reader = BufReader::new(stream.try_clone()?);
    let request = read_request(&mut reader)?;
    info!("Received subscription from {}: {:?}", peer, request.symbols());

    let quotes = server.subscribe(request)?;
    let (closed_tx, closed_rx) = bounded::<()>(1);
    thread::spawn(move || {
        wait_for_disconnect(reader);
        let _ = closed_tx.send(());
    });

    let mut writer = stream;
    let result = write_quotes(&mut writer, &quotes, &closed_rx);
    let _ = writer.shutdown(Shutdown::Both);
    info!("Stream for {} closed", peer);
    result
}

fn write_quotes<W: Write>(writer: &mut W, quotes: &QuoteStream, closed_rx: &Receiver<()>) -> Result<()> {
    loop {
        select! {
            recv(closed_rx) -> _ => {
                debug!("Subscriber {} disconnected", quotes.id());
                break;
            },
            recv(quotes.receiver()) -> msg => match msg {
                Ok(quote) => {
                    let mut line = quote.to_json()?;
                    line.push('\n');
                    writer.write_all(line.as_bytes())?;
                },
                Err(_) => break,
            }
        }
    }
    Ok(())
}

/// Block until the client closes its side of the connection (EOF) or it fails.
/// Anything the client sends after its request is discarded.
fn wait_for_disconnect<R: Read>(mut reader: R) {
    let mut buf = [0u8; 256];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return,
            Ok(_) => continue,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => return,
        }
    }
}
