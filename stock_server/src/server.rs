//! Threaded orchestration around the `StreamEngine`.
//!
//! `StockServer::start` reads each upstream feed exactly once and spawns:
//! - one forwarding thread per feed, tagging raw events with their `FeedKind`;
//! - one dispatch thread that exclusively owns the `StreamEngine`.
//!
//! Feed events and subscription control messages all travel through ONE channel into
//! the dispatch thread, so their arrival order on that channel is the single order in
//! which rates are updated, quotes are fanned out and subscriptions start or stop.
//! A subscription therefore sees exactly the stock events enqueued after it.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, unbounded};
use log::{error, info};
use stock_common::command::Parameters;
use stock_common::{ConvertedQuote, CurrencyPair, FeedKind, Result, StreamError, SubscriptionRequest};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::StreamEngine;
use crate::feed::EventStreamClient;
use crate::model::pipeline::SubscriptionId;

/// Message consumed by the dispatch thread.
enum ServerMessage {
    /// Raw event from an upstream feed.
    Event(FeedKind, String),
    /// An upstream feed ended.
    FeedClosed(FeedKind),
    /// Register a new pipeline and report its id.
    Subscribe {
        request: SubscriptionRequest,
        sink: Sender<ConvertedQuote>,
        reply: Sender<SubscriptionId>,
    },
    /// Unregister a pipeline.
    Cancel(SubscriptionId),
    /// Report the number of active pipelines.
    ActiveCount(Sender<usize>),
    /// Stop dispatching.
    Shutdown,
}

/// Runtime settings of the server.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Pair every stock quote is converted with.
    pub pair: CurrencyPair,
}

/// Top-level orchestrator and subscription factory.
pub struct StockServer {
    tx: Sender<ServerMessage>,
    dispatcher: Option<JoinHandle<()>>,
}

impl StockServer {
    /// Subscribe once to each feed and start dispatching.
    pub fn start(
        stock_feed: &dyn EventStreamClient,
        forex_feed: &dyn EventStreamClient,
        config: ServerConfig,
    ) -> Result<Self> {
        let stock_events = stock_feed.read_events()?;
        let forex_events = forex_feed.read_events()?;

        let (tx, rx) = unbounded::<ServerMessage>();
        spawn_forwarder(FeedKind::Stock, stock_events, tx.clone());
        spawn_forwarder(FeedKind::Forex, forex_events, tx.clone());

        info!("Stock server converting quotes with {}", config.pair);
        let engine = StreamEngine::new(config.pair);
        let dispatcher = thread::spawn(move || dispatch_loop(rx, engine));

        Ok(Self {
            tx,
            dispatcher: Some(dispatcher),
        })
    }

    /// Open a live stream of converted quotes for the symbols named in `parameters`.
    pub fn get_events(&self, parameters: &Parameters) -> Result<QuoteStream> {
        self.subscribe(SubscriptionRequest::from_parameters(parameters))
    }

    /// Open a live stream of converted quotes for `request`.
    pub fn subscribe(&self, request: SubscriptionRequest) -> Result<QuoteStream> {
        let (sink, events) = unbounded::<ConvertedQuote>();
        let (reply, reply_rx) = bounded::<SubscriptionId>(1);

        self.tx
            .send(ServerMessage::Subscribe {
                request,
                sink,
                reply,
            })
            .map_err(|_| StreamError::ServerStopped)?;
        let id = reply_rx.recv().map_err(|_| StreamError::ServerStopped)?;

        Ok(QuoteStream {
            id,
            events,
            control: self.tx.clone(),
        })
    }

    /// Number of active subscriptions, counted after every message already queued.
    pub fn active_subscriptions(&self) -> Result<usize> {
        let (reply, reply_rx) = bounded::<usize>(1);
        self.tx
            .send(ServerMessage::ActiveCount(reply))
            .map_err(|_| StreamError::ServerStopped)?;
        reply_rx.recv().map_err(|_| StreamError::ServerStopped)
    }

    /// Ask the dispatch thread to stop. Every open stream ends.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ServerMessage::Shutdown);
    }
}

impl Drop for StockServer {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(dispatcher) = self.dispatcher.take() {
            if dispatcher.join().is_err() {
                error!("Dispatch thread panicked");
            }
        }
    }
}

fn spawn_forwarder(kind: FeedKind, events: Receiver<String>, tx: Sender<ServerMessage>) {
    thread::spawn(move || {
        for raw in events.iter() {
            if tx.send(ServerMessage::Event(kind, raw)).is_err() {
                return;
            }
        }
        let _ = tx.send(ServerMessage::FeedClosed(kind));
    });
}

fn dispatch_loop(rx: Receiver<ServerMessage>, mut engine: StreamEngine) {
    for message in rx.iter() {
        match message {
            ServerMessage::Event(kind, raw) => engine.on_event(kind, &raw),
            ServerMessage::FeedClosed(kind) => engine.terminate(kind),
            ServerMessage::Subscribe {
                request,
                sink,
                reply,
            } => {
                let id = engine.subscribe(request, sink);
                let _ = reply.send(id);
            }
            ServerMessage::Cancel(id) => {
                engine.cancel(id);
            }
            ServerMessage::ActiveCount(reply) => {
                let _ = reply.send(engine.active_subscriptions());
            }
            ServerMessage::Shutdown => break,
        }
    }
    info!(
        "Dispatch loop stopped with {} active subscription(s)",
        engine.active_subscriptions()
    );
}

/// Live, cancellable sequence of converted quotes for one subscription.
///
/// The sequence ends when the subscription is cancelled, an upstream feed terminates
/// or the server shuts down. Dropping the stream cancels the subscription.
pub struct QuoteStream {
    id: SubscriptionId,
    events: Receiver<ConvertedQuote>,
    control: Sender<ServerMessage>,
}

impl QuoteStream {
    /// Identifier of the underlying subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Block until the next converted quote. `None` once the stream has ended.
    pub fn recv(&self) -> Option<ConvertedQuote> {
        self.events.recv().ok()
    }

    /// Wait up to `timeout` for the next converted quote.
    ///
    /// Returns `Ok(None)` on timeout and `StreamError::ChannelRecv` once the stream has ended.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<ConvertedQuote>> {
        match self.events.recv_timeout(timeout) {
            Ok(quote) => Ok(Some(quote)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(StreamError::ChannelRecv(format!("subscription {} ended", self.id)))
            }
        }
    }

    /// Take an already delivered quote without waiting.
    pub fn try_recv(&self) -> Result<Option<ConvertedQuote>> {
        match self.events.try_recv() {
            Ok(quote) => Ok(Some(quote)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(StreamError::ChannelRecv(format!("subscription {} ended", self.id)))
            }
        }
    }

    /// Underlying receiver, for use in `select!`.
    pub fn receiver(&self) -> &Receiver<ConvertedQuote> {
        &self.events
    }

    /// Blocking iterator over converted quotes, finishing when the stream ends.
    pub fn iter(&self) -> crossbeam_channel::Iter<'_, ConvertedQuote> {
        self.events.iter()
    }

    /// Cancel the subscription. No quote is delivered after this returns.
    pub fn cancel(self) {}
}

impl Drop for QuoteStream {
    fn drop(&mut self) {
        let _ = self.control.send(ServerMessage::Cancel(self.id));
    }
}
