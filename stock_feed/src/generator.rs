//! Event generator and broadcasting for the feed simulator.
//!
//! The `FeedGenerator` runs a background thread that walks a value per symbol and
//! broadcasts every tick, already encoded as a JSON line, to all connected consumers.
//! New consumers register by sending a `Sender<String>` to the subscription channel
//! returned by `FeedGenerator::start`. Broadcast is best-effort: a consumer whose
//! channel is gone is removed.

use crossbeam_channel::Sender;
use log::{debug, error, info};
use rand::Rng;
use stock_common::Quote;
use std::thread;
use std::time::Duration;

/// Lowest value a walk may reach.
const FLOOR: f64 = 0.0001;

/// Random-walk generator for one feed.
pub struct FeedGenerator {
    series: Vec<(String, f64)>,
    interval: Duration,
    max_step: f64,
}

impl FeedGenerator {
    /// Create a generator walking every symbol from `initial_value`.
    ///
    /// `max_step` is the largest relative change per tick (e.g., `0.01` for ±1%).
    pub fn new(symbols: Vec<String>, initial_value: f64, max_step: f64, interval: Duration) -> Self {
        Self {
            series: symbols.into_iter().map(|s| (s, initial_value)).collect(),
            interval,
            max_step,
        }
    }

    /// Next value of a walk: a uniform relative change in `[-max_step, +max_step)`,
    /// floored to stay positive.
    pub fn next_value(current: f64, max_step: f64) -> f64 {
        if max_step <= 0.0 {
            return current.max(FLOOR);
        }
        let change: f64 = rand::rng().random_range(-max_step..max_step);
        (current * (1.0 + change)).max(FLOOR)
    }

    /// Produce one tick for every symbol, as encoded event lines.
    pub fn tick(&mut self) -> Vec<String> {
        let mut events = Vec::with_capacity(self.series.len());
        for (symbol, value) in self.series.iter_mut() {
            *value = Self::next_value(*value, self.max_step);
            match Quote::new(symbol.clone(), *value).to_json() {
                Ok(line) => events.push(line),
                Err(e) => error!("Failed to encode {}: {}", symbol, e),
            }
        }
        events
    }

    /// Start the generator thread and return a channel for registering consumers.
    pub fn start(mut self) -> Sender<Sender<String>> {
        let (subscribe_tx, subscribe_rx) = crossbeam_channel::unbounded::<Sender<String>>();

        thread::spawn(move || {
            let mut consumers: Vec<Sender<String>> = Vec::new();
            info!(
                "Feed generator started for {} series (Thread ID: {:?})",
                self.series.len(),
                thread::current().id()
            );

            loop {
                while let Ok(consumer) = subscribe_rx.try_recv() {
                    consumers.push(consumer);
                    info!("Generator: new consumer added. Total consumers: {}", consumers.len());
                }

                for event in self.tick() {
                    debug!("tick {}", event);
                    consumers.retain(|consumer| consumer.send(event.clone()).is_ok());
                }

                thread::sleep(self.interval);
            }
        });
        subscribe_tx
    }
}
