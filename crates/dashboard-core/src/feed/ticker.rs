//! Live Price Ticker
//!
//! One spawned task owns the price map and is its only writer. Each tick it
//! asks the feed for a fresh map and publishes a whole [`TickerSnapshot`]
//! through a `watch` channel, so readers never observe a half-applied tick.
//!
//! ```text
//!  Connecting ──schedule──▶ Connected ──feed error──▶ Disconnected
//!                              ▲  │                        │
//!                              │  └──────── stop ──────────┤
//!                              └───── next good tick ──────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::PriceFeed;
use crate::config::MAX_TICK_MS;
use crate::error::{EngineError, Result};
use crate::model::PriceMap;

/// Default spacing between ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1200);

/// Connection state of the ticker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Connecting,
    Connected,
    Disconnected,
}

/// What readers see between ticks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Prices after the latest tick
    pub current: PriceMap,

    /// Prices immediately before the latest tick
    pub previous: PriceMap,

    pub status: FeedStatus,

    /// When the latest successful tick landed
    pub last_tick_at: DateTime<Utc>,

    /// Successful ticks so far
    pub ticks: u64,
}

impl TickerSnapshot {
    pub fn new(initial: PriceMap) -> Self {
        Self {
            previous: initial.clone(),
            current: initial,
            status: FeedStatus::Connecting,
            last_tick_at: Utc::now(),
            ticks: 0,
        }
    }

    /// Accept a new map. The outgoing `current` becomes `previous`.
    pub fn advance(&mut self, next: PriceMap, at: DateTime<Utc>) {
        self.previous = std::mem::replace(&mut self.current, next);
        self.status = FeedStatus::Connected;
        self.last_tick_at = at;
        self.ticks += 1;
    }

    /// Mark the feed as down without touching either map
    pub const fn disconnect(&mut self) {
        self.status = FeedStatus::Disconnected;
    }
}

/// Spawns ticker tasks
pub struct PriceTicker;

impl PriceTicker {
    /// Start ticking `feed` every `interval`, beginning from `initial`.
    ///
    /// Must be called from within a tokio runtime. The first tick fires one
    /// interval after start. Intervals outside `(0, MAX_TICK_MS)` are
    /// rejected with [`EngineError::Config`].
    pub fn start(initial: PriceMap, interval: Duration, feed: Arc<dyn PriceFeed>) -> Result<TickerHandle> {
        check_interval(interval)?;

        let (tx, rx) = watch::channel(TickerSnapshot::new(initial));
        let (stop_tx, stop_rx) = oneshot::channel();

        tracing::info!(feed = feed.name(), interval_ms = interval.as_millis(), "price ticker starting");
        let task = tokio::spawn(run(tx, stop_rx, interval, feed));

        Ok(TickerHandle {
            snapshots: rx,
            stop: Some(stop_tx),
            task: Some(task),
        })
    }
}

fn check_interval(interval: Duration) -> Result<()> {
    if interval.is_zero() || interval >= Duration::from_millis(MAX_TICK_MS) {
        return Err(EngineError::Config(format!(
            "tick interval must be between 1 and {} ms, got {interval:?}",
            MAX_TICK_MS - 1
        )));
    }
    Ok(())
}

async fn run(
    tx: watch::Sender<TickerSnapshot>,
    mut stop_rx: oneshot::Receiver<()>,
    period: Duration,
    feed: Arc<dyn PriceFeed>,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tx.send_modify(|s| s.status = FeedStatus::Connected);

    loop {
        tokio::select! {
            biased;

            // Fires on an explicit stop and when the handle is dropped
            _ = &mut stop_rx => break,

            _ = interval.tick() => {
                let current = tx.borrow().current.clone();
                match feed.next_prices(&current).await {
                    Ok(next) => {
                        tx.send_modify(|s| s.advance(next, Utc::now()));
                        tracing::debug!(ticks = tx.borrow().ticks, "price tick");
                    }
                    Err(e) => {
                        tracing::warn!(feed = feed.name(), error = %e, "price feed failed, keeping last prices");
                        tx.send_modify(TickerSnapshot::disconnect);
                    }
                }
            }
        }
    }

    tx.send_modify(TickerSnapshot::disconnect);
    tracing::info!(feed = feed.name(), "price ticker stopped");
}

/// Owner's handle on a running ticker.
///
/// Dropping the handle stops the ticker as well.
pub struct TickerHandle {
    snapshots: watch::Receiver<TickerSnapshot>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> TickerSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn status(&self) -> FeedStatus {
        self.snapshots.borrow().status
    }

    /// A receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<TickerSnapshot> {
        self.snapshots.clone()
    }

    /// Stop ticking and wait for the task to exit.
    ///
    /// Returns `true` the first time; later calls are no-ops returning
    /// `false`. No tick is published once this returns.
    pub async fn stop(&mut self) -> bool {
        let Some(stop) = self.stop.take() else {
            return false;
        };
        // The task may already be gone if it panicked
        let _ = stop.send(());
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "price ticker task ended abnormally");
            }
        }
        true
    }

    pub const fn is_stopped(&self) -> bool {
        self.stop.is_none()
    }
}
