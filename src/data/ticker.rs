use crate::data::chart_data::parse_float_str;
use crate::data::fetch::{fetch_json, Source};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// One `stock-ticker-data.json` document. Fields are display strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerSnapshot {
    pub price: String,
    pub percent: String,
    pub change: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerTrend {
    Up,
    Down,
}

impl TickerTrend {
    /// `Up` only for a strictly positive change; zero and unparseable
    /// values count as `Down`.
    pub fn from_change(change: &str) -> Self {
        if parse_float_str(change) > 0.0 {
            TickerTrend::Up
        } else {
            TickerTrend::Down
        }
    }
}

impl TickerSnapshot {
    pub fn trend(&self) -> TickerTrend {
        TickerTrend::from_change(&self.change)
    }
}

/// Background task that re-reads the ticker snapshot on a fixed interval.
/// Dropping the poller stops it.
pub struct TickerPoller {
    handle: JoinHandle<()>,
}

impl TickerPoller {
    /// Polls once immediately, then every `interval`. Successful reads are
    /// sent on the returned channel; failures are logged and skipped. A read
    /// that outlasts `interval` is abandoned and counted as a failure.
    pub fn spawn(
        client: Client,
        source: Source,
        interval: Duration,
    ) -> (Self, mpsc::Receiver<TickerSnapshot>) {
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let fetch = fetch_json::<TickerSnapshot>(&client, &source);
                match tokio::time::timeout(interval, fetch).await {
                    Ok(Ok(snapshot)) => {
                        debug!(price = %snapshot.price, change = %snapshot.change, "ticker updated");
                        if tx.send(snapshot).await.is_err() {
                            return;
                        }
                    }
                    Ok(Err(err)) => {
                        warn!(source = source.name(), %err, "failed to fetch the ticker data");
                    }
                    Err(_) => {
                        warn!(source = source.name(), ?interval, "ticker fetch timed out");
                    }
                }
            }
        });

        (Self { handle }, rx)
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for TickerPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
