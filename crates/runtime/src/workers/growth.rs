//! Optional server-side growth ticker.
//!
//! Crops normally advance only when a client asks for it. When a tick
//! interval is configured this worker advances every live session on that
//! cadence instead, so farms keep growing while nobody polls.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::api::RuntimeHandle;

pub struct GrowthTicker {
    handle: RuntimeHandle,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl GrowthTicker {
    pub fn new(
        handle: RuntimeHandle,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            handle,
            interval: interval.max(Duration::from_millis(1)),
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!(
            target: "runtime::growth",
            interval_ms = self.interval.as_millis() as u64,
            "growth ticker started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let advanced = self.handle.advance_all_crops().await;
                    debug!(target: "runtime::growth", advanced, "growth tick");
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!(target: "runtime::growth", "growth ticker stopped");
    }
}
