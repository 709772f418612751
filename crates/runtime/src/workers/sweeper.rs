//! Periodic eviction of idle sessions.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::RuntimeHandle;

/// Evicts sessions whose `last_active` is older than `idle_ttl`, checking
/// every `interval`.
pub struct IdleSweeper {
    handle: RuntimeHandle,
    idle_ttl: Duration,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl IdleSweeper {
    pub fn new(
        handle: RuntimeHandle,
        idle_ttl: Duration,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            handle,
            idle_ttl,
            interval: interval.max(Duration::from_millis(1)),
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!(
            target: "runtime::sweeper",
            idle_ttl_secs = self.idle_ttl.as_secs(),
            interval_secs = self.interval.as_secs(),
            "idle sweeper started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can be idle yet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep().await,
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!(target: "runtime::sweeper", "idle sweeper stopped");
    }

    async fn sweep(&self) {
        let Some(cutoff) = idle_cutoff(Utc::now(), self.idle_ttl) else {
            warn!(target: "runtime::sweeper", "idle ttl out of range; skipping sweep");
            return;
        };

        match self.handle.evict_idle_since(cutoff).await {
            Ok(0) => {}
            Ok(evicted) => debug!(target: "runtime::sweeper", evicted, "sweep finished"),
            Err(err) => warn!(target: "runtime::sweeper", error = %err, "sweep failed"),
        }
    }
}

/// `now - ttl`, or `None` when the result falls outside chrono's range.
fn idle_cutoff(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(ttl).ok()?;
    now.checked_sub_signed(ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_ttl_before_now() {
        let now = Utc::now();
        let cutoff = idle_cutoff(now, Duration::from_secs(90)).unwrap();
        assert_eq!(now - cutoff, chrono::Duration::seconds(90));
    }

    #[test]
    fn huge_ttl_yields_no_cutoff() {
        assert_eq!(idle_cutoff(Utc::now(), Duration::from_secs(10_000_000_000_000)), None);
        assert_eq!(idle_cutoff(Utc::now(), Duration::MAX), None);
    }
}
