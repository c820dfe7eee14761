// SPDX-FileCopyrightText: 2026 Koru Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Capability Monitor
//!
//! Recurring background probe of oracle availability. When availability
//! comes back after an outage, tracked conversations that are not currently
//! encrypted get re-resolved automatically; the common steady state causes
//! no store or oracle traffic beyond the cheap availability check.
//!
//! The monitor is a plain tokio task with an explicit handle. Whatever
//! lifecycle owns the conversation view must call
//! [`CapabilityMonitor::stop`] on teardown so periodic work does not
//! accumulate across many conversation instances; dropping the handle
//! aborts the task as a backstop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::resolver::TrustResolver;

/// Default interval between availability probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Handle to a running capability poll task.
pub struct CapabilityMonitor {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl TrustResolver {
    /// Spawns a background task polling oracle availability at the given
    /// interval.
    ///
    /// Must be called from within a tokio runtime. Each monitor owns its
    /// own timer; spawn one per resolver lifecycle, not per resolution.
    pub fn spawn_capability_monitor(&self, interval: Duration) -> CapabilityMonitor {
        let resolver = self.clone();
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so polling
            // starts one full interval after spawn.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => resolver.poll_capability().await,
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        CapabilityMonitor {
            shutdown,
            handle: Some(handle),
        }
    }
}

impl CapabilityMonitor {
    /// Stops the poll task and waits for it to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Whether the poll task is still running.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for CapabilityMonitor {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
