// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic refresh task.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::PollingCoordinator;
use crate::protocol::Transport;

/// Handle to a background polling task.
///
/// Polling stops when the handle is dropped or [`stop`](Self::stop) is
/// called. Stopping never interrupts a refresh already in flight; that
/// refresh completes and publishes normally.
#[derive(Debug)]
pub struct PollingHandle {
    task: JoinHandle<()>,
    interval: Duration,
}

impl PollingHandle {
    /// Returns the polling interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` once the task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops polling.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub(super) fn spawn<T: Transport>(
    coordinator: PollingCoordinator<T>,
    interval: Duration,
) -> PollingHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the caller already holds a snapshot.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = coordinator.refresh().await {
                tracing::debug!(error = %e, "Scheduled refresh failed");
            }
        }
    });

    PollingHandle { task, interval }
}
