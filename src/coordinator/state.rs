// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Refresh state reported by the coordinator.

use chrono::{DateTime, Utc};

use crate::error::Error;

/// Freshness of the cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefreshState {
    /// No refresh has succeeded yet.
    #[default]
    Uninitialized,
    /// The last refresh succeeded.
    Fresh,
    /// The last refresh failed; the previous snapshot is still served.
    Stale,
}

impl RefreshState {
    /// Returns the state after a refresh with the given outcome.
    #[must_use]
    pub const fn after(self, succeeded: bool) -> Self {
        match (self, succeeded) {
            (_, true) => Self::Fresh,
            (Self::Uninitialized, false) => Self::Uninitialized,
            (Self::Fresh | Self::Stale, false) => Self::Stale,
        }
    }
}

/// Status of a [`PollingCoordinator`](super::PollingCoordinator), published
/// after every completed refresh.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorStatus {
    /// Freshness of the cached snapshot.
    pub state: RefreshState,
    /// Error from the last refresh, cleared on success.
    pub last_error: Option<Error>,
    /// When the current snapshot was fetched.
    pub last_success: Option<DateTime<Utc>>,
    /// Failed refreshes since the last success.
    pub consecutive_failures: u32,
}

impl CoordinatorStatus {
    /// Returns `true` if the last refresh succeeded.
    ///
    /// Presentation layers use this to mark the unit unavailable while it
    /// cannot be reached, even though a stale snapshot is still readable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state == RefreshState::Fresh
    }
}
