// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot cache and refresh coordination.
//!
//! The unit never confirms a command, so the only way to learn its state is
//! to re-read the status page. [`PollingCoordinator`] owns the last good
//! [`DeviceSnapshot`] and serializes every re-read:
//!
//! - At most one status request is in flight. Callers that ask for a refresh
//!   while one is running wait for that same request and get its outcome.
//! - [`request_refresh`](PollingCoordinator::request_refresh), used after
//!   every command, never settles for a request that was sent before it was
//!   called. It queues at most one follow-up behind such a request.
//! - A successful refresh replaces the snapshot in one step; readers see
//!   either the old snapshot or the new one, never a mix.
//! - A failed refresh keeps the old snapshot for readers, marks the cache
//!   [`RefreshState::Stale`], and returns the error to the caller.
//! - Nothing is retried here. Scheduling belongs to the caller, or to
//!   [`PollingCoordinator::spawn_polling`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use zephyr_lib::coordinator::PollingCoordinator;
//! use zephyr_lib::protocol::HttpConfig;
//!
//! # async fn example() -> zephyr_lib::Result<()> {
//! let transport = Arc::new(HttpConfig::new("192.168.1.60").into_transport()?);
//! let coordinator = PollingCoordinator::new(transport);
//!
//! let snapshot = coordinator.refresh().await?;
//! println!("fan at {:?}%", snapshot.fan_percentage());
//! # Ok(())
//! # }
//! ```

mod polling;
mod state;

pub use polling::PollingHandle;
pub use state::{CoordinatorStatus, RefreshState};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use crate::command::StatusQuery;
use crate::error::{Error, Result, TransportError};
use crate::protocol::Transport;
use crate::status::{self, DeviceSnapshot};

type RefreshOutcome = Result<Arc<DeviceSnapshot>>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// The refresh currently running, tagged so only its own task clears it.
struct InFlight {
    id: u64,
    /// Set once the task has sent its status request.
    started: bool,
    future: SharedRefresh,
}

#[derive(Default)]
struct Slot {
    next_id: u64,
    current: Option<InFlight>,
    /// Run one more refresh when `current` ends.
    rerun: bool,
}

struct Inner<T> {
    transport: Arc<T>,
    snapshot: RwLock<Option<Arc<DeviceSnapshot>>>,
    status: watch::Sender<CoordinatorStatus>,
    inflight: Mutex<Slot>,
}

/// Owns the cached snapshot of one unit and coordinates refreshes.
///
/// Cloning is cheap and every clone shares the same cache.
pub struct PollingCoordinator<T: Transport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Clone for PollingCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> fmt::Debug for PollingCoordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingCoordinator")
            .field("status", &*self.inner.status.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> PollingCoordinator<T> {
    /// Polling interval used by the unit's own web UI.
    pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(10);

    /// Shortest interval accepted by [`spawn_polling`](Self::spawn_polling).
    pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates a coordinator with no snapshot yet.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        let (status, _) = watch::channel(CoordinatorStatus::default());
        Self {
            inner: Arc::new(Inner {
                transport,
                snapshot: RwLock::new(None),
                status,
                inflight: Mutex::new(Slot::default()),
            }),
        }
    }

    /// Returns the transport used for status requests.
    #[must_use]
    pub fn transport(&self) -> &Arc<T> {
        &self.inner.transport
    }

    /// Returns the last published snapshot, which may be stale.
    ///
    /// `None` until the first refresh succeeds.
    #[must_use]
    pub fn current(&self) -> Option<Arc<DeviceSnapshot>> {
        self.inner.snapshot.read().clone()
    }

    /// Fetches and parses the status page, replacing the cached snapshot.
    ///
    /// If a refresh is already running, waits for it instead of sending a
    /// second request. Dropping the returned future does not cancel the
    /// refresh; it still completes and publishes its result.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the transport or protocol error of the failed request. The
    /// previous snapshot stays available through [`current`](Self::current).
    pub async fn refresh(&self) -> Result<Arc<DeviceSnapshot>> {
        self.start_refresh(false).await
    }

    /// Starts a refresh without waiting for it.
    ///
    /// A running refresh that has not sent its request yet is joined. One
    /// that already sent it may have read the page before whatever the
    /// caller just changed, so a single follow-up refresh is queued to run
    /// when it ends. Further calls before then share that follow-up.
    ///
    /// The outcome is only observable through [`status`](Self::status),
    /// [`subscribe`](Self::subscribe) and [`current`](Self::current).
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_refresh(&self) {
        drop(self.start_refresh(true));
    }

    /// Returns the current refresh status.
    #[must_use]
    pub fn status(&self) -> CoordinatorStatus {
        self.inner.status.borrow().clone()
    }

    /// Returns the freshness of the cached snapshot.
    #[must_use]
    pub fn state(&self) -> RefreshState {
        self.inner.status.borrow().state
    }

    /// Returns the error of the last refresh, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<Error> {
        self.inner.status.borrow().last_error.clone()
    }

    /// Returns when the current snapshot was fetched.
    #[must_use]
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.inner.status.borrow().last_success
    }

    /// Returns the number of failed refreshes since the last success.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.inner.status.borrow().consecutive_failures
    }

    /// Returns `true` if the last refresh succeeded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.status.borrow().is_available()
    }

    /// Subscribes to status updates, published after every refresh.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorStatus> {
        self.inner.status.subscribe()
    }

    /// Refreshes every `interval` on a background task.
    ///
    /// Scheduled refreshes coalesce with on-demand ones like any other
    /// caller. Intervals below [`MIN_SCAN_INTERVAL`](Self::MIN_SCAN_INTERVAL)
    /// are raised to it. The first refresh happens one interval from now.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use = "polling stops when the handle is dropped"]
    pub fn spawn_polling(&self, interval: Duration) -> PollingHandle {
        polling::spawn(self.clone(), interval.max(Self::MIN_SCAN_INTERVAL))
    }

    fn start_refresh(&self, follow_up: bool) -> SharedRefresh {
        let mut slot = self.inner.inflight.lock();
        let running = slot
            .current
            .as_ref()
            .map(|f| (f.id, f.started, f.future.clone()));

        match running {
            Some((id, true, future)) if follow_up => {
                tracing::trace!(refresh = id, "Queueing follow-up refresh");
                slot.rerun = true;
                future
            }
            Some((id, _, future)) => {
                tracing::trace!(refresh = id, "Joining in-flight refresh");
                future
            }
            None => self.inner.spawn_refresh(&mut slot),
        }
    }
}

impl<T: Transport> Inner<T> {
    /// Spawns a refresh task and stores it in `slot`.
    fn spawn_refresh(self: &Arc<Self>, slot: &mut Slot) -> SharedRefresh {
        slot.next_id += 1;
        let id = slot.next_id;
        let inner = Arc::clone(self);

        // The caller holds the slot lock until the future is stored, so the
        // task cannot touch the slot before it is filled.
        let task = tokio::spawn(async move {
            let _clear = ClearOnDrop {
                inner: Arc::clone(&inner),
                id,
            };
            inner.mark_started(id);
            let outcome = inner.fetch().await;
            inner.publish(&outcome);
            inner.finish(id);
            outcome
        });

        let future = async move {
            task.await.unwrap_or_else(|e| {
                Err(TransportError::Interrupted(format!("refresh task: {e}")).into())
            })
        }
        .boxed()
        .shared();

        tracing::trace!(refresh = id, "Started refresh");
        slot.current = Some(InFlight {
            id,
            started: false,
            future: future.clone(),
        });
        future
    }

    fn mark_started(&self, id: u64) {
        let mut slot = self.inflight.lock();
        if let Some(inflight) = slot.current.as_mut().filter(|f| f.id == id) {
            inflight.started = true;
        }
    }

    /// Frees the slot and starts the queued follow-up, if any.
    fn finish(self: &Arc<Self>, id: u64) {
        let mut slot = self.inflight.lock();
        if slot.current.as_ref().is_some_and(|f| f.id == id) {
            slot.current = None;
            if std::mem::take(&mut slot.rerun) {
                tracing::debug!(after = id, "Starting follow-up refresh");
                drop(self.spawn_refresh(&mut slot));
            }
        }
    }

    async fn fetch(&self) -> RefreshOutcome {
        let page = self.transport.send(&StatusQuery).await?;
        Ok(Arc::new(status::parse(&page)))
    }

    fn publish(&self, outcome: &RefreshOutcome) {
        match outcome {
            Ok(snapshot) => {
                *self.snapshot.write() = Some(Arc::clone(snapshot));
                self.status.send_modify(|status| {
                    if status.state != RefreshState::Fresh {
                        tracing::info!(from = ?status.state, "Device status is fresh");
                    }
                    status.state = status.state.after(true);
                    status.last_error = None;
                    status.last_success = Some(snapshot.fetched_at());
                    status.consecutive_failures = 0;
                });
            }
            Err(err) => {
                self.status.send_modify(|status| {
                    status.state = status.state.after(false);
                    status.last_error = Some(err.clone());
                    status.consecutive_failures = status.consecutive_failures.saturating_add(1);
                    tracing::warn!(
                        error = %err,
                        state = ?status.state,
                        failures = status.consecutive_failures,
                        "Status refresh failed"
                    );
                });
            }
        }
    }
}

/// Frees the in-flight slot if the refresh task ends by panic or abort.
struct ClearOnDrop<T> {
    inner: Arc<Inner<T>>,
    id: u64,
}

impl<T> Drop for ClearOnDrop<T> {
    fn drop(&mut self) {
        let mut slot = self.inner.inflight.lock();
        if slot.current.as_ref().is_some_and(|f| f.id == self.id) {
            slot.current = None;
            slot.rerun = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Method;
    use crate::error::ProtocolError;
    use crate::protocol::mock::MockTransport;

    fn page(body: &str) -> Result<String> {
        Ok(body.to_string())
    }

    fn offline() -> Result<String> {
        Err(TransportError::ConnectionFailed("connection refused".to_string()).into())
    }

    #[tokio::test]
    async fn starts_uninitialized() {
        let coordinator = PollingCoordinator::new(Arc::new(MockTransport::new()));
        assert_eq!(coordinator.state(), RefreshState::Uninitialized);
        assert!(coordinator.current().is_none());
        assert!(!coordinator.is_available());
    }

    #[tokio::test]
    async fn refresh_publishes_snapshot() {
        let transport = Arc::new(MockTransport::new());
        transport.push_page(page("<b>Fan Speed:</b> 51"));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        let snapshot = coordinator.refresh().await.unwrap();

        assert_eq!(snapshot.fan_speed(), Some(51));
        assert_eq!(snapshot.fan_percentage(), Some(50));
        assert!(Arc::ptr_eq(&coordinator.current().unwrap(), &snapshot));
        assert_eq!(coordinator.state(), RefreshState::Fresh);
        assert_eq!(coordinator.last_success(), Some(snapshot.fetched_at()));
        assert_eq!(transport.requests()[0].path, "/");
        assert_eq!(transport.requests()[0].method, Method::Get);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_snapshot() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_page(page("<b>Power:</b> ON"))
            .push_page(offline());
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        let first = coordinator.refresh().await.unwrap();
        let err = coordinator.refresh().await.unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::ConnectionFailed(_))));
        assert!(Arc::ptr_eq(&coordinator.current().unwrap(), &first));
        assert_eq!(coordinator.state(), RefreshState::Stale);
        assert!(!coordinator.is_available());
        assert_eq!(coordinator.consecutive_failures(), 1);
        assert!(coordinator.last_error().is_some());
    }

    #[tokio::test]
    async fn stale_recovers_on_success() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_page(page("<b>Fan Speed:</b> 30"))
            .push_page(offline())
            .push_page(offline())
            .push_page(page("<b>Fan Speed:</b> 60"));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        coordinator.refresh().await.unwrap();
        coordinator.refresh().await.unwrap_err();
        coordinator.refresh().await.unwrap_err();
        assert_eq!(coordinator.consecutive_failures(), 2);

        let snapshot = coordinator.refresh().await.unwrap();
        assert_eq!(snapshot.fan_speed(), Some(60));
        assert_eq!(coordinator.state(), RefreshState::Fresh);
        assert_eq!(coordinator.consecutive_failures(), 0);
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test]
    async fn failure_before_first_snapshot_stays_uninitialized() {
        let transport = Arc::new(MockTransport::new());
        transport.push_page(Err(ProtocolError::HttpStatus {
            url: "http://device/".to_string(),
            status: 503,
            body: "busy".to_string(),
        }
        .into()));
        let coordinator = PollingCoordinator::new(transport);

        let err = coordinator.refresh().await.unwrap_err();

        assert!(matches!(err, Error::Protocol(ref e) if e.status() == 503));
        assert_eq!(coordinator.state(), RefreshState::Uninitialized);
        assert!(coordinator.current().is_none());
    }

    #[tokio::test]
    async fn empty_page_is_a_valid_snapshot() {
        let transport = Arc::new(MockTransport::new());
        transport.push_page(page("<html>booting</html>"));
        let coordinator = PollingCoordinator::new(transport);

        let snapshot = coordinator.refresh().await.unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(coordinator.state(), RefreshState::Fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_refreshes_share_one_request() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
        transport.push_page(page("<b>Humidity:</b> 45 %"));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        let (a, b) = tokio::join!(coordinator.refresh(), coordinator.refresh());

        assert_eq!(transport.count(Method::Get), 1);
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_failure() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
        transport.push_page(offline());
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        let (a, b) = tokio::join!(coordinator.refresh(), coordinator.refresh());

        assert_eq!(transport.count(Method::Get), 1);
        assert!(a.is_err());
        assert!(b.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_refreshes_issue_new_requests() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(5)));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        coordinator.refresh().await.unwrap();
        coordinator.refresh().await.unwrap();

        assert_eq!(transport.count(Method::Get), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_refresh_still_completes() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
        transport.push_page(page("<b>Power:</b> OFF"));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), coordinator.refresh()).await;
        assert!(abandoned.is_err());

        // Joins the refresh that is still running rather than starting another.
        let snapshot = coordinator.refresh().await.unwrap();
        assert_eq!(snapshot.text("power").as_deref(), Some("OFF"));
        assert_eq!(transport.count(Method::Get), 1);
        assert_eq!(coordinator.state(), RefreshState::Fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn request_refresh_does_not_wait() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
        transport.push_page(page("<b>Buzzer:</b> 1"));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));
        let mut updates = coordinator.subscribe();

        coordinator.request_refresh();
        assert!(coordinator.current().is_none());

        updates.changed().await.unwrap();
        assert!(updates.borrow().is_available());
        assert_eq!(coordinator.current().unwrap().buzzer_enabled(), Some(true));
        assert_eq!(transport.count(Method::Get), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn request_after_send_queues_one_follow_up() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
        transport
            .push_page(page("<b>Power:</b> OFF"))
            .push_page(page("<b>Power:</b> ON"));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        coordinator.request_refresh();
        tokio::time::sleep(Duration::from_millis(10)).await;
        // The first request is on the wire; both calls share one follow-up.
        coordinator.request_refresh();
        coordinator.request_refresh();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(transport.count(Method::Get), 2);
        assert_eq!(coordinator.current().unwrap().text("power").as_deref(), Some("ON"));
        assert_eq!(coordinator.state(), RefreshState::Fresh);
    }

    #[tokio::test]
    async fn request_before_send_joins_pending_refresh() {
        let transport = Arc::new(MockTransport::new());
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        coordinator.request_refresh();
        coordinator.request_refresh();
        coordinator.refresh().await.unwrap();
        tokio::task::yield_now().await;

        assert_eq!(transport.count(Method::Get), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_joins_without_follow_up() {
        let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        coordinator.request_refresh();
        tokio::time::sleep(Duration::from_millis(10)).await;
        coordinator.refresh().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(transport.count(Method::Get), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_refreshes_on_interval() {
        let transport = Arc::new(MockTransport::new());
        let coordinator = PollingCoordinator::new(Arc::clone(&transport));

        let handle = coordinator.spawn_polling(Duration::from_secs(10));
        assert_eq!(handle.interval(), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(transport.count(Method::Get), 3);

        handle.stop();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(transport.count(Method::Get), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_interval_has_a_floor() {
        let coordinator = PollingCoordinator::new(Arc::new(MockTransport::new()));
        let handle = coordinator.spawn_polling(Duration::ZERO);
        assert_eq!(
            handle.interval(),
            PollingCoordinator::<MockTransport>::MIN_SCAN_INTERVAL
        );
    }
}
