// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level handle for a Zephyr unit.
//!
//! [`Zephyr`] maps intents such as "fan to 40%" onto device requests and
//! keeps the cached snapshot in step with the unit.
//!
//! # Command Flow
//!
//! The unit answers a command with nothing useful, so every control method
//! runs two steps with separate failure handling:
//!
//! 1. Send the write. If it fails, the error is returned and nothing else
//!    happens.
//! 2. If it succeeds, start a refresh of the status page without waiting
//!    for it. Its outcome shows up through [`Zephyr::status`],
//!    [`Zephyr::subscribe`] and [`Zephyr::snapshot`], not in the command's
//!    return value.
//!
//! Commands are not serialized against each other. Two commands sent at
//! once each trigger a refresh, and those refreshes coalesce into a single
//! status request. A command that completes while a status request is
//! already on the wire gets one more refresh after it, so the cache always
//! ends up reading the page as it was after the write.
//!
//! ```no_run
//! use zephyr_lib::Zephyr;
//! use zephyr_lib::types::OperationMode;
//!
//! # async fn example() -> zephyr_lib::Result<()> {
//! let (zephyr, snapshot) = Zephyr::http("192.168.1.60").connect().await?;
//! println!("{:?} at {:?}%", snapshot.operation_mode(), snapshot.fan_percentage());
//!
//! zephyr.set_fan_percentage(40).await?;
//! zephyr.select_mode(OperationMode::Intake).await?;
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::ZephyrBuilder;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::command::{
    BuzzerCommand, Command, FanSpeedCommand, HumidityCommand, ModeCommand, PowerCommand,
};
use crate::coordinator::{CoordinatorStatus, PollingCoordinator, PollingHandle};
use crate::error::Result;
use crate::protocol::{HttpConfig, HttpTransport, Transport};
use crate::status::DeviceSnapshot;
use crate::types::{
    FanSpeed, HumidityLevel, OperationMode, Percentage, PowerState, percentage_to_device,
};

/// A Zephyr ventilation unit.
///
/// Cloning is cheap; clones share the transport and the snapshot cache.
///
/// # Creating a Device
///
/// ```no_run
/// use zephyr_lib::Zephyr;
///
/// # async fn example() -> zephyr_lib::Result<()> {
/// // Reads the status page once; fails if the unit cannot be reached
/// let (zephyr, _initial) = Zephyr::http("192.168.1.60").connect().await?;
///
/// // No network access until the first refresh
/// let zephyr = Zephyr::http("192.168.1.60").build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Zephyr<T: Transport = HttpTransport> {
    transport: Arc<T>,
    coordinator: PollingCoordinator<T>,
}

impl<T: Transport> Clone for Zephyr<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            coordinator: self.coordinator.clone(),
        }
    }
}

impl Zephyr<HttpTransport> {
    /// Creates a builder for a unit at the given host.
    #[must_use]
    pub fn http(host: impl Into<String>) -> ZephyrBuilder {
        ZephyrBuilder::new(HttpConfig::new(host))
    }

    /// Creates a builder from a full HTTP configuration.
    #[must_use]
    pub fn http_config(config: HttpConfig) -> ZephyrBuilder {
        ZephyrBuilder::new(config)
    }
}

impl<T: Transport> Zephyr<T> {
    /// Wraps a transport without contacting the unit.
    ///
    /// The cache starts [`Uninitialized`](crate::coordinator::RefreshState::Uninitialized).
    #[must_use]
    pub fn new(transport: T) -> Self {
        let transport = Arc::new(transport);
        Self {
            coordinator: PollingCoordinator::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Wraps a transport and reads the status page once.
    ///
    /// A unit that cannot be read at setup time is an error; no handle is
    /// returned in that case.
    ///
    /// # Errors
    ///
    /// Returns the error of the initial refresh.
    pub async fn connect(transport: T) -> Result<(Self, Arc<DeviceSnapshot>)> {
        let zephyr = Self::new(transport);
        let snapshot = zephyr.coordinator.refresh().await?;
        tracing::info!(
            device_id = snapshot.text("device_id").as_deref().unwrap_or("unknown"),
            fields = snapshot.len(),
            "Connected to Zephyr unit"
        );
        Ok((zephyr, snapshot))
    }

    /// Returns the refresh coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &PollingCoordinator<T> {
        &self.coordinator
    }

    /// Returns the last known snapshot, which may be stale.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<DeviceSnapshot>> {
        self.coordinator.current()
    }

    /// Returns the refresh status.
    #[must_use]
    pub fn status(&self) -> CoordinatorStatus {
        self.coordinator.status()
    }

    /// Subscribes to refresh status updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorStatus> {
        self.coordinator.subscribe()
    }

    /// Re-reads the status page now.
    ///
    /// # Errors
    ///
    /// Returns error if the status page cannot be fetched.
    pub async fn refresh(&self) -> Result<Arc<DeviceSnapshot>> {
        self.coordinator.refresh().await
    }

    /// Starts refreshing every `interval` in the background.
    #[must_use = "polling stops when the handle is dropped"]
    pub fn start_polling(&self, interval: Duration) -> PollingHandle {
        self.coordinator.spawn_polling(interval)
    }

    // ========== Power Control ==========

    /// Switches the unit on.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn power_on(&self) -> Result<()> {
        self.set_power(PowerState::On).await
    }

    /// Switches the unit off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn power_off(&self) -> Result<()> {
        self.set_power(PowerState::Off).await
    }

    /// Sets the power state.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_power(&self, state: PowerState) -> Result<()> {
        self.dispatch(&PowerCommand::from(state)).await
    }

    /// Turns the fan on, optionally at a given percentage.
    ///
    /// With a percentage only the speed is sent, which also starts the unit.
    /// Without one the unit is switched on at its previous speed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the percentage exceeds 100, or the command
    /// error.
    pub async fn turn_on(&self, percentage: Option<u8>) -> Result<()> {
        match percentage {
            Some(p) => self.set_fan_percentage(p).await.map(|_| ()),
            None => self.power_on().await,
        }
    }

    // ========== Fan ==========

    /// Sets the native fan speed (22-80).
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_fan_speed(&self, speed: FanSpeed) -> Result<()> {
        self.dispatch(&FanSpeedCommand(speed)).await
    }

    /// Sets the fan speed as a percentage and returns the native speed sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `percentage` exceeds 100, without sending
    /// anything, or the command error.
    pub async fn set_fan_percentage(&self, percentage: u8) -> Result<FanSpeed> {
        let speed = percentage_to_device(Percentage::new(percentage)?);
        self.set_fan_speed(speed).await?;
        Ok(speed)
    }

    // ========== Mode ==========

    /// Selects an operation mode.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn select_mode(&self, mode: OperationMode) -> Result<()> {
        self.dispatch(&ModeCommand(mode)).await
    }

    /// Selects an operation mode by name (`"Cycle"`, `"Intake"`, `"Exhaust"`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for an unknown name, without sending anything,
    /// or the command error.
    pub async fn select_mode_str(&self, mode: &str) -> Result<()> {
        let mode: OperationMode = mode.parse()?;
        self.select_mode(mode).await
    }

    // ========== Settings ==========

    /// Sets the target humidity in percent (35-100).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the level is out of range, without sending
    /// anything, or the command error.
    pub async fn set_target_humidity(&self, level: u8) -> Result<()> {
        let level = HumidityLevel::new(level)?;
        self.dispatch(&HumidityCommand(level)).await
    }

    /// Enables or disables the buzzer.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_buzzer(&self, enabled: bool) -> Result<()> {
        self.dispatch(&BuzzerCommand::from(enabled)).await
    }

    /// Sends one write, then requests a refresh if it succeeded.
    async fn dispatch<C: Command + Sync>(&self, command: &C) -> Result<()> {
        if let Err(e) = self.transport.send(command).await {
            tracing::warn!(path = command.path(), error = %e, "Command failed");
            return Err(e);
        }
        self.coordinator.request_refresh();
        Ok(())
    }
}
