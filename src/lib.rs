// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `zephyr_lib` - A Rust library to monitor and control BSK Zephyr
//! ventilation units.
//!
//! The unit has no API in the usual sense. Its state is only available as an
//! HTML status page, and its controls are bare form POSTs that return nothing
//! useful. This library scrapes the page into a typed snapshot, keeps that
//! snapshot current with coalesced refreshes, and re-reads the page after
//! every command.
//!
//! # Supported Features
//!
//! - **Status**: temperature, humidity, fan speed, mode, filter timer, RSSI
//! - **Power control**: On/Off
//! - **Fan control**: native speed (22-80) or percentage (0-100%)
//! - **Mode control**: Cycle, Intake, Exhaust
//! - **Settings**: target humidity, buzzer
//!
//! # Quick Start
//!
//! ```no_run
//! use zephyr_lib::Zephyr;
//!
//! #[tokio::main]
//! async fn main() -> zephyr_lib::Result<()> {
//!     // Reads the status page once; returns (device, initial_snapshot)
//!     let (zephyr, snapshot) = Zephyr::http("192.168.1.60").connect().await?;
//!     println!("temperature: {:?} °C", snapshot.temperature());
//!
//!     // Refresh in the background every 10 seconds
//!     let _polling = zephyr.start_polling(std::time::Duration::from_secs(10));
//!
//!     // Each command triggers a refresh of the cached snapshot
//!     zephyr.set_fan_percentage(60).await?;
//!     zephyr.select_mode_str("Intake").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Watching for Updates
//!
//! ```no_run
//! use zephyr_lib::Zephyr;
//!
//! # async fn example() -> zephyr_lib::Result<()> {
//! let (zephyr, _) = Zephyr::http("192.168.1.60").connect().await?;
//! let mut updates = zephyr.subscribe();
//!
//! while updates.changed().await.is_ok() {
//!     let available = updates.borrow().is_available();
//!     if let Some(snapshot) = zephyr.snapshot() {
//!         println!("available={available} fan={:?}%", snapshot.fan_percentage());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod coordinator;
mod device;
pub mod error;
pub mod protocol;
pub mod status;
pub mod types;

pub use command::{
    BuzzerCommand, Command, FanSpeedCommand, HumidityCommand, ModeCommand, PowerCommand,
    StatusQuery,
};
pub use coordinator::{CoordinatorStatus, PollingCoordinator, PollingHandle, RefreshState};
pub use device::{Zephyr, ZephyrBuilder};
pub use error::{Error, ProtocolError, Result, TransportError, ValueError};
pub use protocol::{HttpConfig, HttpTransport, Transport};
pub use status::{DeviceInfo, DeviceSnapshot, Value};
pub use types::{
    FanSpeed, HumidityLevel, OperationMode, Percentage, PowerState, device_to_percentage,
    percentage_to_device,
};
