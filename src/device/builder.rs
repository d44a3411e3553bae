// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP device builder.

use std::sync::Arc;
use std::time::Duration;

use crate::device::Zephyr;
use crate::error::Result;
use crate::protocol::{HttpConfig, HttpTransport};
use crate::status::DeviceSnapshot;

/// Builder for a [`Zephyr`] reached over HTTP.
///
/// Created with [`Zephyr::http`] or [`Zephyr::http_config`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use zephyr_lib::Zephyr;
///
/// # async fn example() -> zephyr_lib::Result<()> {
/// let (zephyr, snapshot) = Zephyr::http("192.168.1.60")
///     .with_timeout(Duration::from_secs(5))
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ZephyrBuilder {
    config: HttpConfig,
}

impl ZephyrBuilder {
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Returns the HTTP configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the handle and reads the status page once.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The address is invalid
    /// - The unit cannot be reached or answers with an error status
    pub async fn connect(self) -> Result<(Zephyr<HttpTransport>, Arc<DeviceSnapshot>)> {
        let transport = self.config.into_transport()?;
        Zephyr::connect(transport).await
    }

    /// Builds the handle without contacting the unit.
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid or the HTTP client cannot be
    /// created.
    pub fn build_without_probe(self) -> Result<Zephyr<HttpTransport>> {
        let transport = self.config.into_transport()?;
        Ok(Zephyr::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::RefreshState;

    #[test]
    fn builder_applies_options() {
        let builder = Zephyr::http("192.168.1.60")
            .with_port(8080)
            .with_timeout(Duration::from_secs(2));
        assert_eq!(builder.config().port(), 8080);
        assert_eq!(builder.config().timeout(), Duration::from_secs(2));
    }

    #[test]
    fn builder_from_config() {
        let builder = Zephyr::http_config(HttpConfig::new("zephyr.local").with_port(81));
        assert_eq!(builder.config().base_url(), "http://zephyr.local:81");
    }

    #[test]
    fn build_without_probe_is_uninitialized() {
        let zephyr = Zephyr::http("192.168.1.60").build_without_probe().unwrap();
        assert!(zephyr.snapshot().is_none());
        assert_eq!(zephyr.status().state, RefreshState::Uninitialized);
    }

    #[test]
    fn build_without_probe_rejects_bad_address() {
        assert!(Zephyr::http("").build_without_probe().is_err());
    }
}
