// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for Zephyr units.

use std::time::Duration;

use reqwest::{Client, Url, header};
use serde::{Deserialize, Serialize};

use crate::command::{FormField, Method};
use crate::error::{ProtocolError, Result, TransportError};
use crate::protocol::{Transport, encode_form};

// ============================================================================
// HttpConfig - Connection parameters for a unit
// ============================================================================

/// Configuration for reaching a Zephyr unit over HTTP.
///
/// The unit serves plain, unauthenticated HTTP. The host may be given with
/// or without an `http://` prefix; a trailing slash is ignored.
///
/// # Examples
///
/// ```
/// use zephyr_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.60");
/// assert_eq!(config.base_url(), "http://192.168.1.60");
///
/// let config = HttpConfig::new("http://192.168.1.60/")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.60:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the unit
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let host = host.trim().trim_end_matches('/');
        let host = host.strip_prefix("http://").unwrap_or(host);
        Self {
            host: host.to_string(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.port == Self::DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// Creates an `HttpTransport` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidAddress` if the host does not form a
    /// valid URL, or `TransportError::Client` if the HTTP client cannot be
    /// created.
    pub fn into_transport(self) -> Result<HttpTransport> {
        HttpTransport::new(self)
    }
}

// ============================================================================
// HttpTransport
// ============================================================================

/// HTTP transport for a single Zephyr unit.
///
/// # Examples
///
/// ```no_run
/// use zephyr_lib::command::PowerCommand;
/// use zephyr_lib::protocol::{HttpConfig, Transport};
///
/// # async fn example() -> zephyr_lib::Result<()> {
/// let transport = HttpConfig::new("192.168.1.60").into_transport()?;
/// transport.send(&PowerCommand::On).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid or the client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self> {
        let base_url = config.base_url();
        if config.host.is_empty() || config.host.contains("://") {
            return Err(TransportError::InvalidAddress(config.host).into());
        }
        Url::parse(&base_url)
            .map_err(|e| TransportError::InvalidAddress(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            timeout: config.timeout,
        })
    }

    /// Returns the base URL of the unit.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a path.
    fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn map_error(&self, url: &str, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if err.is_builder() {
            TransportError::InvalidAddress(format!("{url}: {err}"))
        } else {
            TransportError::ConnectionFailed(format!("{url}: {err}"))
        }
    }
}

impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, form: &[FormField]) -> Result<String> {
        let url = self.build_url(path);

        tracing::debug!(method = %method, url = %url, form = ?form, "Sending HTTP request");

        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = if form.is_empty() {
            builder
        } else {
            builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encode_form(form))
        };

        let response = builder.send().await.map_err(|e| self.map_error(&url, &e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_error(&url, &e))?;

        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "Device rejected request");
            return Err(ProtocolError::HttpStatus {
                url,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        tracing::debug!(url = %url, bytes = body.len(), "Received HTTP response");

        Ok(body)
    }
}
