// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `zephyr_lib` library.
//!
//! Failures fall into three groups: the network could not be reached
//! ([`TransportError`]), the device answered with a non-success status
//! ([`ProtocolError`]), or the caller supplied a value the device does not
//! accept ([`ValueError`]). Value errors are raised before any request is made.
//!
//! All errors are `Clone` so that the outcome of a coalesced refresh can be
//! handed to every caller awaiting it.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The device could not be reached.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The device answered with an unexpected status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Error {
    /// Returns `true` if retrying the same operation later may succeed.
    ///
    /// Only transport failures are considered transient. The core never
    /// retries on its own; this is a hint for the caller's scheduling policy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An operation mode name that the device does not know.
    #[error("unknown operation mode: {0}")]
    UnknownMode(String),

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),
}

/// Network-level failures: the request never produced an HTTP response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection to the device failed (refused, DNS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The request was abandoned before it completed (task aborted or the
    /// runtime shut down).
    #[error("request interrupted: {0}")]
    Interrupted(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// The device responded, but not with a success status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Non-2xx HTTP status.
    #[error("HTTP {status} for {url}: {body}")]
    HttpStatus {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, kept for diagnostics.
        body: String,
    },
}

impl ProtocolError {
    /// Returns the HTTP status code carried by this error.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::HttpStatus { status, .. } => *status,
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
