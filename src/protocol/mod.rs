// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the device's embedded web server.
//!
//! The unit speaks plain HTTP: one `GET /` returns the status page, and each
//! control is a `POST` to its own path. [`Transport`] is the seam between the
//! rest of the library and the network; [`HttpTransport`] is the real
//! implementation.
//!
//! A transport never retries. Retry and backoff belong to whoever schedules
//! refreshes.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpConfig, HttpTransport};

use std::future::Future;

use crate::command::{Command, FormField, Method};
use crate::error::Result;

/// Trait for sending raw requests to a Zephyr unit.
///
/// Implementations must fail with [`TransportError`](crate::error::TransportError)
/// when no response is received (connection failure, timeout) and with
/// [`ProtocolError`](crate::error::ProtocolError) when the status is not a
/// success. Returned futures are `Send` so requests can run on spawned tasks.
pub trait Transport: Send + Sync + 'static {
    /// Sends a request and returns the response body.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `path` - Path relative to the device root, e.g. `"/fan"`
    /// * `form` - Form fields for the body; empty for no body
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` or `Error::Protocol` if the request fails.
    fn request(
        &self,
        method: Method,
        path: &str,
        form: &[FormField],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Sends a typed command and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying request fails.
    fn send<C: Command + Sync>(&self, command: &C) -> impl Future<Output = Result<String>> + Send {
        async move {
            let form = command.form();
            self.request(command.method(), command.path(), &form).await
        }
    }
}

/// Encodes form fields as an `application/x-www-form-urlencoded` body.
pub(crate) fn encode_form(form: &[FormField]) -> String {
    form.iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_single_field() {
        assert_eq!(encode_form(&[("speed", "51".to_string())]), "speed=51");
    }

    #[test]
    fn encode_escapes_and_joins() {
        let form = [("a b", "x&y".to_string()), ("level", "40".to_string())];
        assert_eq!(encode_form(&form), "a%20b=x%26y&level=40");
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode_form(&[]), "");
    }
}
