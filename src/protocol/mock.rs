// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;

use crate::command::{FormField, Method};
use crate::error::Result;
use crate::protocol::Transport;

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recorded {
    pub method: Method,
    pub path: String,
    pub form: Vec<FormField>,
}

/// Scripted transport: `GET` requests pop queued status responses, `POST`
/// requests pop queued command responses. Empty queues answer `Ok("")`.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    pages: Mutex<VecDeque<Result<String>>>,
    commands: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<Recorded>>,
    delay: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_page(&self, page: Result<String>) -> &Self {
        self.pages.lock().push_back(page);
        self
    }

    pub fn push_command(&self, response: Result<String>) -> &Self {
        self.commands.lock().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

impl Transport for MockTransport {
    async fn request(&self, method: Method, path: &str, form: &[FormField]) -> Result<String> {
        self.requests.lock().push(Recorded {
            method,
            path: path.to_string(),
            form: form.to_vec(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let queue = match method {
            Method::Get => &self.pages,
            Method::Post => &self.commands,
        };
        let next = queue.lock().pop_front();
        next.unwrap_or_else(|| Ok(String::new()))
    }
}
