// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::request::Request;

/// An ordered batch of requests that commits as one undo step.
///
/// Pushed requests are queued, not applied; see
/// [`crate::TransactionManager::commit_session`].
#[derive(Debug, Default)]
pub struct TransactionSession {
    pub(crate) requests: Vec<Request>,
}

impl TransactionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: impl Into<Request>) {
        self.requests.push(request.into());
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Discards the queued requests. Nothing was applied, so nothing changes.
    pub fn rollback(self) {
        tracing::debug!(discarded = self.requests.len(), "session rolled back");
    }
}
