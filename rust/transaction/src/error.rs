// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the transaction engine.

use crate::request::RequestType;

/// Result type alias for transaction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, committing or replaying requests.
///
/// Validation refusals are not errors; see [`crate::CommitOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown request type {0:?}")]
    UnknownRequestType(String),

    #[error("invalid payload for {request}: {source}")]
    InvalidPayload {
        request: RequestType,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid argument for {request}: {reason}")]
    InvalidArgument {
        request: RequestType,
        reason: &'static str,
    },

    /// `on_undo`/`on_redo` called on a request that never committed.
    #[error("{0} has not been committed")]
    NotCommitted(RequestType),

    /// `on_commit` called twice on the same request.
    #[error("{0} was already committed")]
    AlreadyCommitted(RequestType),

    #[error(transparent)]
    Topology(#[from] planscape_topology::Error),
}
