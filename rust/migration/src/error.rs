// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Migration error types.

use planscape_topology::EntityType;

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Errors that stop a document from being upgraded.
///
/// Record-level variants name the entity and the document version so a
/// loader can report exactly which record could not be read.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("{entity} {id}: unreadable document version {version:?}")]
    InvalidVersion {
        entity: EntityType,
        id: String,
        version: String,
    },

    /// The document was written by a newer release.
    #[error("{entity} {id}: document version {version} is newer than supported {supported}")]
    FutureVersion {
        entity: EntityType,
        id: String,
        version: String,
        supported: String,
    },

    #[error("{entity} {id} (version {version}): id mixes '-' and ';' separators")]
    MixedSeparators {
        entity: EntityType,
        id: String,
        version: String,
    },

    #[error("{entity} {id} (version {version}): id has an empty component")]
    EmptyIdComponent {
        entity: EntityType,
        id: String,
        version: String,
    },

    /// The id map sends a legacy id somewhere a face id cannot go.
    #[error("{entity} {id} (version {version}): legacy id {legacy:?} maps to invalid id {mapped:?}")]
    InvalidMappedId {
        entity: EntityType,
        id: String,
        version: String,
        legacy: String,
        mapped: String,
    },

    /// The id map sends a legacy id to another legacy id.
    #[error("{entity} {id} (version {version}): legacy id {legacy:?} maps to {mapped:?}, which is itself remapped")]
    ChainedMapping {
        entity: EntityType,
        id: String,
        version: String,
        legacy: String,
        mapped: String,
    },

    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Topology(#[from] planscape_topology::Error),
}
