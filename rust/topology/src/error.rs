// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for sketch operations.

use crate::keys::{CurveKey, EntityKey, FaceGroupKey, FaceKey, LoopKey, PointKey};

/// Result type alias for sketch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during sketch operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced entity is missing or retired.
    #[error("entity not found: {0:?}")]
    NotFound(EntityKey),

    #[error("point not found: {0:?}")]
    PointNotFound(PointKey),

    #[error("curve not found: {0:?}")]
    CurveNotFound(CurveKey),

    #[error("loop not found: {0:?}")]
    LoopNotFound(LoopKey),

    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    #[error("face group not found: {0:?}")]
    FaceGroupNotFound(FaceGroupKey),

    /// A loop must have at least one curve.
    #[error("loop must have at least one curve")]
    EmptyLoop,

    /// Consecutive curves of a loop do not share an end point.
    #[error("loop curves are not connected: curve {0} does not meet curve {1}")]
    DisconnectedLoop(usize, usize),

    /// The last curve of a loop does not return to the first.
    #[error("loop is not closed")]
    OpenLoop,

    /// The outer boundary of a face encloses no area.
    #[error("face outer loop is degenerate")]
    DegenerateFace,

    /// An inner loop is degenerate, outside the outer loop, or crosses it.
    #[error("inner loop {0} is not strictly inside the outer loop")]
    InvalidHole(usize),

    /// Two inner loops of a face overlap.
    #[error("inner loops {0} and {1} overlap")]
    OverlappingHoles(usize, usize),

    /// Face ids may not be empty and may not contain `-` or `;`.
    #[error("invalid face id {0:?}")]
    InvalidFaceId(String),

    #[error("duplicate face id {0:?}")]
    DuplicateFaceId(String),

    /// A face group must keep at least one member.
    #[error("face group must have at least one face")]
    EmptyFaceGroup,

    /// A face can belong to at most one live group.
    #[error("face {0:?} already belongs to a face group")]
    FaceAlreadyGrouped(FaceKey),

    #[error("face {0:?} is not a member of the face group")]
    NotAGroupMember(FaceKey),

    /// Only retired entities can be purged.
    #[error("entity is still live: {0:?}")]
    StillLive(EntityKey),

    /// Purging would leave another slot pointing at a removed entity.
    #[error("entity is still referenced: {0:?}")]
    Referenced(EntityKey),

    /// A persisted record lacks a field the loader requires.
    #[error("{entity} record {id} is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        id: String,
        field: &'static str,
    },

    /// A persisted record refers to an id that does not exist.
    #[error("{entity} record refers to unknown {target} {id}")]
    DanglingReference {
        entity: &'static str,
        target: &'static str,
        id: String,
    },

    #[error(transparent)]
    Geometry(#[from] planscape_geometry::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
