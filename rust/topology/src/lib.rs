// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Planscape Topology
//!
//! Sketch entities for a 2D plan editor: points, curves, closed loops,
//! faces with holes, and face groups.
//!
//! Entities live in slot maps inside a [`Sketch`] and are addressed by
//! generational keys, so edits can be recorded as key + old value + new value
//! and replayed in either direction. Upward adjacency indices (point → curve
//! → loop → face → group) keep each face group's cached bound map honest:
//! any edit that can move a member's outline drops the cache, and the next
//! read rebuilds it.
//!
//! Points are matched across slots by an identity key derived from their
//! coordinates (see [`point::identity_key`]), which is what loop closure
//! and point deduplication compare.

pub mod arena;
pub mod construction;
pub mod edit;
pub mod error;
pub mod face_group;
pub mod keys;
pub mod point;
pub mod query;
pub mod serialization;

pub use arena::{
    BoundMap, CoEdge, ConnectMode, CurveData, FaceData, FaceGroupBound, FaceGroupData, LoopData,
    Sketch,
};
pub use construction::{make_rectangle, validate_face_id};
pub use edit::{CurveSplit, LoopRewire};
pub use error::{Error, Result};
pub use face_group::GROUP_ID_SEPARATOR;
pub use keys::{CurveKey, EntityKey, EntityType, FaceGroupKey, FaceKey, LoopKey, PointKey};
pub use point::{identity_key, Point, PointKind, PRECISION_FACTOR};
pub use serialization::{
    CurveRecord, DocumentData, EntityRecord, FaceGroupRecord, FaceRecord, LoopRecord, PointRecord,
    DOCUMENT_VERSION,
};
