// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity key types for arena-based storage.
//!
//! Each sketch entity gets a unique, type-safe key for O(1) lookup in the
//! arena. Keys are created by `slotmap::SlotMap` and remain valid after other
//! entities are removed (generational indices), so requests can hold them
//! across commit, undo and redo.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Key for a point.
    pub struct PointKey;

    /// Key for a curve joining two points.
    pub struct CurveKey;

    /// Key for a closed loop of co-edges.
    pub struct LoopKey;

    /// Key for a face bounded by loops.
    pub struct FaceKey;

    /// Key for a group of faces.
    pub struct FaceGroupKey;
}

/// A key that can reference any sketch entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    Point(PointKey),
    Curve(CurveKey),
    Loop(LoopKey),
    Face(FaceKey),
    FaceGroup(FaceGroupKey),
}

impl EntityKey {
    /// Returns the entity type of this key.
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKey::Point(_) => EntityType::Point,
            EntityKey::Curve(_) => EntityType::Curve,
            EntityKey::Loop(_) => EntityType::Loop,
            EntityKey::Face(_) => EntityType::Face,
            EntityKey::FaceGroup(_) => EntityType::FaceGroup,
        }
    }
}

/// Discriminant for entity types, ordered leaf first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Point = 0,
    Curve = 1,
    Loop = 2,
    Face = 3,
    FaceGroup = 4,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Point => "Point",
            EntityType::Curve => "Curve",
            EntityType::Loop => "Loop",
            EntityType::Face => "Face",
            EntityType::FaceGroup => "FaceGroup",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PointKey> for EntityKey {
    fn from(k: PointKey) -> Self {
        EntityKey::Point(k)
    }
}

impl From<CurveKey> for EntityKey {
    fn from(k: CurveKey) -> Self {
        EntityKey::Curve(k)
    }
}

impl From<LoopKey> for EntityKey {
    fn from(k: LoopKey) -> Self {
        EntityKey::Loop(k)
    }
}

impl From<FaceKey> for EntityKey {
    fn from(k: FaceKey) -> Self {
        EntityKey::Face(k)
    }
}

impl From<FaceGroupKey> for EntityKey {
    fn from(k: FaceGroupKey) -> Self {
        EntityKey::FaceGroup(k)
    }
}
