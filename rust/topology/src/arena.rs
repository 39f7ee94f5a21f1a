// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for sketch entities.
//!
//! The [`Sketch`] is the central owner of all sketch data. Every entity
//! (point, curve, loop, face, face group) lives inside slot maps with stable,
//! generational keys. Upward adjacency indices (point → curves → loops →
//! faces → groups) let a point edit find every face group whose cached
//! bounds it invalidates.
//!
//! ## Liveness
//!
//! Removing an entity through an edit *retires* it: the slot stays occupied
//! so that undo can revive it under the same key, but every query and
//! accessor treats it as absent. Retired entities are dropped for good with
//! [`Sketch::purge`]. Adjacency links are kept for retired entities and
//! filtered at query time.

use std::collections::{BTreeMap, BTreeSet};

use planscape_geometry::{CurveGeometry, ParamRange};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::*;
use crate::point::Point;

/// Data stored for a curve: a parametric piece between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveData {
    pub start: PointKey,
    pub end: PointKey,
    pub geometry: CurveGeometry,
    /// Interval this curve occupies on the curve it was originally cut from.
    pub range: ParamRange,
}

/// One curve of a loop, traversed forward or reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoEdge {
    pub curve: CurveKey,
    pub reversed: bool,
}

/// Data stored for a loop: a closed, ordered chain of co-edges.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopData {
    pub coedges: Vec<CoEdge>,
}

/// Data stored for a face: one outer loop, optional holes, a document id and
/// a tag set.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceData {
    pub outer: LoopKey,
    pub inner: Vec<LoopKey>,
    pub id: String,
    pub tags: BTreeSet<String>,
}

/// How the members of a face group are laid out against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectMode {
    Free,
    Horizontal,
    Vertical,
}

/// Axis-aligned box of one member, relative to the group's overall box.
///
/// `left` is measured from the group's minimum x, `top` from the group's
/// maximum y downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceGroupBound {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Face id → relative bound of that face.
pub type BoundMap = BTreeMap<String, FaceGroupBound>;

/// Data stored for a face group.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGroupData {
    pub members: Vec<FaceKey>,
    pub connect_mode: ConnectMode,
    /// Derived bound cache; `None` until the next read after invalidation.
    pub bounds: Option<BoundMap>,
}

/// The arena that owns all sketch entities, their adjacency indices, the
/// retired set and the dirty set.
///
/// # Example
///
/// ```
/// use planscape_topology::{PointKind, Sketch};
///
/// let mut sketch = Sketch::new();
/// let a = sketch.add_point([0.0, 0.0], PointKind::Corner);
/// let b = sketch.add_point([1.0, 0.0], PointKind::Corner);
/// sketch.add_curve(a, b).unwrap();
///
/// assert_eq!(sketch.point_count(), 2);
/// assert_eq!(sketch.get_all_curves().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Sketch {
    // Entity storage
    pub(crate) points: SlotMap<PointKey, Point>,
    pub(crate) curves: SlotMap<CurveKey, CurveData>,
    pub(crate) loops: SlotMap<LoopKey, LoopData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) face_groups: SlotMap<FaceGroupKey, FaceGroupData>,

    // Upward adjacency: child → parents
    pub(crate) point_to_curves: FxHashMap<PointKey, FxHashSet<CurveKey>>,
    pub(crate) curve_to_loops: FxHashMap<CurveKey, FxHashSet<LoopKey>>,
    pub(crate) loop_to_faces: FxHashMap<LoopKey, FxHashSet<FaceKey>>,
    pub(crate) face_to_groups: FxHashMap<FaceKey, FxHashSet<FaceGroupKey>>,

    // Identity key → points in that bucket
    pub(crate) point_index: FxHashMap<String, FxHashSet<PointKey>>,

    pub(crate) retired: FxHashSet<EntityKey>,
    pub(crate) dirty: FxHashSet<EntityKey>,
}

impl Sketch {
    /// Creates a new, empty sketch.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors (live entities only) ---

    pub fn point(&self, key: PointKey) -> Option<&Point> {
        self.points.get(key).filter(|_| !self.is_retired(key.into()))
    }

    pub fn curve(&self, key: CurveKey) -> Option<&CurveData> {
        self.curves.get(key).filter(|_| !self.is_retired(key.into()))
    }

    pub fn loop_data(&self, key: LoopKey) -> Option<&LoopData> {
        self.loops.get(key).filter(|_| !self.is_retired(key.into()))
    }

    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key).filter(|_| !self.is_retired(key.into()))
    }

    pub fn face_group(&self, key: FaceGroupKey) -> Option<&FaceGroupData> {
        self.face_groups
            .get(key)
            .filter(|_| !self.is_retired(key.into()))
    }

    pub(crate) fn live_point(&self, key: PointKey) -> Result<&Point> {
        self.point(key).ok_or(Error::PointNotFound(key))
    }

    pub(crate) fn live_curve(&self, key: CurveKey) -> Result<&CurveData> {
        self.curve(key).ok_or(Error::CurveNotFound(key))
    }

    pub(crate) fn live_loop(&self, key: LoopKey) -> Result<&LoopData> {
        self.loop_data(key).ok_or(Error::LoopNotFound(key))
    }

    pub(crate) fn live_face(&self, key: FaceKey) -> Result<&FaceData> {
        self.face(key).ok_or(Error::FaceNotFound(key))
    }

    pub(crate) fn live_face_group(&self, key: FaceGroupKey) -> Result<&FaceGroupData> {
        self.face_group(key).ok_or(Error::FaceGroupNotFound(key))
    }

    // --- Counts (live entities only) ---

    pub fn point_count(&self) -> usize {
        self.live_count(self.points.keys().map(EntityKey::from))
    }

    pub fn curve_count(&self) -> usize {
        self.live_count(self.curves.keys().map(EntityKey::from))
    }

    pub fn loop_count(&self) -> usize {
        self.live_count(self.loops.keys().map(EntityKey::from))
    }

    pub fn face_count(&self) -> usize {
        self.live_count(self.faces.keys().map(EntityKey::from))
    }

    pub fn face_group_count(&self) -> usize {
        self.live_count(self.face_groups.keys().map(EntityKey::from))
    }

    fn live_count(&self, keys: impl Iterator<Item = EntityKey>) -> usize {
        keys.filter(|k| !self.is_retired(*k)).count()
    }

    /// Number of occupied slots, retired entities included.
    pub fn slot_count(&self) -> usize {
        self.points.len()
            + self.curves.len()
            + self.loops.len()
            + self.faces.len()
            + self.face_groups.len()
    }

    // --- Existence and liveness ---

    /// Returns `true` if the key occupies a slot, live or retired.
    pub fn contains(&self, key: EntityKey) -> bool {
        match key {
            EntityKey::Point(k) => self.points.contains_key(k),
            EntityKey::Curve(k) => self.curves.contains_key(k),
            EntityKey::Loop(k) => self.loops.contains_key(k),
            EntityKey::Face(k) => self.faces.contains_key(k),
            EntityKey::FaceGroup(k) => self.face_groups.contains_key(k),
        }
    }

    #[inline]
    pub fn is_retired(&self, key: EntityKey) -> bool {
        self.retired.contains(&key)
    }

    #[inline]
    pub fn is_live(&self, key: EntityKey) -> bool {
        self.contains(key) && !self.is_retired(key)
    }

    // --- Dirty set ---

    /// Flags an entity for consumers that re-read changed entities.
    pub fn mark_dirty(&mut self, key: impl Into<EntityKey>) {
        self.dirty.insert(key.into());
    }

    pub fn is_dirty(&self, key: impl Into<EntityKey>) -> bool {
        self.dirty.contains(&key.into())
    }

    /// Drains the dirty set.
    pub fn take_dirty(&mut self) -> FxHashSet<EntityKey> {
        std::mem::take(&mut self.dirty)
    }

    // --- Adjacency index helpers ---

    pub(crate) fn link_point_curve(&mut self, point: PointKey, curve: CurveKey) {
        self.point_to_curves.entry(point).or_default().insert(curve);
    }

    pub(crate) fn link_curve_loop(&mut self, curve: CurveKey, lp: LoopKey) {
        self.curve_to_loops.entry(curve).or_default().insert(lp);
    }

    pub(crate) fn unlink_curve_loop(&mut self, curve: CurveKey, lp: LoopKey) {
        if let Some(set) = self.curve_to_loops.get_mut(&curve) {
            set.remove(&lp);
        }
    }

    pub(crate) fn link_loop_face(&mut self, lp: LoopKey, face: FaceKey) {
        self.loop_to_faces.entry(lp).or_default().insert(face);
    }

    pub(crate) fn link_face_group(&mut self, face: FaceKey, group: FaceGroupKey) {
        self.face_to_groups.entry(face).or_default().insert(group);
    }

    pub(crate) fn unlink_face_group(&mut self, face: FaceKey, group: FaceGroupKey) {
        if let Some(set) = self.face_to_groups.get_mut(&face) {
            set.remove(&group);
        }
    }

    pub(crate) fn index_point(&mut self, key: PointKey, identity: String) {
        self.point_index.entry(identity).or_default().insert(key);
    }

    pub(crate) fn unindex_point(&mut self, key: PointKey, identity: &str) {
        if let Some(set) = self.point_index.get_mut(identity) {
            set.remove(&key);
            if set.is_empty() {
                self.point_index.remove(identity);
            }
        }
    }
}
