// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-place edits of sketch entities.
//!
//! Every setter returns the value it replaced so callers can restore it with
//! a single reverse call. Edits that can move a face's outline invalidate the
//! bound cache of the groups that face belongs to.

use std::collections::BTreeSet;

use planscape_geometry::split_range;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::point::{identity_key, PointKind};

/// Loop rewiring performed by a curve split.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRewire {
    pub lp: LoopKey,
    pub before: Vec<CoEdge>,
    pub after: Vec<CoEdge>,
}

/// Everything a curve split created or changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSplit {
    /// The curve that was cut. It is retired after the split.
    pub original: CurveKey,
    /// New points at the split positions, in curve order.
    pub points: Vec<PointKey>,
    /// Sub-curves replacing the original, in curve order.
    pub curves: Vec<CurveKey>,
    pub loops: Vec<LoopRewire>,
}

impl Sketch {
    // --- Points ---

    /// Moves a point. Returns the previous coordinates.
    pub fn set_point_position(&mut self, key: PointKey, coords: [f64; 2]) -> Result<[f64; 2]> {
        let old = self.live_point(key)?.coords();
        self.unindex_point(key, &identity_key(old[0], old[1]));
        let point = &mut self.points[key];
        point.x = coords[0];
        point.y = coords[1];
        self.index_point(key, identity_key(coords[0], coords[1]));
        self.invalidate_point_groups(key);
        Ok(old)
    }

    /// Reclassifies a point. Returns the previous kind.
    pub fn set_point_kind(&mut self, key: PointKey, kind: PointKind) -> Result<PointKind> {
        self.live_point(key)?;
        Ok(std::mem::replace(&mut self.points[key].kind, kind))
    }

    // --- Faces ---

    /// Replaces the tag set of a face. Returns the previous set.
    pub fn set_face_tags(&mut self, key: FaceKey, tags: BTreeSet<String>) -> Result<BTreeSet<String>> {
        self.live_face(key)?;
        Ok(std::mem::replace(&mut self.faces[key].tags, tags))
    }

    // --- Face groups ---

    /// Adds a live, ungrouped face to a group.
    pub fn insert_group_member(&mut self, group: FaceGroupKey, face: FaceKey) -> Result<()> {
        self.live_face_group(group)?;
        self.live_face(face)?;
        if self.group_of_face(face).is_some() {
            return Err(Error::FaceAlreadyGrouped(face));
        }

        let data = &mut self.face_groups[group];
        data.members.push(face);
        data.bounds = None;
        self.link_face_group(face, group);
        Ok(())
    }

    /// Removes a member from a group. The last member cannot be removed.
    pub fn remove_group_member(&mut self, group: FaceGroupKey, face: FaceKey) -> Result<()> {
        let data = self.live_face_group(group)?;
        let Some(index) = data.members.iter().position(|&f| f == face) else {
            return Err(Error::NotAGroupMember(face));
        };
        if data.members.len() == 1 {
            return Err(Error::EmptyFaceGroup);
        }

        let data = &mut self.face_groups[group];
        data.members.remove(index);
        data.bounds = None;
        self.unlink_face_group(face, group);
        Ok(())
    }

    /// Changes how a group's members connect. Returns the previous mode.
    pub fn set_connect_mode(&mut self, group: FaceGroupKey, mode: ConnectMode) -> Result<ConnectMode> {
        self.live_face_group(group)?;
        Ok(std::mem::replace(
            &mut self.face_groups[group].connect_mode,
            mode,
        ))
    }

    /// Overwrites a group's data wholesale, relinking membership.
    ///
    /// Used to restore a snapshot taken before an edit, bound cache included.
    /// Returns the data that was replaced.
    pub fn replace_face_group(&mut self, group: FaceGroupKey, data: FaceGroupData) -> Result<FaceGroupData> {
        if !self.face_groups.contains_key(group) {
            return Err(Error::FaceGroupNotFound(group));
        }
        for &fk in &data.members {
            if !self.faces.contains_key(fk) {
                return Err(Error::FaceNotFound(fk));
            }
        }

        let old = std::mem::replace(&mut self.face_groups[group], data);
        for &fk in &old.members {
            self.unlink_face_group(fk, group);
        }
        let members = self.face_groups[group].members.clone();
        for fk in members {
            self.link_face_group(fk, group);
        }
        Ok(old)
    }

    // --- Loops and curves ---

    /// Overwrites a loop's co-edges, relinking curve adjacency. Returns the
    /// previous co-edges. Closure is not re-checked.
    pub fn set_loop_coedges(&mut self, lp: LoopKey, coedges: Vec<CoEdge>) -> Result<Vec<CoEdge>> {
        if !self.loops.contains_key(lp) {
            return Err(Error::LoopNotFound(lp));
        }
        for ce in &coedges {
            if !self.curves.contains_key(ce.curve) {
                return Err(Error::CurveNotFound(ce.curve));
            }
        }

        let old = std::mem::replace(&mut self.loops[lp].coedges, coedges);
        for ce in &old {
            self.unlink_curve_loop(ce.curve, lp);
        }
        let new_curves: SmallVec<[CurveKey; 8]> =
            self.loops[lp].coedges.iter().map(|c| c.curve).collect();
        for ck in new_curves {
            self.link_curve_loop(ck, lp);
        }
        self.invalidate_loop_groups(lp);
        Ok(old)
    }

    /// Cuts a curve at global parameter positions.
    ///
    /// Adds one point per position and `positions.len() + 1` sub-curves that
    /// share the original's shape and carry their slice of its range. Every
    /// live loop through the original is rewired to run through the
    /// sub-curves in the same direction, and the original is retired.
    pub fn split_curve(&mut self, curve: CurveKey, positions: &[f64]) -> Result<CurveSplit> {
        let data = self.live_curve(curve)?.clone();
        let segments = split_range(data.range, positions)?;

        let start = self.points[data.start].position();
        let end = self.points[data.end].position();

        let mut boundary = Vec::with_capacity(segments.len() + 1);
        let mut points = Vec::with_capacity(positions.len());
        boundary.push(data.start);
        for segment in &segments[..segments.len() - 1] {
            let p = data.geometry.point_at(start, end, segment.local.to);
            let pk = self.add_point([p.x, p.y], PointKind::Common);
            boundary.push(pk);
            points.push(pk);
        }
        boundary.push(data.end);

        let curves: Vec<CurveKey> = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                self.insert_curve(CurveData {
                    start: boundary[i],
                    end: boundary[i + 1],
                    geometry: data.geometry,
                    range: segment.range,
                })
            })
            .collect();

        let mut through: Vec<LoopKey> = self
            .curve_to_loops
            .get(&curve)
            .map(|set| {
                set.iter()
                    .copied()
                    .filter(|&lk| !self.is_retired(lk.into()))
                    .collect()
            })
            .unwrap_or_default();
        through.sort();

        let mut loops = Vec::with_capacity(through.len());
        for lp in through {
            let before = self.loops[lp].coedges.clone();
            let after = rewire(&before, curve, &curves);
            self.set_loop_coedges(lp, after.clone())?;
            loops.push(LoopRewire { lp, before, after });
        }

        self.retire(curve.into())?;

        tracing::trace!(pieces = curves.len(), loops = loops.len(), "curve split");

        Ok(CurveSplit {
            original: curve,
            points,
            curves,
            loops,
        })
    }

    // --- Liveness ---

    /// Hides an entity from every query. Its slot and key stay valid.
    pub fn retire(&mut self, key: EntityKey) -> Result<()> {
        if !self.contains(key) {
            return Err(Error::NotFound(key));
        }
        self.retired.insert(key);
        self.invalidate_entity_groups(key);
        Ok(())
    }

    /// Makes a retired entity visible again under the same key.
    pub fn revive(&mut self, key: EntityKey) -> Result<()> {
        if !self.contains(key) {
            return Err(Error::NotFound(key));
        }
        self.retired.remove(&key);
        self.invalidate_entity_groups(key);
        Ok(())
    }

    /// Removes a retired entity from the arena for good.
    ///
    /// Fails if the entity is live or still referenced by another slot, so
    /// composite entities must be purged before their parts.
    pub fn purge(&mut self, key: EntityKey) -> Result<()> {
        if !self.contains(key) {
            return Err(Error::NotFound(key));
        }
        if !self.is_retired(key) {
            return Err(Error::StillLive(key));
        }

        match key {
            EntityKey::Point(k) => {
                if self.point_to_curves.get(&k).is_some_and(|s| !s.is_empty()) {
                    return Err(Error::Referenced(key));
                }
                if let Some(p) = self.points.remove(k) {
                    self.unindex_point(k, &p.identity_key());
                }
                self.point_to_curves.remove(&k);
            }
            EntityKey::Curve(k) => {
                if self.curve_to_loops.get(&k).is_some_and(|s| !s.is_empty()) {
                    return Err(Error::Referenced(key));
                }
                if let Some(c) = self.curves.remove(k) {
                    for pk in [c.start, c.end] {
                        if let Some(set) = self.point_to_curves.get_mut(&pk) {
                            set.remove(&k);
                        }
                    }
                }
                self.curve_to_loops.remove(&k);
            }
            EntityKey::Loop(k) => {
                if self.loop_to_faces.get(&k).is_some_and(|s| !s.is_empty()) {
                    return Err(Error::Referenced(key));
                }
                if let Some(l) = self.loops.remove(k) {
                    for ce in l.coedges {
                        self.unlink_curve_loop(ce.curve, k);
                    }
                }
                self.loop_to_faces.remove(&k);
            }
            EntityKey::Face(k) => {
                if self.face_to_groups.get(&k).is_some_and(|s| !s.is_empty()) {
                    return Err(Error::Referenced(key));
                }
                if let Some(f) = self.faces.remove(k) {
                    for lk in std::iter::once(f.outer).chain(f.inner) {
                        if let Some(set) = self.loop_to_faces.get_mut(&lk) {
                            set.remove(&k);
                        }
                    }
                }
                self.face_to_groups.remove(&k);
            }
            EntityKey::FaceGroup(k) => {
                if let Some(g) = self.face_groups.remove(k) {
                    for fk in g.members {
                        self.unlink_face_group(fk, k);
                    }
                }
            }
        }

        self.retired.remove(&key);
        self.dirty.remove(&key);
        Ok(())
    }

    // --- Bound cache invalidation ---

    fn invalidate_entity_groups(&mut self, key: EntityKey) {
        match key {
            EntityKey::Point(k) => self.invalidate_point_groups(k),
            EntityKey::Curve(k) => self.invalidate_curve_groups(k),
            EntityKey::Loop(k) => self.invalidate_loop_groups(k),
            EntityKey::Face(k) => self.invalidate_face_groups(k),
            EntityKey::FaceGroup(_) => {}
        }
    }

    fn invalidate_point_groups(&mut self, point: PointKey) {
        let curves: SmallVec<[CurveKey; 4]> = self
            .point_to_curves
            .get(&point)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        for ck in curves {
            self.invalidate_curve_groups(ck);
        }
    }

    fn invalidate_curve_groups(&mut self, curve: CurveKey) {
        let loops: SmallVec<[LoopKey; 4]> = self
            .curve_to_loops
            .get(&curve)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        for lk in loops {
            self.invalidate_loop_groups(lk);
        }
    }

    fn invalidate_loop_groups(&mut self, lp: LoopKey) {
        let faces: SmallVec<[FaceKey; 2]> = self
            .loop_to_faces
            .get(&lp)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        for fk in faces {
            self.invalidate_face_groups(fk);
        }
    }

    fn invalidate_face_groups(&mut self, face: FaceKey) {
        let groups: FxHashSet<FaceGroupKey> = self
            .face_to_groups
            .get(&face)
            .cloned()
            .unwrap_or_default();
        for gk in groups {
            if let Some(group) = self.face_groups.get_mut(gk) {
                group.bounds = None;
            }
        }
    }
}

fn rewire(coedges: &[CoEdge], original: CurveKey, pieces: &[CurveKey]) -> Vec<CoEdge> {
    let mut out = Vec::with_capacity(coedges.len() + pieces.len());
    for ce in coedges {
        if ce.curve != original {
            out.push(*ce);
        } else if ce.reversed {
            out.extend(pieces.iter().rev().map(|&curve| CoEdge {
                curve,
                reversed: true,
            }));
        } else {
            out.extend(pieces.iter().map(|&curve| CoEdge {
                curve,
                reversed: false,
            }));
        }
    }
    out
}
