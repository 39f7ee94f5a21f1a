// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for sketch entities.
//!
//! Each entity is created through the sketch, which ensures referential
//! integrity (all referenced sub-entities must be live) and maintains the
//! adjacency indices.

use std::collections::BTreeSet;

use nalgebra::Point2;
use planscape_geometry::polygon::{contour_inside_contour, contours_overlap, is_valid_contour};
use planscape_geometry::{CurveGeometry, ParamRange};
use rustc_hash::FxHashSet;

use crate::arena::*;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::point::{same_identity, Point, PointKind};

impl Sketch {
    /// Adds a point at `[x, y]`.
    pub fn add_point(&mut self, coords: [f64; 2], kind: PointKind) -> PointKey {
        let point = Point::create(coords, kind);
        let identity = point.identity_key();
        let key = self.points.insert(point);
        self.index_point(key, identity);
        key
    }

    /// Returns the live point sharing the identity key of `coords`, or adds
    /// a new one. The kind of an existing point is left untouched.
    pub fn add_point_dedup(&mut self, coords: [f64; 2], kind: PointKind) -> PointKey {
        match self.find_point(coords) {
            Some(existing) => existing,
            None => self.add_point(coords, kind),
        }
    }

    /// Finds a live point whose identity key matches `coords`.
    pub fn find_point(&self, coords: [f64; 2]) -> Option<PointKey> {
        let identity = crate::point::identity_key(coords[0], coords[1]);
        self.point_index
            .get(&identity)?
            .iter()
            .copied()
            .filter(|&k| !self.is_retired(k.into()))
            .min()
    }

    /// Creates a straight curve between two live points.
    pub fn add_curve(&mut self, start: PointKey, end: PointKey) -> Result<CurveKey> {
        self.add_curve_with_geometry(start, end, CurveGeometry::Line)
    }

    /// Creates a curve of the given shape between two live points, spanning
    /// the full parameter range.
    pub fn add_curve_with_geometry(
        &mut self,
        start: PointKey,
        end: PointKey,
        geometry: CurveGeometry,
    ) -> Result<CurveKey> {
        self.live_point(start)?;
        self.live_point(end)?;
        Ok(self.insert_curve(CurveData {
            start,
            end,
            geometry,
            range: ParamRange::UNIT,
        }))
    }

    pub(crate) fn insert_curve(&mut self, data: CurveData) -> CurveKey {
        let (start, end) = (data.start, data.end);
        let key = self.curves.insert(data);
        self.link_point_curve(start, key);
        self.link_point_curve(end, key);
        key
    }

    /// Coordinates of a curve's end points in traversal order.
    pub(crate) fn coedge_ends(&self, curve: &CurveData, reversed: bool) -> ([f64; 2], [f64; 2]) {
        let start = self.points[curve.start].coords();
        let end = self.points[curve.end].coords();
        if reversed {
            (end, start)
        } else {
            (start, end)
        }
    }

    /// Creates a closed loop from an ordered list of curves.
    ///
    /// Consecutive curves must meet at points with the same identity key, and
    /// the last curve must return to the start of the first. The traversal
    /// direction of each curve is inferred from connectivity.
    pub fn add_loop(&mut self, curve_keys: &[CurveKey]) -> Result<LoopKey> {
        let coedges = self.infer_coedges(curve_keys)?;
        Ok(self.insert_loop(coedges))
    }

    pub(crate) fn insert_loop(&mut self, coedges: Vec<CoEdge>) -> LoopKey {
        let curves: Vec<CurveKey> = coedges.iter().map(|c| c.curve).collect();
        let key = self.loops.insert(LoopData { coedges });
        for ck in curves {
            self.link_curve_loop(ck, key);
        }
        key
    }

    fn infer_coedges(&self, curve_keys: &[CurveKey]) -> Result<Vec<CoEdge>> {
        if curve_keys.is_empty() {
            return Err(Error::EmptyLoop);
        }

        let mut curves = Vec::with_capacity(curve_keys.len());
        for &ck in curve_keys {
            let curve = self.live_curve(ck)?;
            curves.push(self.coedge_ends(curve, false));
        }

        let mut reversed = Vec::with_capacity(curves.len());

        if curves.len() == 1 {
            reversed.push(false);
        } else {
            // First orientation is decided by how it meets the second curve
            let (first_start, first_end) = curves[0];
            let (second_start, second_end) = curves[1];

            if same_identity(first_end, second_start) || same_identity(first_end, second_end) {
                reversed.push(false);
            } else if same_identity(first_start, second_start)
                || same_identity(first_start, second_end)
            {
                reversed.push(true);
            } else {
                return Err(Error::DisconnectedLoop(0, 1));
            }

            for i in 1..curves.len() {
                let prev_end = if reversed[i - 1] {
                    curves[i - 1].0
                } else {
                    curves[i - 1].1
                };
                let (curr_start, curr_end) = curves[i];

                if same_identity(prev_end, curr_start) {
                    reversed.push(false);
                } else if same_identity(prev_end, curr_end) {
                    reversed.push(true);
                } else {
                    return Err(Error::DisconnectedLoop(i - 1, i));
                }
            }
        }

        let first_start = if reversed[0] { curves[0].1 } else { curves[0].0 };
        let last = curves.len() - 1;
        let last_end = if reversed[last] {
            curves[last].0
        } else {
            curves[last].1
        };
        if !same_identity(first_start, last_end) {
            return Err(Error::OpenLoop);
        }

        Ok(curve_keys
            .iter()
            .zip(reversed)
            .map(|(&curve, reversed)| CoEdge { curve, reversed })
            .collect())
    }

    /// Creates a face from an outer loop, inner loops (holes), a document id
    /// and a tag set.
    ///
    /// The outer loop must enclose area. Every inner loop must lie strictly
    /// inside the outer loop, and inner loops may not overlap each other.
    pub fn add_face(
        &mut self,
        outer: LoopKey,
        inner: &[LoopKey],
        id: &str,
        tags: BTreeSet<String>,
    ) -> Result<FaceKey> {
        validate_face_id(id)?;
        if self.face_by_id(id).is_some() {
            return Err(Error::DuplicateFaceId(id.to_string()));
        }

        let outer_polygon = self.loop_polygon(outer)?;
        let holes = inner
            .iter()
            .map(|&lk| self.loop_polygon(lk))
            .collect::<Result<Vec<_>>>()?;
        check_face_shape(&outer_polygon, &holes)?;

        let key = self.faces.insert(FaceData {
            outer,
            inner: inner.to_vec(),
            id: id.to_string(),
            tags,
        });

        self.link_loop_face(outer, key);
        for &lk in inner {
            self.link_loop_face(lk, key);
        }

        Ok(key)
    }

    /// Creates a face group over live faces that are not grouped yet.
    pub fn add_face_group(&mut self, faces: &[FaceKey], mode: ConnectMode) -> Result<FaceGroupKey> {
        if faces.is_empty() {
            return Err(Error::EmptyFaceGroup);
        }

        let mut seen = FxHashSet::default();
        for &fk in faces {
            self.live_face(fk)?;
            if !seen.insert(fk) || self.group_of_face(fk).is_some() {
                return Err(Error::FaceAlreadyGrouped(fk));
            }
        }

        let key = self.face_groups.insert(FaceGroupData {
            members: faces.to_vec(),
            connect_mode: mode,
            bounds: None,
        });

        for &fk in faces {
            self.link_face_group(fk, key);
        }

        Ok(key)
    }
}

/// Checks that the outer polygon encloses area and that every hole lies
/// strictly inside it without overlapping another hole.
pub(crate) fn check_face_shape(outer: &[Point2<f64>], holes: &[Vec<Point2<f64>>]) -> Result<()> {
    if !is_valid_contour(outer) {
        return Err(Error::DegenerateFace);
    }
    for (i, hole) in holes.iter().enumerate() {
        if !is_valid_contour(hole) || !contour_inside_contour(hole, outer) {
            return Err(Error::InvalidHole(i));
        }
    }
    for i in 0..holes.len() {
        for j in i + 1..holes.len() {
            if contours_overlap(&holes[i], &holes[j]) {
                return Err(Error::OverlappingHoles(i, j));
            }
        }
    }
    Ok(())
}

/// Face ids are joined with `;` into group ids, and legacy group ids used `-`.
pub fn validate_face_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains('-') || id.contains(';') {
        return Err(Error::InvalidFaceId(id.to_string()));
    }
    Ok(())
}

/// Helper to build an axis-aligned rectangular face from two corners.
///
/// Corner points are deduplicated against existing points, so rectangles
/// that share a side share its corner points. Creates 4 curves, 1 loop and
/// 1 face. Returns `(face_key, loop_key, curve_keys)`.
pub fn make_rectangle(
    sketch: &mut Sketch,
    min: [f64; 2],
    max: [f64; 2],
    id: &str,
) -> Result<(FaceKey, LoopKey, [CurveKey; 4])> {
    let p0 = sketch.add_point_dedup(min, PointKind::Corner);
    let p1 = sketch.add_point_dedup([max[0], min[1]], PointKind::Corner);
    let p2 = sketch.add_point_dedup(max, PointKind::Corner);
    let p3 = sketch.add_point_dedup([min[0], max[1]], PointKind::Corner);
    let c0 = sketch.add_curve(p0, p1)?;
    let c1 = sketch.add_curve(p1, p2)?;
    let c2 = sketch.add_curve(p2, p3)?;
    let c3 = sketch.add_curve(p3, p0)?;
    let lp = sketch.add_loop(&[c0, c1, c2, c3])?;
    let face = sketch.add_face(lp, &[], id, BTreeSet::new())?;
    Ok((face, lp, [c0, c1, c2, c3]))
}
