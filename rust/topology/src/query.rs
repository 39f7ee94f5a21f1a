// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch queries: entity listings, adjacency lookups, face outlines and
//! the move check built on them.
//!
//! Every query sees live entities only.

use nalgebra::Point2;
use planscape_geometry::polygon::{ensure_ccw, ensure_cw, signed_area};
use planscape_geometry::{tessellate, Tessellation};
use rustc_hash::FxHashSet;

use crate::arena::Sketch;
use crate::construction::check_face_shape;
use crate::error::Result;
use crate::keys::*;

/// Segments used to approximate an arc when a loop is flattened.
pub const ARC_SEGMENTS: usize = 32;

impl Sketch {
    /// All live curves, in slot order.
    pub fn get_all_curves(&self) -> Vec<CurveKey> {
        self.curves
            .keys()
            .filter(|&k| !self.is_retired(k.into()))
            .collect()
    }

    /// All live faces, in slot order.
    pub fn get_all_faces(&self) -> Vec<FaceKey> {
        self.faces
            .keys()
            .filter(|&k| !self.is_retired(k.into()))
            .collect()
    }

    /// Points on the loops of the given faces, outer loops first, each point
    /// once in first-seen order.
    pub fn get_all_points_from_faces(&self, faces: &[FaceKey]) -> Result<Vec<PointKey>> {
        let mut seen = FxHashSet::default();
        let mut points = Vec::new();
        for &fk in faces {
            let face = self.live_face(fk)?;
            for &lk in std::iter::once(&face.outer).chain(&face.inner) {
                for ce in &self.live_loop(lk)?.coedges {
                    let curve = self.live_curve(ce.curve)?;
                    let (first, second) = if ce.reversed {
                        (curve.end, curve.start)
                    } else {
                        (curve.start, curve.end)
                    };
                    for pk in [first, second] {
                        if seen.insert(pk) {
                            points.push(pk);
                        }
                    }
                }
            }
        }
        Ok(points)
    }

    /// For each input point, every live curve incident to it.
    pub fn get_all_edges_by_points(&self, points: &[PointKey]) -> Vec<Vec<CurveKey>> {
        points
            .iter()
            .map(|pk| {
                let mut curves: Vec<CurveKey> = self
                    .point_to_curves
                    .get(pk)
                    .map(|set| {
                        set.iter()
                            .copied()
                            .filter(|&ck| !self.is_retired(ck.into()))
                            .collect()
                    })
                    .unwrap_or_default();
                curves.sort();
                curves
            })
            .collect()
    }

    /// Live faces carrying `tag`.
    pub fn faces_with_tag(&self, tag: &str) -> Vec<FaceKey> {
        self.faces
            .iter()
            .filter(|(k, f)| !self.is_retired((*k).into()) && f.tags.contains(tag))
            .map(|(k, _)| k)
            .collect()
    }

    /// Finds a live face by its document id.
    pub fn face_by_id(&self, id: &str) -> Option<FaceKey> {
        self.faces
            .iter()
            .find(|(k, f)| !self.is_retired((*k).into()) && f.id == id)
            .map(|(k, _)| k)
    }

    /// The live group a face belongs to, if any.
    pub fn group_of_face(&self, face: FaceKey) -> Option<FaceGroupKey> {
        self.face_to_groups
            .get(&face)?
            .iter()
            .copied()
            .find(|&gk| !self.is_retired(gk.into()))
    }

    /// Curves used by any loop of a face.
    pub fn face_curves(&self, face: FaceKey) -> Result<FxHashSet<CurveKey>> {
        let data = self.live_face(face)?;
        let mut curves = FxHashSet::default();
        for &lk in std::iter::once(&data.outer).chain(&data.inner) {
            curves.extend(self.live_loop(lk)?.coedges.iter().map(|c| c.curve));
        }
        Ok(curves)
    }

    /// A face may be moved on its own only if none of its points is shared
    /// with a live curve outside the face's loops.
    pub fn can_move_face(&self, face: FaceKey) -> Result<bool> {
        let own = self.face_curves(face)?;
        let points = self.get_all_points_from_faces(&[face])?;
        Ok(self
            .get_all_edges_by_points(&points)
            .iter()
            .flatten()
            .all(|ck| own.contains(ck)))
    }

    /// Flattens a loop into a polygon in traversal order. Arcs are sampled
    /// with [`ARC_SEGMENTS`] segments.
    pub fn loop_polygon(&self, lp: LoopKey) -> Result<Vec<Point2<f64>>> {
        self.loop_polygon_with(lp, &[])
    }

    /// Like [`Sketch::loop_polygon`], with the listed points read at the
    /// given coordinates instead of their stored ones.
    fn loop_polygon_with(&self, lp: LoopKey, moves: &[(PointKey, [f64; 2])]) -> Result<Vec<Point2<f64>>> {
        let position = |pk: PointKey| match moves.iter().find(|(k, _)| *k == pk) {
            Some(&(_, [x, y])) => Point2::new(x, y),
            None => self.points[pk].position(),
        };

        let data = self.live_loop(lp)?;
        let mut polygon = Vec::with_capacity(data.coedges.len());
        for ce in &data.coedges {
            let curve = self.live_curve(ce.curve)?;
            let mut samples = curve
                .geometry
                .sample(position(curve.start), position(curve.end), ARC_SEGMENTS);
            if ce.reversed {
                samples.reverse();
            }
            samples.pop();
            polygon.extend(samples);
        }
        Ok(polygon)
    }

    /// Live faces using a loop as their outer boundary or as a hole.
    pub fn faces_of_loop(&self, lp: LoopKey) -> Vec<FaceKey> {
        let mut faces: Vec<FaceKey> = self
            .loop_to_faces
            .get(&lp)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&fk| !self.is_retired(fk.into()))
            .collect();
        faces.sort();
        faces
    }

    /// Live faces with a live loop passing through the point.
    pub fn faces_of_point(&self, point: PointKey) -> Vec<FaceKey> {
        let mut faces = Vec::new();
        for ck in self.get_all_edges_by_points(&[point]).into_iter().flatten() {
            for &lk in self.curve_to_loops.get(&ck).into_iter().flatten() {
                if !self.is_retired(lk.into()) {
                    faces.extend(self.faces_of_loop(lk));
                }
            }
        }
        faces.sort();
        faces.dedup();
        faces
    }

    /// Live faces that would lose a valid shape if the points moved to the
    /// given coordinates: a degenerate outer loop, a hole leaving the outer
    /// loop, or overlapping holes. The sketch is not touched.
    pub fn faces_invalidated_by(&self, moves: &[(PointKey, [f64; 2])]) -> Result<Vec<FaceKey>> {
        let mut faces: Vec<FaceKey> = moves
            .iter()
            .flat_map(|&(pk, _)| self.faces_of_point(pk))
            .collect();
        faces.sort();
        faces.dedup();

        let mut invalid = Vec::new();
        for fk in faces {
            let face = self.live_face(fk)?;
            let outer = self.loop_polygon_with(face.outer, moves)?;
            let holes = face
                .inner
                .iter()
                .map(|&lk| self.loop_polygon_with(lk, moves))
                .collect::<Result<Vec<_>>>()?;
            if check_face_shape(&outer, &holes).is_err() {
                invalid.push(fk);
            }
        }
        Ok(invalid)
    }

    /// Outer boundary polygon of a face.
    pub fn face_loop_points(&self, face: FaceKey) -> Result<Vec<Point2<f64>>> {
        let outer = self.live_face(face)?.outer;
        self.loop_polygon(outer)
    }

    /// Outer and inner polygons of a face.
    pub fn face_polygons(&self, face: FaceKey) -> Result<(Vec<Point2<f64>>, Vec<Vec<Point2<f64>>>)> {
        let data = self.live_face(face)?;
        let outer = self.loop_polygon(data.outer)?;
        let inner = data
            .inner
            .iter()
            .map(|&lk| self.loop_polygon(lk))
            .collect::<Result<Vec<_>>>()?;
        Ok((outer, inner))
    }

    /// Enclosed area of a face, holes subtracted.
    pub fn face_area(&self, face: FaceKey) -> Result<f64> {
        let (outer, inner) = self.face_polygons(face)?;
        let holes: f64 = inner.iter().map(|h| signed_area(h).abs()).sum();
        Ok(signed_area(&outer).abs() - holes)
    }

    /// Triangulates a face. The outer loop is fed counter-clockwise and holes
    /// clockwise, whatever their loop direction.
    pub fn triangulate_face(&self, face: FaceKey) -> Result<Tessellation> {
        let (outer, inner) = self.face_polygons(face)?;
        let holes: Vec<Vec<Point2<f64>>> = inner.iter().map(|h| ensure_cw(h)).collect();
        Ok(tessellate(&[ensure_ccw(&outer)], &holes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::make_rectangle;
    use crate::point::PointKind;
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    #[test]
    fn points_from_faces_are_unique() {
        let mut sketch = Sketch::new();
        let (a, _, _) = make_rectangle(&mut sketch, [0.0, 0.0], [1.0, 1.0], "a").unwrap();
        let (b, _, _) = make_rectangle(&mut sketch, [1.0, 0.0], [2.0, 1.0], "b").unwrap();

        assert_eq!(sketch.get_all_points_from_faces(&[a]).unwrap().len(), 4);
        assert_eq!(sketch.get_all_points_from_faces(&[a, b]).unwrap().len(), 6);
    }

    #[test]
    fn edges_by_points_sees_live_curves() {
        let mut sketch = Sketch::new();
        let p = sketch.add_point([0.0, 0.0], PointKind::Common);
        let q = sketch.add_point([1.0, 0.0], PointKind::Common);
        let r = sketch.add_point([0.0, 1.0], PointKind::Common);
        let c1 = sketch.add_curve(p, q).unwrap();
        let c2 = sketch.add_curve(p, r).unwrap();

        let edges = sketch.get_all_edges_by_points(&[p, q]);
        assert_eq!(edges[0].len(), 2);
        assert_eq!(edges[1], vec![c1]);

        sketch.retire(c2.into()).unwrap();
        assert_eq!(sketch.get_all_edges_by_points(&[p])[0], vec![c1]);
    }

    #[test]
    fn shared_boundary_blocks_face_move() {
        let mut sketch = Sketch::new();
        let (a, _, _) = make_rectangle(&mut sketch, [0.0, 0.0], [1.0, 1.0], "a").unwrap();
        let (lone, _, _) = make_rectangle(&mut sketch, [5.0, 5.0], [6.0, 6.0], "lone").unwrap();
        make_rectangle(&mut sketch, [1.0, 0.0], [2.0, 1.0], "b").unwrap();

        assert!(!sketch.can_move_face(a).unwrap());
        assert!(sketch.can_move_face(lone).unwrap());
    }

    #[test]
    fn tags_filter_faces() {
        let mut sketch = Sketch::new();
        let (a, _, _) = make_rectangle(&mut sketch, [0.0, 0.0], [1.0, 1.0], "a").unwrap();
        let (b, _, _) = make_rectangle(&mut sketch, [2.0, 0.0], [3.0, 1.0], "b").unwrap();
        sketch
            .set_face_tags(a, BTreeSet::from(["region".to_string()]))
            .unwrap();
        sketch
            .set_face_tags(b, BTreeSet::from(["region".to_string(), "wall".to_string()]))
            .unwrap();

        assert_eq!(sketch.faces_with_tag("region"), vec![a, b]);
        assert_eq!(sketch.faces_with_tag("wall"), vec![b]);
        assert!(sketch.faces_with_tag("roof").is_empty());

        sketch.retire(b.into()).unwrap();
        assert_eq!(sketch.faces_with_tag("region"), vec![a]);
    }

    #[test]
    fn face_lookup_by_id() {
        let mut sketch = Sketch::new();
        let (a, _, _) = make_rectangle(&mut sketch, [0.0, 0.0], [1.0, 1.0], "a").unwrap();
        assert_eq!(sketch.face_by_id("a"), Some(a));
        assert_eq!(sketch.face_by_id("z"), None);
    }

    #[test]
    fn faces_reached_from_points_and_loops() {
        let mut sketch = Sketch::new();
        let (a, la, _) = make_rectangle(&mut sketch, [0.0, 0.0], [1.0, 1.0], "a").unwrap();
        let (b, _, _) = make_rectangle(&mut sketch, [1.0, 0.0], [2.0, 1.0], "b").unwrap();

        assert_eq!(sketch.faces_of_loop(la), vec![a]);
        let shared = sketch.find_point([1.0, 0.0]).unwrap();
        let mut both = vec![a, b];
        both.sort();
        assert_eq!(sketch.faces_of_point(shared), both);
        let corner = sketch.find_point([2.0, 1.0]).unwrap();
        assert_eq!(sketch.faces_of_point(corner), vec![b]);

        sketch.retire(b.into()).unwrap();
        assert_eq!(sketch.faces_of_point(shared), vec![a]);
    }

    #[test]
    fn hole_leaving_its_face_is_detected() {
        let mut sketch = Sketch::new();
        let (outer_face, outer, _) =
            make_rectangle(&mut sketch, [0.0, 0.0], [10.0, 10.0], "outer").unwrap();
        let (inner_face, hole, _) =
            make_rectangle(&mut sketch, [4.0, 4.0], [6.0, 6.0], "inner").unwrap();
        sketch.retire(outer_face.into()).unwrap();
        sketch.retire(inner_face.into()).unwrap();
        let ring = sketch.add_face(outer, &[hole], "ring", BTreeSet::new()).unwrap();

        let corner = sketch.find_point([6.0, 6.0]).unwrap();
        assert_eq!(sketch.faces_invalidated_by(&[(corner, [20.0, 20.0])]).unwrap(), vec![ring]);
        assert!(sketch.faces_invalidated_by(&[(corner, [7.0, 7.0])]).unwrap().is_empty());
        assert_eq!(sketch.point(corner).unwrap().coords(), [6.0, 6.0]);
    }

    #[test]
    fn triangulated_face_with_hole() {
        let mut sketch = Sketch::new();
        let (outer_face, outer, _) =
            make_rectangle(&mut sketch, [0.0, 0.0], [4.0, 4.0], "outer").unwrap();
        let (inner_face, hole, _) =
            make_rectangle(&mut sketch, [1.0, 1.0], [3.0, 3.0], "inner").unwrap();
        sketch.retire(outer_face.into()).unwrap();
        sketch.retire(inner_face.into()).unwrap();

        let face = sketch.add_face(outer, &[hole], "ring", BTreeSet::new()).unwrap();
        assert_relative_eq!(sketch.face_area(face).unwrap(), 12.0);

        let tess = sketch.triangulate_face(face).unwrap();
        assert_eq!(tess.vertices.len(), 8);
        assert_relative_eq!(tess.area(), 12.0, epsilon = 1e-9);
    }
}
