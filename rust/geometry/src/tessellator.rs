// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Streaming polygon tessellator.
//!
//! Input is fed through a begin/end protocol:
//!
//! ```text
//! begin_polygon
//!   (begin_contour vertex* end_contour)*
//! end_polygon -> Tessellation
//! ```
//!
//! Contours are classified by winding: counter-clockwise contours are outer
//! boundaries, clockwise contours are holes. Orientation is the caller's
//! responsibility; a clockwise "outer" is treated as a hole and fails with
//! [`Error::OrphanHole`] if nothing encloses it.
//!
//! Each hole is attached to the first outer contour that contains its first
//! vertex, and each outer with its holes is triangulated independently.
//! Output indices address the vertex list in the order vertices were fed.

use nalgebra::Point2;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::polygon::{point_in_contour, signed_area};
use crate::triangulation::triangulate_polygon_with_holes;

/// Triangulated output of one polygon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tessellation {
    /// Every vertex fed to the tessellator, in feed order.
    pub vertices: Vec<Point2<f64>>,
    /// Triangle list (three indices per triangle) into `vertices`.
    pub indices: Vec<usize>,
}

impl Tessellation {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Total unsigned area covered by the triangles.
    pub fn area(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|t| {
                let a = self.vertices[t[0]];
                let b = self.vertices[t[1]];
                let c = self.vertices[t[2]];
                ((b - a).perp(&(c - a)) * 0.5).abs()
            })
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Polygon,
    Contour,
}

/// Protocol-driven tessellator. Reusable: `end_polygon` resets it to idle.
#[derive(Debug)]
pub struct Tessellator {
    phase: Phase,
    vertices: Vec<Point2<f64>>,
    /// `(start, end)` vertex ranges of closed contours.
    contours: Vec<(usize, usize)>,
    contour_start: usize,
}

impl Tessellator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            vertices: Vec::new(),
            contours: Vec::new(),
            contour_start: 0,
        }
    }

    pub fn begin_polygon(&mut self) -> Result<()> {
        if self.phase != Phase::Idle {
            return Err(Error::Protocol("begin_polygon while a polygon is open"));
        }
        self.vertices.clear();
        self.contours.clear();
        self.phase = Phase::Polygon;
        Ok(())
    }

    pub fn begin_contour(&mut self) -> Result<()> {
        if self.phase != Phase::Polygon {
            return Err(Error::Protocol("begin_contour outside of a polygon"));
        }
        self.contour_start = self.vertices.len();
        self.phase = Phase::Contour;
        Ok(())
    }

    pub fn vertex(&mut self, point: Point2<f64>) -> Result<()> {
        if self.phase != Phase::Contour {
            return Err(Error::Protocol("vertex outside of a contour"));
        }
        self.vertices.push(point);
        Ok(())
    }

    pub fn end_contour(&mut self) -> Result<()> {
        if self.phase != Phase::Contour {
            return Err(Error::Protocol("end_contour without begin_contour"));
        }
        self.contours.push((self.contour_start, self.vertices.len()));
        self.phase = Phase::Polygon;
        Ok(())
    }

    /// Closes the polygon and triangulates everything fed since `begin_polygon`.
    pub fn end_polygon(&mut self) -> Result<Tessellation> {
        if self.phase != Phase::Polygon {
            return Err(Error::Protocol("end_polygon with an open contour or no polygon"));
        }
        self.phase = Phase::Idle;

        let vertices = std::mem::take(&mut self.vertices);
        let contours = std::mem::take(&mut self.contours);
        let indices = triangulate_contours(&vertices, &contours)?;
        Ok(Tessellation { vertices, indices })
    }
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

fn triangulate_contours(vertices: &[Point2<f64>], contours: &[(usize, usize)]) -> Result<Vec<usize>> {
    let mut outers: Vec<(usize, SmallVec<[usize; 4]>)> = Vec::new();
    let mut holes: SmallVec<[usize; 8]> = SmallVec::new();

    for (index, &(start, end)) in contours.iter().enumerate() {
        let contour = &vertices[start..end];
        if contour.len() < 3 {
            return Err(Error::DegenerateContour {
                index,
                reason: "fewer than 3 vertices",
            });
        }
        let area = signed_area(contour);
        if area > 0.0 {
            outers.push((index, SmallVec::new()));
        } else if area < 0.0 {
            holes.push(index);
        } else {
            return Err(Error::DegenerateContour {
                index,
                reason: "zero area",
            });
        }
    }

    for &hole in &holes {
        let (start, _) = contours[hole];
        let probe = vertices[start];
        let owner = outers.iter_mut().find(|(outer, _)| {
            let (s, e) = contours[*outer];
            point_in_contour(&probe, &vertices[s..e])
        });
        match owner {
            Some((_, owned)) => owned.push(hole),
            None => return Err(Error::OrphanHole { index: hole }),
        }
    }

    let mut indices = Vec::new();
    for (outer, owned) in &outers {
        let (s, e) = contours[*outer];
        let hole_points: Vec<Vec<Point2<f64>>> = owned
            .iter()
            .map(|&h| {
                let (hs, he) = contours[h];
                vertices[hs..he].to_vec()
            })
            .collect();

        let local = triangulate_polygon_with_holes(&vertices[s..e], &hole_points)?;

        // Map local indices (outer, then holes in order) back to feed order
        let mut offsets: SmallVec<[(usize, usize); 5]> = SmallVec::new();
        offsets.push((e - s, s));
        for &h in owned.iter() {
            let (hs, he) = contours[h];
            offsets.push((he - hs, hs));
        }
        indices.extend(local.into_iter().map(|i| remap(i, &offsets)));
    }

    Ok(indices)
}

#[inline]
fn remap(mut local: usize, offsets: &[(usize, usize)]) -> usize {
    for &(len, base) in offsets {
        if local < len {
            return base + local;
        }
        local -= len;
    }
    unreachable!("triangulation index outside of the contours it was given")
}

/// Tessellates an outer contour set and a hole contour set.
///
/// Outer contours are fed first, then holes, all through one
/// `begin_polygon`/`end_polygon` pair.
pub fn tessellate(outer: &[Vec<Point2<f64>>], holes: &[Vec<Point2<f64>>]) -> Result<Tessellation> {
    let mut tess = Tessellator::new();
    tess.begin_polygon()?;
    for contour in outer.iter().chain(holes) {
        tess.begin_contour()?;
        for &p in contour {
            tess.vertex(p)?;
        }
        tess.end_contour()?;
    }
    tess.end_polygon()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn single_outer() {
        let t = tessellate(&[rect(0.0, 0.0, 2.0, 1.0)], &[]).unwrap();
        assert_eq!(t.triangle_count(), 2);
        assert_relative_eq!(t.area(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn hole_is_subtracted() {
        let mut hole = rect(1.0, 1.0, 3.0, 3.0);
        hole.reverse();
        let t = tessellate(&[rect(0.0, 0.0, 4.0, 4.0)], &[hole]).unwrap();
        assert_relative_eq!(t.area(), 12.0, epsilon = 1e-9);
        assert!(t.indices.iter().all(|&i| i < t.vertices.len()));
    }

    #[test]
    fn holes_go_to_their_enclosing_outer() {
        let mut hole = rect(11.0, 1.0, 12.0, 2.0);
        hole.reverse();
        let t = tessellate(
            &[rect(0.0, 0.0, 4.0, 4.0), rect(10.0, 0.0, 14.0, 4.0)],
            &[hole],
        )
        .unwrap();
        assert_relative_eq!(t.area(), 16.0 + 15.0, epsilon = 1e-9);
        // Hole vertices (8..12) are referenced only alongside the second outer (4..8)
        for tri in t.indices.chunks_exact(3) {
            if tri.iter().any(|&i| i >= 8) {
                assert!(tri.iter().all(|&i| i >= 4));
            }
        }
    }

    #[test]
    fn clockwise_outer_is_not_corrected() {
        let mut cw = rect(0.0, 0.0, 1.0, 1.0);
        cw.reverse();
        assert!(matches!(
            tessellate(&[cw], &[]),
            Err(Error::OrphanHole { index: 0 })
        ));
    }

    #[test]
    fn protocol_violations() {
        let mut tess = Tessellator::new();
        assert!(tess.vertex(Point2::new(0.0, 0.0)).is_err());
        assert!(tess.begin_contour().is_err());
        tess.begin_polygon().unwrap();
        assert!(tess.begin_polygon().is_err());
        tess.begin_contour().unwrap();
        assert!(tess.end_polygon().is_err());
    }

    #[test]
    fn degenerate_contour_rejected() {
        let line = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(matches!(
            tessellate(&[line], &[]),
            Err(Error::DegenerateContour { index: 0, .. })
        ));
    }

    #[test]
    fn tessellator_is_reusable() {
        let mut tess = Tessellator::new();
        for _ in 0..2 {
            tess.begin_polygon().unwrap();
            tess.begin_contour().unwrap();
            for p in rect(0.0, 0.0, 1.0, 1.0) {
                tess.vertex(p).unwrap();
            }
            tess.end_contour().unwrap();
            let t = tess.end_polygon().unwrap();
            assert_eq!(t.vertices.len(), 4);
        }
    }
}
