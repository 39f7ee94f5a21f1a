// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Evaluation of planar curve pieces between two end points.

use std::f64::consts::TAU;

use nalgebra::Point2;

/// Shape of a curve between its start and end point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveGeometry {
    /// Straight segment.
    #[default]
    Line,
    /// Circular arc around `center`, swept counter-clockwise when `ccw`.
    Arc { center: [f64; 2], ccw: bool },
}

impl CurveGeometry {
    /// Evaluates the curve at fraction `t ∈ [0, 1]` between `start` and `end`.
    ///
    /// For arcs the angle is interpolated along the sweep direction and the
    /// radius linearly between the two end radii, so an arc whose end points
    /// were moved independently still evaluates continuously.
    pub fn point_at(&self, start: Point2<f64>, end: Point2<f64>, t: f64) -> Point2<f64> {
        match *self {
            CurveGeometry::Line => start + (end - start) * t,
            CurveGeometry::Arc { center, ccw } => {
                let c = Point2::new(center[0], center[1]);
                let (a0, r0) = polar(c, start);
                let (a1, r1) = polar(c, end);
                let sweep = sweep_angle(a0, a1, ccw);
                let angle = a0 + sweep * t;
                let radius = r0 + (r1 - r0) * t;
                Point2::new(c.x + radius * angle.cos(), c.y + radius * angle.sin())
            }
        }
    }

    /// Approximate length of the piece between `start` and `end`.
    pub fn length(&self, start: Point2<f64>, end: Point2<f64>) -> f64 {
        match *self {
            CurveGeometry::Line => (end - start).norm(),
            CurveGeometry::Arc { center, ccw } => {
                let c = Point2::new(center[0], center[1]);
                let (a0, r0) = polar(c, start);
                let (a1, r1) = polar(c, end);
                sweep_angle(a0, a1, ccw).abs() * (r0 + r1) * 0.5
            }
        }
    }

    /// Returns the same piece traversed from `end` to `start`.
    pub fn reversed(&self) -> Self {
        match *self {
            CurveGeometry::Line => CurveGeometry::Line,
            CurveGeometry::Arc { center, ccw } => CurveGeometry::Arc { center, ccw: !ccw },
        }
    }

    /// Samples `segments + 1` points along the piece, end points included.
    pub fn sample(&self, start: Point2<f64>, end: Point2<f64>, segments: usize) -> Vec<Point2<f64>> {
        let segments = match self {
            CurveGeometry::Line => 1,
            CurveGeometry::Arc { .. } => segments.max(1),
        };
        (0..=segments)
            .map(|i| {
                if i == segments {
                    end
                } else {
                    self.point_at(start, end, i as f64 / segments as f64)
                }
            })
            .collect()
    }
}

#[inline]
fn polar(center: Point2<f64>, p: Point2<f64>) -> (f64, f64) {
    let d = p - center;
    (d.y.atan2(d.x), d.norm())
}

/// Signed sweep from `a0` to `a1` in the requested direction, in `(-τ, τ]`.
/// Coincident angles sweep a full turn.
fn sweep_angle(a0: f64, a1: f64, ccw: bool) -> f64 {
    let mut sweep = (a1 - a0).rem_euclid(TAU);
    if sweep == 0.0 {
        sweep = TAU;
    }
    if ccw {
        sweep
    } else {
        sweep - TAU
    }
}
