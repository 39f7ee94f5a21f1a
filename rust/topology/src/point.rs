// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point values and their coordinate-derived identity keys.
//!
//! Two points are "the same point" for closure checks and deduplication when
//! their identity keys match, regardless of which arena slot they live in.
//! The key quantizes each coordinate to a 1e-5 grid, rounding up.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Coordinates are multiplied by this factor before quantizing.
pub const PRECISION_FACTOR: f64 = 1e5;

/// Classification tag carried by every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointKind {
    #[default]
    Common,
    Corner,
    Intersection,
    Control,
}

/// A 2D point with its classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub kind: PointKind,
}

impl Point {
    /// Creates a point value from `[x, y]`.
    pub fn create(coords: [f64; 2], kind: PointKind) -> Self {
        Self {
            x: coords[0],
            y: coords[1],
            kind,
        }
    }

    #[inline]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    #[inline]
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Identity key of this point, see [`identity_key`].
    pub fn identity_key(&self) -> String {
        identity_key(self.x, self.y)
    }
}

#[inline]
fn quantize(v: f64) -> i64 {
    (v * PRECISION_FACTOR).ceil() as i64
}

/// Formats the identity key `"{xCode}-{yCode}"` of a coordinate pair.
pub fn identity_key(x: f64, y: f64) -> String {
    format!("{}-{}", quantize(x), quantize(y))
}

/// Returns `true` if both coordinate pairs quantize into the same bucket.
#[inline]
pub fn same_identity(a: [f64; 2], b: [f64; 2]) -> bool {
    quantize(a[0]) == quantize(b[0]) && quantize(a[1]) == quantize(b[1])
}
