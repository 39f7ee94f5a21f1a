// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vector algebra over 2D and 3D inputs.
//!
//! Every operation promotes its arguments to 3D first: a 2D input is read as
//! `(x, y, 0)`. This makes `cross` of two planar vectors a vector along Z,
//! which is how orientation tests are written throughout the kernel.
//!
//! [`normalize`] does not guard against zero length. A zero vector normalizes
//! to NaN components, so callers must check [`length`] themselves.

use nalgebra::{Point2, Point3, Vector2, Vector3};

/// Conversion into a 3D vector, promoting 2D inputs with `z = 0`.
pub trait IntoVector3 {
    fn into_vector3(self) -> Vector3<f64>;
}

impl IntoVector3 for Vector3<f64> {
    #[inline]
    fn into_vector3(self) -> Vector3<f64> {
        self
    }
}

impl IntoVector3 for Vector2<f64> {
    #[inline]
    fn into_vector3(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, 0.0)
    }
}

impl IntoVector3 for Point3<f64> {
    #[inline]
    fn into_vector3(self) -> Vector3<f64> {
        self.coords
    }
}

impl IntoVector3 for Point2<f64> {
    #[inline]
    fn into_vector3(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, 0.0)
    }
}

impl IntoVector3 for [f64; 3] {
    #[inline]
    fn into_vector3(self) -> Vector3<f64> {
        Vector3::new(self[0], self[1], self[2])
    }
}

impl IntoVector3 for [f64; 2] {
    #[inline]
    fn into_vector3(self) -> Vector3<f64> {
        Vector3::new(self[0], self[1], 0.0)
    }
}

impl<T: IntoVector3 + Copy> IntoVector3 for &T {
    #[inline]
    fn into_vector3(self) -> Vector3<f64> {
        (*self).into_vector3()
    }
}

/// Cross product `a × b`.
#[inline]
pub fn cross(a: impl IntoVector3, b: impl IntoVector3) -> Vector3<f64> {
    a.into_vector3().cross(&b.into_vector3())
}

/// Dot product `a · b`.
#[inline]
pub fn dot(a: impl IntoVector3, b: impl IntoVector3) -> f64 {
    a.into_vector3().dot(&b.into_vector3())
}

/// Euclidean length.
#[inline]
pub fn length(v: impl IntoVector3) -> f64 {
    v.into_vector3().norm()
}

/// Unit vector in the direction of `v`.
///
/// A zero-length input yields NaN components (0 / 0).
#[inline]
pub fn normalize(v: impl IntoVector3) -> Vector3<f64> {
    let v = v.into_vector3();
    let len = v.norm();
    v / len
}

/// Component-wise sum `a + b`.
#[inline]
pub fn add(a: impl IntoVector3, b: impl IntoVector3) -> Vector3<f64> {
    a.into_vector3() + b.into_vector3()
}

/// Component-wise difference `a - b`.
#[inline]
pub fn subtract(a: impl IntoVector3, b: impl IntoVector3) -> Vector3<f64> {
    a.into_vector3() - b.into_vector3()
}
