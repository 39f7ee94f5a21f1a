// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planscape Geometry Kernel
//!
//! Pure, stateless geometry used by the topology model: vector algebra with
//! 2D → 3D promotion, curve parameter-range splitting, curve evaluation,
//! polygon predicates, and a begin/contour/vertex/end tessellator built on
//! earcutr.

pub mod curve;
pub mod error;
pub mod param;
pub mod polygon;
pub mod tessellator;
pub mod triangulation;
pub mod vector;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use curve::CurveGeometry;
pub use error::{Error, Result};
pub use param::{split_range, ParamRange, SplitSegment};
pub use tessellator::{tessellate, Tessellation, Tessellator};
pub use triangulation::{triangulate_polygon, triangulate_polygon_with_holes};
pub use vector::{add, cross, dot, length, normalize, subtract, IntoVector3};
