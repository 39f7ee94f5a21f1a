// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the geometry kernel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid parameter range [{from}, {to}]")]
    InvalidRange { from: f64, to: f64 },

    #[error("Split position {position} lies outside the open range ({from}, {to})")]
    SplitOutOfRange { position: f64, from: f64, to: f64 },

    #[error("Split positions must be strictly increasing (index {index})")]
    SplitNotIncreasing { index: usize },

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Degenerate contour {index}: {reason}")]
    DegenerateContour { index: usize, reason: &'static str },

    #[error("Hole contour {index} is not contained in any outer contour")]
    OrphanHole { index: usize },

    #[error("Tessellator protocol violation: {0}")]
    Protocol(&'static str),
}
