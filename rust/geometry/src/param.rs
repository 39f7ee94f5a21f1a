// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve parameter ranges and range splitting.
//!
//! A curve that has been cut keeps the range `[from, to]` it occupies in the
//! parameter space of the curve it was originally cut from. Splitting that
//! range takes positions in the same global space and yields contiguous
//! sub-ranges. Each [`SplitSegment`] carries its global range and the same
//! interval re-expressed as a fraction of the parent range.

use crate::error::{Error, Result};

/// A closed parameter interval `[from, to]` with `from < to`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamRange {
    pub from: f64,
    pub to: f64,
}

impl ParamRange {
    /// The full range `[0, 1]` of a freshly created curve.
    pub const UNIT: ParamRange = ParamRange { from: 0.0, to: 1.0 };

    /// Creates a range, rejecting empty, inverted and non-finite bounds.
    pub fn new(from: f64, to: f64) -> Result<Self> {
        if !from.is_finite() || !to.is_finite() || from >= to {
            return Err(Error::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Length of the interval.
    #[inline]
    pub fn span(&self) -> f64 {
        self.to - self.from
    }

    /// Returns `true` if `t` lies strictly between `from` and `to`.
    #[inline]
    pub fn contains_interior(&self, t: f64) -> bool {
        t > self.from && t < self.to
    }

    /// Maps a global parameter to its fraction of this range.
    #[inline]
    pub fn fraction(&self, t: f64) -> f64 {
        (t - self.from) / self.span()
    }

    /// Maps a fraction of this range back to a global parameter.
    #[inline]
    pub fn at_fraction(&self, fraction: f64) -> f64 {
        self.from + fraction * self.span()
    }
}

impl Default for ParamRange {
    fn default() -> Self {
        Self::UNIT
    }
}

/// One piece of a split range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSegment {
    /// Bounds in the global parameter space of the parent.
    pub range: ParamRange,
    /// Bounds as fractions of the parent range (the pieces tile `[0, 1]`).
    pub local: ParamRange,
}

/// Splits `parent` at interior `positions`.
///
/// Positions are global parameters and must be strictly increasing and
/// strictly inside `(parent.from, parent.to)`. The result has
/// `positions.len() + 1` segments; consecutive segments share the exact same
/// boundary value, the first starts at `parent.from` and the last ends at
/// `parent.to`.
pub fn split_range(parent: ParamRange, positions: &[f64]) -> Result<Vec<SplitSegment>> {
    let parent = ParamRange::new(parent.from, parent.to)?;

    for (index, &position) in positions.iter().enumerate() {
        if !parent.contains_interior(position) {
            return Err(Error::SplitOutOfRange {
                position,
                from: parent.from,
                to: parent.to,
            });
        }
        if index > 0 && position <= positions[index - 1] {
            return Err(Error::SplitNotIncreasing { index });
        }
    }

    let mut bounds = Vec::with_capacity(positions.len() + 2);
    bounds.push((parent.from, 0.0));
    bounds.extend(positions.iter().map(|&p| (p, parent.fraction(p))));
    bounds.push((parent.to, 1.0));

    Ok(bounds
        .windows(2)
        .map(|pair| SplitSegment {
            range: ParamRange {
                from: pair[0].0,
                to: pair[1].0,
            },
            local: ParamRange {
                from: pair[0].1,
                to: pair[1].1,
            },
        })
        .collect())
}
