// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commit results.

use planscape_topology::{CurveKey, FaceGroupKey, FaceKey};

use crate::request::RequestType;

/// Result of a commit that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed,
    /// Validation rejected the edit; nothing was changed.
    Refused(Refusal),
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed)
    }
}

/// A structured validation refusal.
#[derive(Debug, Clone, PartialEq)]
pub struct Refusal {
    pub request: RequestType,
    pub reason: RefusalReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefusalReason {
    /// The face shares boundary points with curves outside its own loops.
    SharedBoundary { face: FaceKey, curves: Vec<CurveKey> },
    /// Removing the face would leave the group without members.
    LastGroupMember { group: FaceGroupKey, face: FaceKey },
    /// The moved points would leave these faces degenerate, with a hole
    /// outside the outer loop, or with overlapping holes.
    InvalidFaceShape { faces: Vec<FaceKey> },
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            RefusalReason::SharedBoundary { curves, .. } => write!(
                f,
                "{} refused: face shares points with {} foreign curve(s)",
                self.request,
                curves.len()
            ),
            RefusalReason::LastGroupMember { .. } => {
                write!(f, "{} refused: face is the last group member", self.request)
            }
            RefusalReason::InvalidFaceShape { faces } => write!(
                f,
                "{} refused: {} face(s) would lose a valid shape",
                self.request,
                faces.len()
            ),
        }
    }
}
