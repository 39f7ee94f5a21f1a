// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity fields a request can touch.
//!
//! Transactable fields carry document state and are restored exactly by
//! undo. Derived fields (the face group bound cache, dirty flags) are
//! recomputed or re-flagged instead and never appear in change reports.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Field {
    PointPosition,
    PointKind,
    FaceTags,
    LoopCoEdges,
    /// Whether an entity is live or retired.
    Liveness,
    GroupMembers,
    GroupConnectMode,
    GroupBounds,
    Dirty,
}

impl Field {
    pub fn is_transactable(self) -> bool {
        match self {
            Field::PointPosition
            | Field::PointKind
            | Field::FaceTags
            | Field::LoopCoEdges
            | Field::Liveness
            | Field::GroupMembers
            | Field::GroupConnectMode => true,
            Field::GroupBounds | Field::Dirty => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::PointPosition => "point.position",
            Field::PointKind => "point.kind",
            Field::FaceTags => "face.tags",
            Field::LoopCoEdges => "loop.coedges",
            Field::Liveness => "entity.liveness",
            Field::GroupMembers => "faceGroup.members",
            Field::GroupConnectMode => "faceGroup.connectMode",
            Field::GroupBounds => "faceGroup.boundMap",
            Field::Dirty => "entity.dirty",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
