// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requests: single edits that can be committed, undone and redone.
//!
//! Each request kind validates its inputs and captures the prior value of
//! every field it changes during `on_commit`. `on_undo` writes the captured
//! values back, and `on_redo` replays the captured new values rather than
//! recomputing them, so keys created by a commit are revived on redo.

mod curve;
mod face;
mod group;
mod point;

use std::str::FromStr;

use planscape_topology::{EntityKey, Sketch};
use serde::de::DeserializeOwned;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::outcome::CommitOutcome;

pub use curve::SplitCurve;
pub use face::{MoveFace, PointMove, SetFaceTags};
pub use group::{
    AddFaceToGroup, CreateFaceGroup, DeleteFaceGroup, RemoveFaceFromGroup, SetConnectMode,
};
pub use point::{MovePoint, SetPointKind};

/// Entity keys a request reports for dirty flags and purging.
pub type EntityKeys = SmallVec<[EntityKey; 4]>;

/// Stable request type strings used by the command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    MovePoint,
    SetPointKind,
    MoveFace,
    SetFaceTags,
    SplitCurve,
    CreateFaceGroup,
    AddFaceToGroup,
    RemoveFaceFromGroup,
    SetConnectMode,
    DeleteFaceGroup,
}

impl RequestType {
    pub const ALL: [RequestType; 10] = [
        RequestType::MovePoint,
        RequestType::SetPointKind,
        RequestType::MoveFace,
        RequestType::SetFaceTags,
        RequestType::SplitCurve,
        RequestType::CreateFaceGroup,
        RequestType::AddFaceToGroup,
        RequestType::RemoveFaceFromGroup,
        RequestType::SetConnectMode,
        RequestType::DeleteFaceGroup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::MovePoint => "MovePoint",
            RequestType::SetPointKind => "SetPointKind",
            RequestType::MoveFace => "MoveFace",
            RequestType::SetFaceTags => "SetFaceTags",
            RequestType::SplitCurve => "SplitCurve",
            RequestType::CreateFaceGroup => "CreateFaceGroup",
            RequestType::AddFaceToGroup => "AddFaceToGroup",
            RequestType::RemoveFaceFromGroup => "RemoveFaceFromGroup",
            RequestType::SetConnectMode => "SetConnectMode",
            RequestType::DeleteFaceGroup => "DeleteFaceGroup",
        }
    }

    pub fn category(self) -> RequestCategory {
        match self {
            RequestType::MovePoint | RequestType::MoveFace => RequestCategory::Geometry,
            RequestType::SplitCurve => RequestCategory::Topology,
            RequestType::SetPointKind | RequestType::SetFaceTags => RequestCategory::Annotation,
            RequestType::CreateFaceGroup
            | RequestType::AddFaceToGroup
            | RequestType::RemoveFaceFromGroup
            | RequestType::SetConnectMode
            | RequestType::DeleteFaceGroup => RequestCategory::Grouping,
        }
    }

    /// Fields a request of this type may write, derived ones included.
    pub fn touched_fields(self) -> &'static [Field] {
        match self {
            RequestType::MovePoint | RequestType::MoveFace => {
                &[Field::PointPosition, Field::GroupBounds]
            }
            RequestType::SetPointKind => &[Field::PointKind],
            RequestType::SetFaceTags => &[Field::FaceTags],
            RequestType::SplitCurve => &[Field::LoopCoEdges, Field::Liveness, Field::GroupBounds],
            RequestType::CreateFaceGroup | RequestType::DeleteFaceGroup => {
                &[Field::Liveness, Field::GroupMembers]
            }
            RequestType::AddFaceToGroup | RequestType::RemoveFaceFromGroup => {
                &[Field::GroupMembers, Field::GroupBounds]
            }
            RequestType::SetConnectMode => &[Field::GroupConnectMode],
        }
    }
}

impl FromStr for RequestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RequestType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownRequestType(s.to_string()))
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping of requests for logging and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestCategory {
    Geometry,
    Topology,
    Grouping,
    Annotation,
}

impl RequestCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestCategory::Geometry => "geometry",
            RequestCategory::Topology => "topology",
            RequestCategory::Grouping => "grouping",
            RequestCategory::Annotation => "annotation",
        }
    }
}

/// A single edit.
#[derive(Debug, Clone)]
pub enum Request {
    MovePoint(MovePoint),
    SetPointKind(SetPointKind),
    MoveFace(MoveFace),
    SetFaceTags(SetFaceTags),
    SplitCurve(SplitCurve),
    CreateFaceGroup(CreateFaceGroup),
    AddFaceToGroup(AddFaceToGroup),
    RemoveFaceFromGroup(RemoveFaceFromGroup),
    SetConnectMode(SetConnectMode),
    DeleteFaceGroup(DeleteFaceGroup),
}

macro_rules! dispatch {
    ($request:expr, $inner:ident => $body:expr) => {
        match $request {
            Request::MovePoint($inner) => $body,
            Request::SetPointKind($inner) => $body,
            Request::MoveFace($inner) => $body,
            Request::SetFaceTags($inner) => $body,
            Request::SplitCurve($inner) => $body,
            Request::CreateFaceGroup($inner) => $body,
            Request::AddFaceToGroup($inner) => $body,
            Request::RemoveFaceFromGroup($inner) => $body,
            Request::SetConnectMode($inner) => $body,
            Request::DeleteFaceGroup($inner) => $body,
        }
    };
}

macro_rules! impl_from {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for Request {
                fn from(request: $kind) -> Self {
                    Request::$kind(request)
                }
            }
        )*
    };
}

impl_from!(
    MovePoint,
    SetPointKind,
    MoveFace,
    SetFaceTags,
    SplitCurve,
    CreateFaceGroup,
    AddFaceToGroup,
    RemoveFaceFromGroup,
    SetConnectMode,
    DeleteFaceGroup
);

fn parse<T: DeserializeOwned>(request: RequestType, payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| Error::InvalidPayload { request, source })
}

impl Request {
    /// Builds a request from a type and its JSON arguments.
    pub fn from_payload(request: RequestType, payload: serde_json::Value) -> Result<Self> {
        Ok(match request {
            RequestType::MovePoint => Request::MovePoint(parse(request, payload)?),
            RequestType::SetPointKind => Request::SetPointKind(parse(request, payload)?),
            RequestType::MoveFace => Request::MoveFace(parse(request, payload)?),
            RequestType::SetFaceTags => Request::SetFaceTags(parse(request, payload)?),
            RequestType::SplitCurve => Request::SplitCurve(parse(request, payload)?),
            RequestType::CreateFaceGroup => Request::CreateFaceGroup(parse(request, payload)?),
            RequestType::AddFaceToGroup => Request::AddFaceToGroup(parse(request, payload)?),
            RequestType::RemoveFaceFromGroup => {
                Request::RemoveFaceFromGroup(parse(request, payload)?)
            }
            RequestType::SetConnectMode => Request::SetConnectMode(parse(request, payload)?),
            RequestType::DeleteFaceGroup => Request::DeleteFaceGroup(parse(request, payload)?),
        })
    }

    pub fn request_type(&self) -> RequestType {
        match self {
            Request::MovePoint(_) => RequestType::MovePoint,
            Request::SetPointKind(_) => RequestType::SetPointKind,
            Request::MoveFace(_) => RequestType::MoveFace,
            Request::SetFaceTags(_) => RequestType::SetFaceTags,
            Request::SplitCurve(_) => RequestType::SplitCurve,
            Request::CreateFaceGroup(_) => RequestType::CreateFaceGroup,
            Request::AddFaceToGroup(_) => RequestType::AddFaceToGroup,
            Request::RemoveFaceFromGroup(_) => RequestType::RemoveFaceFromGroup,
            Request::SetConnectMode(_) => RequestType::SetConnectMode,
            Request::DeleteFaceGroup(_) => RequestType::DeleteFaceGroup,
        }
    }

    pub fn category(&self) -> RequestCategory {
        self.request_type().category()
    }

    /// Validates, captures prior values, then applies the edit.
    ///
    /// A refusal or an error leaves the sketch unchanged.
    pub fn on_commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        dispatch!(self, r => r.commit(sketch))
    }

    pub fn on_undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        dispatch!(self, r => r.undo(sketch))
    }

    pub fn on_redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        dispatch!(self, r => r.redo(sketch))
    }

    /// Whether this request records and restores `field`.
    pub fn can_transact_field(&self, field: Field) -> bool {
        field.is_transactable() && self.touched_fields().contains(&field)
    }

    pub fn touched_fields(&self) -> &'static [Field] {
        self.request_type().touched_fields()
    }

    /// Transactable fields this request changes, for persistence diffs.
    pub fn changed_fields(&self) -> SmallVec<[Field; 4]> {
        self.touched_fields()
            .iter()
            .copied()
            .filter(|&f| self.can_transact_field(f))
            .collect()
    }

    /// Human readable summary for logs and history menus.
    pub fn description(&self) -> String {
        match self {
            Request::MovePoint(r) => format!(
                "Move point to ({}, {})",
                r.target[0], r.target[1]
            ),
            Request::SetPointKind(r) => format!("Set point kind to {:?}", r.kind),
            Request::MoveFace(r) => format!("Move face by ({}, {})", r.offset[0], r.offset[1]),
            Request::SetFaceTags(r) => {
                let tags: Vec<&str> = r.tags.iter().map(String::as_str).collect();
                format!("Set face tags [{}]", tags.join(", "))
            }
            Request::SplitCurve(r) => format!("Split curve at {} position(s)", r.positions.len()),
            Request::CreateFaceGroup(r) => format!("Group {} face(s)", r.faces.len()),
            Request::AddFaceToGroup(_) => "Add face to group".to_string(),
            Request::RemoveFaceFromGroup(_) => "Remove face from group".to_string(),
            Request::SetConnectMode(r) => format!("Set connect mode to {:?}", r.connect_mode),
            Request::DeleteFaceGroup(_) => "Delete face group".to_string(),
        }
    }

    /// Entities whose state a commit, undo or redo of this request changes.
    pub fn affected_entities(&self) -> EntityKeys {
        let mut keys = EntityKeys::new();
        match self {
            Request::MovePoint(r) => keys.push(r.point.into()),
            Request::SetPointKind(r) => keys.push(r.point.into()),
            Request::MoveFace(r) => {
                keys.push(r.face.into());
                keys.extend(r.moved_points().map(EntityKey::from));
            }
            Request::SetFaceTags(r) => keys.push(r.face.into()),
            Request::SplitCurve(r) => {
                keys.push(r.curve.into());
                if let Some(split) = r.split() {
                    keys.extend(split.points.iter().map(|&k| EntityKey::from(k)));
                    keys.extend(split.curves.iter().map(|&k| EntityKey::from(k)));
                    keys.extend(split.loops.iter().map(|l| EntityKey::from(l.lp)));
                }
                keys.extend(r.faces().iter().map(|&k| EntityKey::from(k)));
            }
            Request::CreateFaceGroup(r) => {
                keys.extend(r.created().map(EntityKey::from));
                keys.extend(r.faces.iter().map(|&k| EntityKey::from(k)));
            }
            Request::AddFaceToGroup(r) => {
                keys.push(r.group.into());
                keys.push(r.face.into());
            }
            Request::RemoveFaceFromGroup(r) => {
                keys.push(r.group.into());
                keys.push(r.face.into());
            }
            Request::SetConnectMode(r) => keys.push(r.group.into()),
            Request::DeleteFaceGroup(r) => keys.push(r.group.into()),
        }
        keys
    }

    /// Entities a commit brought into existence, in creation order.
    pub fn created_entities(&self) -> EntityKeys {
        let mut keys = EntityKeys::new();
        match self {
            Request::SplitCurve(r) => {
                if let Some(split) = r.split() {
                    keys.extend(split.points.iter().map(|&k| EntityKey::from(k)));
                    keys.extend(split.curves.iter().map(|&k| EntityKey::from(k)));
                }
            }
            Request::CreateFaceGroup(r) => keys.extend(r.created().map(EntityKey::from)),
            _ => {}
        }
        keys
    }

    /// Entities a commit retired.
    pub fn retired_entities(&self) -> EntityKeys {
        let mut keys = EntityKeys::new();
        match self {
            Request::SplitCurve(r) => {
                if r.split().is_some() {
                    keys.push(r.curve.into());
                }
            }
            Request::DeleteFaceGroup(r) => keys.push(r.group.into()),
            _ => {}
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planscape_topology::{PointKind, Sketch};
    use serde_json::json;

    #[test]
    fn type_strings_round_trip() {
        for ty in RequestType::ALL {
            assert_eq!(ty.as_str().parse::<RequestType>().unwrap(), ty);
        }
        assert!(matches!(
            "Explode".parse::<RequestType>(),
            Err(Error::UnknownRequestType(name)) if name == "Explode"
        ));
    }

    #[test]
    fn payload_is_deserialized() {
        let mut sketch = Sketch::new();
        let p = sketch.add_point([0.0, 0.0], PointKind::Common);
        let payload = json!({ "point": p, "target": [3.0, 4.0] });

        let request = Request::from_payload(RequestType::MovePoint, payload).unwrap();
        assert_eq!(request.request_type(), RequestType::MovePoint);
        assert_eq!(request.description(), "Move point to (3, 4)");
        assert_eq!(request.category(), RequestCategory::Geometry);
    }

    #[test]
    fn bad_payload_names_request() {
        let err = Request::from_payload(RequestType::MovePoint, json!({ "target": [1.0] }))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPayload {
                request: RequestType::MovePoint,
                ..
            }
        ));

        let mut sketch = Sketch::new();
        let p = sketch.add_point([0.0, 0.0], PointKind::Common);
        let extra = json!({ "point": p, "target": [1.0, 1.0], "speed": 2 });
        assert!(Request::from_payload(RequestType::MovePoint, extra).is_err());
    }

    #[test]
    fn derived_fields_never_reported() {
        let mut sketch = Sketch::new();
        let p = sketch.add_point([0.0, 0.0], PointKind::Common);
        let request = Request::from(MovePoint::new(p, [1.0, 1.0]));

        assert!(request.can_transact_field(Field::PointPosition));
        assert!(!request.can_transact_field(Field::GroupBounds));
        assert!(!request.can_transact_field(Field::FaceTags));
        assert_eq!(request.changed_fields().as_slice(), &[Field::PointPosition]);
    }

    #[test]
    fn dispatch_reaches_inner_request() {
        let mut sketch = Sketch::new();
        let p = sketch.add_point([0.0, 0.0], PointKind::Common);
        let mut request = Request::from(SetPointKind::new(p, PointKind::Intersection));

        assert!(request.on_commit(&mut sketch).unwrap().is_committed());
        assert_eq!(sketch.point(p).unwrap().kind, PointKind::Intersection);
        request.on_undo(&mut sketch).unwrap();
        assert_eq!(sketch.point(p).unwrap().kind, PointKind::Common);
        request.on_redo(&mut sketch).unwrap();
        assert_eq!(sketch.point(p).unwrap().kind, PointKind::Intersection);
        assert_eq!(request.affected_entities().as_slice(), &[EntityKey::Point(p)]);
    }
}
