// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use planscape_topology::{PointKey, PointKind, Sketch};
use serde::Deserialize;

use super::RequestType;
use crate::error::{Error, Result};
use crate::outcome::{CommitOutcome, Refusal, RefusalReason};

/// Moves one point to absolute coordinates.
///
/// Refused when a face through the point would lose a valid shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MovePoint {
    pub point: PointKey,
    pub target: [f64; 2],
    #[serde(skip)]
    prior: Option<[f64; 2]>,
}

impl MovePoint {
    pub fn new(point: PointKey, target: [f64; 2]) -> Self {
        Self {
            point,
            target,
            prior: None,
        }
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.prior.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::MovePoint));
        }
        if !self.target.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidArgument {
                request: RequestType::MovePoint,
                reason: "target coordinates must be finite",
            });
        }
        let faces = sketch.faces_invalidated_by(&[(self.point, self.target)])?;
        if !faces.is_empty() {
            return Ok(CommitOutcome::Refused(Refusal {
                request: RequestType::MovePoint,
                reason: RefusalReason::InvalidFaceShape { faces },
            }));
        }
        self.prior = Some(sketch.set_point_position(self.point, self.target)?);
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let prior = self
            .prior
            .ok_or(Error::NotCommitted(RequestType::MovePoint))?;
        sketch.set_point_position(self.point, prior)?;
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        if self.prior.is_none() {
            return Err(Error::NotCommitted(RequestType::MovePoint));
        }
        sketch.set_point_position(self.point, self.target)?;
        Ok(())
    }
}

/// Reclassifies a point.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetPointKind {
    pub point: PointKey,
    pub kind: PointKind,
    #[serde(skip)]
    prior: Option<PointKind>,
}

impl SetPointKind {
    pub fn new(point: PointKey, kind: PointKind) -> Self {
        Self {
            point,
            kind,
            prior: None,
        }
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.prior.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::SetPointKind));
        }
        self.prior = Some(sketch.set_point_kind(self.point, self.kind)?);
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let prior = self
            .prior
            .ok_or(Error::NotCommitted(RequestType::SetPointKind))?;
        sketch.set_point_kind(self.point, prior)?;
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        if self.prior.is_none() {
            return Err(Error::NotCommitted(RequestType::SetPointKind));
        }
        sketch.set_point_kind(self.point, self.kind)?;
        Ok(())
    }
}
