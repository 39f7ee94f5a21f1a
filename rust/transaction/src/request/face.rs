// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;

use planscape_topology::{CurveKey, FaceKey, PointKey, Sketch};
use serde::Deserialize;

use super::RequestType;
use crate::error::{Error, Result};
use crate::outcome::{CommitOutcome, Refusal, RefusalReason};

/// One moved point: key, coordinates before, coordinates after.
pub type PointMove = (PointKey, [f64; 2], [f64; 2]);

/// Translates every point of a face by an offset.
///
/// Refused when the face shares a point with a curve outside its own loops,
/// or when a face using its loops as holes would lose a valid shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoveFace {
    pub face: FaceKey,
    pub offset: [f64; 2],
    #[serde(skip)]
    moved: Option<Vec<PointMove>>,
}

impl MoveFace {
    pub fn new(face: FaceKey, offset: [f64; 2]) -> Self {
        Self {
            face,
            offset,
            moved: None,
        }
    }

    /// Points moved by the last commit.
    pub fn moved_points(&self) -> impl Iterator<Item = PointKey> + '_ {
        self.moved.iter().flatten().map(|(pk, _, _)| *pk)
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.moved.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::MoveFace));
        }
        if !self.offset.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidArgument {
                request: RequestType::MoveFace,
                reason: "offset must be finite",
            });
        }

        let foreign = foreign_curves(sketch, self.face)?;
        if !foreign.is_empty() {
            return Ok(CommitOutcome::Refused(Refusal {
                request: RequestType::MoveFace,
                reason: RefusalReason::SharedBoundary {
                    face: self.face,
                    curves: foreign,
                },
            }));
        }

        let points = sketch.get_all_points_from_faces(&[self.face])?;
        let mut moved = Vec::with_capacity(points.len());
        for pk in points {
            let Some(point) = sketch.point(pk) else {
                continue;
            };
            let before = point.coords();
            let after = [before[0] + self.offset[0], before[1] + self.offset[1]];
            moved.push((pk, before, after));
        }
        let targets: Vec<(PointKey, [f64; 2])> =
            moved.iter().map(|&(pk, _, after)| (pk, after)).collect();
        let faces = sketch.faces_invalidated_by(&targets)?;
        if !faces.is_empty() {
            return Ok(CommitOutcome::Refused(Refusal {
                request: RequestType::MoveFace,
                reason: RefusalReason::InvalidFaceShape { faces },
            }));
        }
        for &(pk, after) in &targets {
            sketch.set_point_position(pk, after)?;
        }

        self.moved = Some(moved);
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let moved = self
            .moved
            .as_ref()
            .ok_or(Error::NotCommitted(RequestType::MoveFace))?;
        for &(pk, before, _) in moved.iter().rev() {
            sketch.set_point_position(pk, before)?;
        }
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let moved = self
            .moved
            .as_ref()
            .ok_or(Error::NotCommitted(RequestType::MoveFace))?;
        for &(pk, _, after) in moved {
            sketch.set_point_position(pk, after)?;
        }
        Ok(())
    }
}

/// Live curves touching the face's points that are not part of its loops.
fn foreign_curves(sketch: &Sketch, face: FaceKey) -> Result<Vec<CurveKey>> {
    let own = sketch.face_curves(face)?;
    let points = sketch.get_all_points_from_faces(&[face])?;
    let mut foreign: Vec<CurveKey> = sketch
        .get_all_edges_by_points(&points)
        .into_iter()
        .flatten()
        .filter(|ck| !own.contains(ck))
        .collect();
    foreign.sort();
    foreign.dedup();
    Ok(foreign)
}

/// Replaces the topology tag set of a face.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetFaceTags {
    pub face: FaceKey,
    pub tags: BTreeSet<String>,
    #[serde(skip)]
    prior: Option<BTreeSet<String>>,
}

impl SetFaceTags {
    pub fn new(face: FaceKey, tags: BTreeSet<String>) -> Self {
        Self {
            face,
            tags,
            prior: None,
        }
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.prior.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::SetFaceTags));
        }
        if self.tags.iter().any(|t| t.is_empty()) {
            return Err(Error::InvalidArgument {
                request: RequestType::SetFaceTags,
                reason: "tags may not be empty strings",
            });
        }
        self.prior = Some(sketch.set_face_tags(self.face, self.tags.clone())?);
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let prior = self
            .prior
            .clone()
            .ok_or(Error::NotCommitted(RequestType::SetFaceTags))?;
        sketch.set_face_tags(self.face, prior)?;
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        if self.prior.is_none() {
            return Err(Error::NotCommitted(RequestType::SetFaceTags));
        }
        sketch.set_face_tags(self.face, self.tags.clone())?;
        Ok(())
    }
}
