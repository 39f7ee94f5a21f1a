// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use planscape_topology::{CurveKey, CurveSplit, FaceKey, Sketch};
use serde::Deserialize;

use super::RequestType;
use crate::error::{Error, Result};
use crate::outcome::CommitOutcome;

/// Cuts a curve at positions given in its root curve's parameter space.
///
/// Undo and redo replay the recorded split: the same point and curve keys
/// are revived, and every rewired loop gets its recorded co-edges back.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SplitCurve {
    pub curve: CurveKey,
    pub positions: Vec<f64>,
    #[serde(skip)]
    split: Option<CurveSplit>,
    /// Faces bounded by the rewired loops at commit time.
    #[serde(skip)]
    faces: Vec<FaceKey>,
}

impl SplitCurve {
    pub fn new(curve: CurveKey, positions: Vec<f64>) -> Self {
        Self {
            curve,
            positions,
            split: None,
            faces: Vec::new(),
        }
    }

    /// The recorded split, once committed.
    pub fn split(&self) -> Option<&CurveSplit> {
        self.split.as_ref()
    }

    /// Faces whose boundary the split rewired.
    pub fn faces(&self) -> &[FaceKey] {
        &self.faces
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.split.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::SplitCurve));
        }
        if self.positions.is_empty() {
            return Err(Error::InvalidArgument {
                request: RequestType::SplitCurve,
                reason: "at least one split position is required",
            });
        }
        let split = sketch.split_curve(self.curve, &self.positions)?;
        let mut faces: Vec<FaceKey> = split
            .loops
            .iter()
            .flat_map(|rewire| sketch.faces_of_loop(rewire.lp))
            .collect();
        faces.sort();
        faces.dedup();
        self.faces = faces;
        self.split = Some(split);
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let split = self
            .split
            .as_ref()
            .ok_or(Error::NotCommitted(RequestType::SplitCurve))?;

        sketch.revive(split.original.into())?;
        for rewire in split.loops.iter().rev() {
            sketch.set_loop_coedges(rewire.lp, rewire.before.clone())?;
        }
        for &ck in split.curves.iter().rev() {
            sketch.retire(ck.into())?;
        }
        for &pk in split.points.iter().rev() {
            sketch.retire(pk.into())?;
        }
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let split = self
            .split
            .as_ref()
            .ok_or(Error::NotCommitted(RequestType::SplitCurve))?;

        for &pk in &split.points {
            sketch.revive(pk.into())?;
        }
        for &ck in &split.curves {
            sketch.revive(ck.into())?;
        }
        for rewire in &split.loops {
            sketch.set_loop_coedges(rewire.lp, rewire.after.clone())?;
        }
        sketch.retire(split.original.into())?;
        Ok(())
    }
}
