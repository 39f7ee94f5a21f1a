// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use planscape_topology::{ConnectMode, FaceGroupData, FaceGroupKey, FaceKey, Sketch};
use serde::Deserialize;

use super::RequestType;
use crate::error::{Error, Result};
use crate::outcome::{CommitOutcome, Refusal, RefusalReason};

/// Group state captured around a membership edit. Restoring a snapshot
/// brings back the bound cache exactly as it was.
#[derive(Debug, Clone)]
struct Snapshots {
    before: FaceGroupData,
    after: FaceGroupData,
}

fn live_group(sketch: &Sketch, group: FaceGroupKey) -> Result<FaceGroupData> {
    sketch
        .face_group(group)
        .cloned()
        .ok_or_else(|| planscape_topology::Error::FaceGroupNotFound(group).into())
}

/// Groups faces under one aggregate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFaceGroup {
    pub faces: Vec<FaceKey>,
    pub connect_mode: ConnectMode,
    #[serde(skip)]
    created: Option<FaceGroupKey>,
}

impl CreateFaceGroup {
    pub fn new(faces: Vec<FaceKey>, connect_mode: ConnectMode) -> Self {
        Self {
            faces,
            connect_mode,
            created: None,
        }
    }

    /// Key of the group made by the last commit.
    pub fn created(&self) -> Option<FaceGroupKey> {
        self.created
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.created.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::CreateFaceGroup));
        }
        self.created = Some(sketch.add_face_group(&self.faces, self.connect_mode)?);
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let group = self
            .created
            .ok_or(Error::NotCommitted(RequestType::CreateFaceGroup))?;
        sketch.retire(group.into())?;
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let group = self
            .created
            .ok_or(Error::NotCommitted(RequestType::CreateFaceGroup))?;
        sketch.revive(group.into())?;
        Ok(())
    }
}

/// Adds an ungrouped face to a group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddFaceToGroup {
    pub group: FaceGroupKey,
    pub face: FaceKey,
    #[serde(skip)]
    snapshots: Option<Snapshots>,
}

impl AddFaceToGroup {
    pub fn new(group: FaceGroupKey, face: FaceKey) -> Self {
        Self {
            group,
            face,
            snapshots: None,
        }
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.snapshots.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::AddFaceToGroup));
        }
        let before = live_group(sketch, self.group)?;
        sketch.insert_group_member(self.group, self.face)?;
        let after = live_group(sketch, self.group)?;
        self.snapshots = Some(Snapshots { before, after });
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        restore(sketch, self.group, &self.snapshots, RequestType::AddFaceToGroup, |s| {
            &s.before
        })
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        restore(sketch, self.group, &self.snapshots, RequestType::AddFaceToGroup, |s| {
            &s.after
        })
    }
}

/// Takes a face out of its group. The last member cannot be removed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemoveFaceFromGroup {
    pub group: FaceGroupKey,
    pub face: FaceKey,
    #[serde(skip)]
    snapshots: Option<Snapshots>,
}

impl RemoveFaceFromGroup {
    pub fn new(group: FaceGroupKey, face: FaceKey) -> Self {
        Self {
            group,
            face,
            snapshots: None,
        }
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.snapshots.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::RemoveFaceFromGroup));
        }
        let before = live_group(sketch, self.group)?;
        if before.members == [self.face] {
            return Ok(CommitOutcome::Refused(Refusal {
                request: RequestType::RemoveFaceFromGroup,
                reason: RefusalReason::LastGroupMember {
                    group: self.group,
                    face: self.face,
                },
            }));
        }
        sketch.remove_group_member(self.group, self.face)?;
        let after = live_group(sketch, self.group)?;
        self.snapshots = Some(Snapshots { before, after });
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        restore(
            sketch,
            self.group,
            &self.snapshots,
            RequestType::RemoveFaceFromGroup,
            |s| &s.before,
        )
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        restore(
            sketch,
            self.group,
            &self.snapshots,
            RequestType::RemoveFaceFromGroup,
            |s| &s.after,
        )
    }
}

fn restore(
    sketch: &mut Sketch,
    group: FaceGroupKey,
    snapshots: &Option<Snapshots>,
    request: RequestType,
    pick: impl Fn(&Snapshots) -> &FaceGroupData,
) -> Result<()> {
    let snapshots = snapshots.as_ref().ok_or(Error::NotCommitted(request))?;
    sketch.replace_face_group(group, pick(snapshots).clone())?;
    Ok(())
}

/// Changes how a group's members connect.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetConnectMode {
    pub group: FaceGroupKey,
    pub connect_mode: ConnectMode,
    #[serde(skip)]
    prior: Option<ConnectMode>,
}

impl SetConnectMode {
    pub fn new(group: FaceGroupKey, connect_mode: ConnectMode) -> Self {
        Self {
            group,
            connect_mode,
            prior: None,
        }
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.prior.is_some() {
            return Err(Error::AlreadyCommitted(RequestType::SetConnectMode));
        }
        self.prior = Some(sketch.set_connect_mode(self.group, self.connect_mode)?);
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        let prior = self
            .prior
            .ok_or(Error::NotCommitted(RequestType::SetConnectMode))?;
        sketch.set_connect_mode(self.group, prior)?;
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        if self.prior.is_none() {
            return Err(Error::NotCommitted(RequestType::SetConnectMode));
        }
        sketch.set_connect_mode(self.group, self.connect_mode)?;
        Ok(())
    }
}

/// Dissolves a group. Its faces are left untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteFaceGroup {
    pub group: FaceGroupKey,
    #[serde(skip)]
    committed: bool,
}

impl DeleteFaceGroup {
    pub fn new(group: FaceGroupKey) -> Self {
        Self {
            group,
            committed: false,
        }
    }

    pub(super) fn commit(&mut self, sketch: &mut Sketch) -> Result<CommitOutcome> {
        if self.committed {
            return Err(Error::AlreadyCommitted(RequestType::DeleteFaceGroup));
        }
        live_group(sketch, self.group)?;
        sketch.retire(self.group.into())?;
        self.committed = true;
        Ok(CommitOutcome::Committed)
    }

    pub(super) fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        if !self.committed {
            return Err(Error::NotCommitted(RequestType::DeleteFaceGroup));
        }
        sketch.revive(self.group.into())?;
        Ok(())
    }

    pub(super) fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        if !self.committed {
            return Err(Error::NotCommitted(RequestType::DeleteFaceGroup));
        }
        sketch.retire(self.group.into())?;
        Ok(())
    }
}
