// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Undo/redo history over committed transactions.

use std::collections::VecDeque;

use planscape_topology::{EntityKey, Sketch};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::outcome::CommitOutcome;
use crate::request::{EntityKeys, Request, RequestType};
use crate::session::TransactionSession;

/// One undo step: requests in the order they were applied.
#[derive(Debug, Clone)]
pub struct Transaction {
    requests: Vec<Request>,
}

impl Transaction {
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn description(&self) -> String {
        match self.requests.as_slice() {
            [single] => single.description(),
            many => many
                .iter()
                .map(Request::description)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Reverts the requests newest first. If one fails, the requests already
    /// reverted are replayed so the sketch is back where it started.
    fn undo(&mut self, sketch: &mut Sketch) -> Result<()> {
        for i in (0..self.requests.len()).rev() {
            if let Err(err) = self.requests[i].on_undo(sketch) {
                for request in &mut self.requests[i + 1..] {
                    if let Err(restore) = request.on_redo(sketch) {
                        warn!(
                            request = %request.request_type(),
                            error = %restore,
                            "undo restore step failed"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Replays the requests in order. If one fails, the requests already
    /// replayed are reverted again.
    fn redo(&mut self, sketch: &mut Sketch) -> Result<()> {
        for i in 0..self.requests.len() {
            if let Err(err) = self.requests[i].on_redo(sketch) {
                for request in self.requests[..i].iter_mut().rev() {
                    if let Err(restore) = request.on_undo(sketch) {
                        warn!(
                            request = %request.request_type(),
                            error = %restore,
                            "redo restore step failed"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn mark_dirty(&self, sketch: &mut Sketch) {
        for request in &self.requests {
            for key in request.affected_entities() {
                if sketch.contains(key) {
                    sketch.mark_dirty(key);
                }
            }
        }
    }
}

/// Commits requests against a sketch and keeps bounded undo/redo stacks.
#[derive(Debug)]
pub struct TransactionManager {
    config: EngineConfig,
    undo: VecDeque<Transaction>,
    redo: Vec<Transaction>,
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TransactionManager {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds a request from its type string and JSON arguments.
    pub fn create_request(&self, request_type: &str, args: serde_json::Value) -> Result<Request> {
        let ty: RequestType = request_type.parse()?;
        Request::from_payload(ty, args)
    }

    /// Commits a single request as its own undo step.
    pub fn commit(&mut self, sketch: &mut Sketch, request: impl Into<Request>) -> Result<CommitOutcome> {
        let mut session = TransactionSession::new();
        session.push(request);
        self.commit_session(sketch, session)
    }

    pub fn start_session(&self) -> TransactionSession {
        TransactionSession::new()
    }

    /// Applies queued requests in order and records them as one undo step.
    ///
    /// If a request is refused or fails, the requests already applied are
    /// undone in reverse order and the entities they created are purged, so
    /// the sketch is left as it was before the call.
    pub fn commit_session(
        &mut self,
        sketch: &mut Sketch,
        session: TransactionSession,
    ) -> Result<CommitOutcome> {
        let mut applied: Vec<Request> = Vec::with_capacity(session.len());

        for mut request in session.requests {
            match request.on_commit(sketch) {
                Ok(CommitOutcome::Committed) => applied.push(request),
                Ok(CommitOutcome::Refused(refusal)) => {
                    warn!(
                        request = %refusal.request,
                        applied = applied.len(),
                        "{refusal}"
                    );
                    roll_back(sketch, applied);
                    return Ok(CommitOutcome::Refused(refusal));
                }
                Err(err) => {
                    warn!(
                        request = %request.request_type(),
                        applied = applied.len(),
                        error = %err,
                        "commit failed, rolling back"
                    );
                    roll_back(sketch, applied);
                    return Err(err);
                }
            }
        }

        if applied.is_empty() {
            return Ok(CommitOutcome::Committed);
        }

        let transaction = Transaction { requests: applied };
        debug!(
            requests = transaction.requests.len(),
            description = %transaction.description(),
            "transaction committed"
        );
        transaction.mark_dirty(sketch);
        self.record(sketch, transaction);
        Ok(CommitOutcome::Committed)
    }

    /// Reverts the most recent transaction. Returns `false` when there is
    /// nothing to undo.
    ///
    /// On error the sketch is restored and the transaction stays on the
    /// undo stack.
    pub fn undo(&mut self, sketch: &mut Sketch) -> Result<bool> {
        let Some(mut transaction) = self.undo.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = transaction.undo(sketch) {
            warn!(description = %transaction.description(), error = %err, "undo failed");
            self.undo.push_back(transaction);
            return Err(err);
        }
        transaction.mark_dirty(sketch);
        debug!(description = %transaction.description(), "transaction undone");
        self.redo.push(transaction);
        Ok(true)
    }

    /// Replays the most recently undone transaction. Returns `false` when
    /// there is nothing to redo.
    ///
    /// On error the sketch is restored and the transaction stays on the
    /// redo stack.
    pub fn redo(&mut self, sketch: &mut Sketch) -> Result<bool> {
        let Some(mut transaction) = self.redo.pop() else {
            return Ok(false);
        };
        if let Err(err) = transaction.redo(sketch) {
            warn!(description = %transaction.description(), error = %err, "redo failed");
            self.redo.push(transaction);
            return Err(err);
        }
        transaction.mark_dirty(sketch);
        debug!(description = %transaction.description(), "transaction redone");
        self.undo.push_back(transaction);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo.back().map(Transaction::description)
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo.last().map(Transaction::description)
    }

    /// Drops both stacks, purging what can never be revived again.
    pub fn clear(&mut self, sketch: &mut Sketch) {
        self.clear_redo(sketch);
        while let Some(dropped) = self.undo.pop_front() {
            release(sketch, &dropped);
        }
    }

    fn record(&mut self, sketch: &mut Sketch, transaction: Transaction) {
        self.clear_redo(sketch);
        self.undo.push_back(transaction);
        while self.undo.len() > self.config.max_undo_depth {
            let Some(dropped) = self.undo.pop_front() else {
                break;
            };
            release(sketch, &dropped);
        }
    }

    /// Drops undone transactions. The entities they created are retired and
    /// unreachable from here on, so they are purged, newest first.
    fn clear_redo(&mut self, sketch: &mut Sketch) {
        if self.redo.is_empty() {
            return;
        }
        debug!(discarded = self.redo.len(), "redo history cleared");
        for transaction in self.redo.drain(..) {
            for request in transaction.requests.iter().rev() {
                purge_all(sketch, request.created_entities().into_iter().rev());
            }
        }
    }
}

/// Undoes already-applied requests of a failed session.
fn roll_back(sketch: &mut Sketch, mut applied: Vec<Request>) {
    for request in applied.iter_mut().rev() {
        if let Err(err) = request.on_undo(sketch) {
            warn!(request = %request.request_type(), error = %err, "rollback step failed");
        }
    }
    for request in applied.iter().rev() {
        purge_all(sketch, request.created_entities().into_iter().rev());
    }
}

/// Purges what a transaction dropped off the bottom of the undo stack had
/// retired: nothing can undo it anymore.
fn release(sketch: &mut Sketch, transaction: &Transaction) {
    for request in transaction.requests.iter().rev() {
        let retired: EntityKeys = request
            .retired_entities()
            .into_iter()
            .filter(|&key| sketch.is_retired(key))
            .collect();
        purge_all(sketch, retired.into_iter());
    }
}

fn purge_all(sketch: &mut Sketch, keys: impl Iterator<Item = EntityKey>) {
    for key in keys {
        if let Err(err) = sketch.purge(key) {
            warn!(entity = ?key, error = %err, "purge skipped");
        }
    }
}
