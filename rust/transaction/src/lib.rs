// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Planscape Transaction
//!
//! Commit, undo and redo of sketch edits.
//!
//! ```rust,ignore
//! use planscape_transaction::{EngineConfig, TransactionManager};
//!
//! let mut manager = TransactionManager::new(EngineConfig::from_env());
//! let request = manager.create_request("MovePoint", args)?;
//! manager.commit(&mut sketch, request)?;
//! manager.undo(&mut sketch)?;
//! ```
//!
//! Several requests can be grouped into one undo step with a
//! [`TransactionSession`]; a refused or failing request rolls back the ones
//! applied before it.

pub mod config;
pub mod error;
pub mod field;
pub mod manager;
pub mod outcome;
pub mod request;
pub mod session;

pub use config::{EngineConfig, DEFAULT_MAX_UNDO_DEPTH};
pub use error::{Error, Result};
pub use field::Field;
pub use manager::{Transaction, TransactionManager};
pub use outcome::{CommitOutcome, Refusal, RefusalReason};
pub use request::{Request, RequestCategory, RequestType};
pub use session::TransactionSession;
