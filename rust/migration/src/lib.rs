// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Planscape Migration
//!
//! Upgrades entity records read from documents written by older releases,
//! before the sketch is rebuilt from them:
//!
//! - hyphen-joined face group ids become `;`-joined, with each component
//!   renamed through the loader's legacy id map
//! - fields absent from old documents get the default of the version that
//!   wrote them
//!
//! Unreadable or newer versions and malformed ids are rejected rather than
//! guessed at.

pub mod context;
pub mod error;
pub mod migrate;
pub mod version;

pub use context::{EntityIdMap, MappedId, MigrationContext};
pub use error::{MigrationError, Result};
pub use migrate::{load_document, migrate, migrate_document, LEGACY_FACE_TAG};
pub use version::{DocumentVersion, ParseVersionError};
