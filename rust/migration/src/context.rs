// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Where a legacy id went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedId {
    pub id: String,
}

/// Legacy id to new id, as supplied by the loader.
pub type EntityIdMap = FxHashMap<String, MappedId>;

/// Everything a record migration needs besides the record itself.
#[derive(Debug, Clone, Default)]
pub struct MigrationContext {
    /// Version string of the document the records were read from.
    pub version: String,
    pub entity_id_map: EntityIdMap,
}

impl MigrationContext {
    pub fn new(version: impl Into<String>, entity_id_map: EntityIdMap) -> Self {
        Self {
            version: version.into(),
            entity_id_map,
        }
    }

    /// Parses an id map written as `{ "legacy": { "id": "new" }, ... }`.
    pub fn id_map_from_json(json: &str) -> serde_json::Result<EntityIdMap> {
        serde_json::from_str(json)
    }

    pub(crate) fn mapped(&self, legacy: &str) -> Option<&str> {
        self.entity_id_map.get(legacy).map(|m| m.id.as_str())
    }
}
