// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.

/// Undo depth used when nothing else is configured.
pub const DEFAULT_MAX_UNDO_DEPTH: usize = 100;

/// Environment variable read by [`EngineConfig::from_env`].
pub const MAX_UNDO_DEPTH_VAR: &str = "PLANSCAPE_MAX_UNDO_DEPTH";

/// Transaction engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of undo steps kept; the oldest step is dropped beyond this.
    /// Zero disables history.
    pub max_undo_depth: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables. Missing or unparseable
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            max_undo_depth: std::env::var(MAX_UNDO_DEPTH_VAR)
                .unwrap_or_else(|_| DEFAULT_MAX_UNDO_DEPTH.to_string())
                .trim()
                .parse()
                .unwrap_or(DEFAULT_MAX_UNDO_DEPTH),
        }
    }

    pub fn with_max_undo_depth(mut self, depth: usize) -> Self {
        self.max_undo_depth = depth;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_undo_depth: DEFAULT_MAX_UNDO_DEPTH,
        }
    }
}
