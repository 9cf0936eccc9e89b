// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of corridors a room may branch into
pub const DEFAULT_MAX_CHILD_CORRIDORS: usize = 3;

/// Limits applied by the edge validity rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum number of corridor children of a single room
    pub max_child_corridors: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_child_corridors: DEFAULT_MAX_CHILD_CORRIDORS,
        }
    }
}

impl GraphConfig {
    /// Create a config with the given corridor fan-out
    pub fn with_max_child_corridors(max_child_corridors: usize) -> Self {
        Self { max_child_corridors }
    }

    /// Load a config from a RON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save the config to a RON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);

        let content = ron::ser::to_string_pretty(self, config).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(path, content)
    }
}
