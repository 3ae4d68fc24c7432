//! Configuration loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fs::adapter::StdFs;
use crate::fs::walker::WalkOptions;

/// Top-level configuration.
///
/// All fields have defaults so fsview works without a config file.
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub walk: WalkConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Walk limits for search and folder sizes.
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            max_depth: self.walk.max_depth,
        }
    }

    /// Local filesystem backend configured by `[walk]`.
    pub fn filesystem(&self) -> StdFs {
        StdFs::new(self.walk.follow_symlinks)
    }
}

/// Recursive traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Deepest level searched or summed below the root. Unlimited when unset.
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_symlinks: true,
        }
    }
}

fn default_true() -> bool {
    true
}
