//! State layer configuration via `mapstate.toml`
//!
//! All fields are optional; a missing file section or key falls back to the
//! defaults below. Unknown keys are rejected so typos surface at startup.

use mapstate_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up by the host application
pub const CONFIG_FILE_NAME: &str = "mapstate.toml";

/// Configuration for the stores in a [`crate::StateBundle`]
///
/// # Example
///
/// ```toml
/// zoom_on_show = true
/// initial_search_text = ""
/// search_geometry_capacity = 16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatesConfig {
    /// Request a zoom when an item's geometry is shown
    #[serde(default = "default_zoom_on_show")]
    pub zoom_on_show: bool,
    /// Search text the session starts with
    #[serde(default)]
    pub initial_search_text: String,
    /// Preallocated slots in the search-geometry store
    #[serde(default = "default_search_geometry_capacity")]
    pub search_geometry_capacity: usize,
}

fn default_zoom_on_show() -> bool {
    true
}

fn default_search_geometry_capacity() -> usize {
    16
}

impl Default for StatesConfig {
    fn default() -> Self {
        Self {
            zoom_on_show: default_zoom_on_show(),
            initial_search_text: String::new(),
            search_geometry_capacity: default_search_geometry_capacity(),
        }
    }
}

impl StatesConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# mapstate configuration
#
# Recenter the map when an item's geometry is shown (default: true)
zoom_on_show = true

# Search text the session starts with (default: empty)
initial_search_text = ""

# Preallocated slots for user-drawn search geometries (default: 16)
search_geometry_capacity = 16
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on malformed TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config`
    /// if it cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
