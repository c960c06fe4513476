//! User settings for conversion defaults.
//!
//! Settings live in `~/.config/gdrom-kit/settings.toml`:
//!
//! ```toml
//! [convert]
//! gdi_file = "disc.gdi"
//! trim_whitespace = false
//! gdemu_names = true
//! ```
//!
//! A missing file or key falls back to its default. A file that cannot be
//! parsed is reported and ignored.

use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::convert::{ConvertOptions, DEFAULT_GDI_FILE};

/// Canonical path to the settings file: `~/.config/gdrom-kit/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("gdrom-kit").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub convert: ConvertSettings,
}

/// The `[convert]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Descriptor written after the tracks. An empty string disables it.
    pub gdi_file: String,
    pub trim_whitespace: bool,
    /// Rename tracks to `trackNN.raw` / `trackNN.bin`
    pub gdemu_names: bool,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            gdi_file: DEFAULT_GDI_FILE.to_string(),
            trim_whitespace: false,
            gdemu_names: false,
        }
    }
}

impl Settings {
    /// Load from [`settings_path`].
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Could not read {}: {e}", path.display());
                return Self::default();
            }
        };
        Self::parse(&contents).unwrap_or_else(|e| {
            warn!("Ignoring malformed {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Write the settings, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(io::Error::other)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)
    }

    /// Conversion options as configured, before any command-line overrides.
    pub fn convert_options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new().with_trim_whitespace(self.convert.trim_whitespace);
        if !self.convert.gdi_file.is_empty() {
            options = options.with_gdi_file(self.convert.gdi_file.clone());
        }
        if self.convert.gdemu_names {
            options = options.with_gdemu_names();
        }
        options
    }
}
