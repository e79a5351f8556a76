//! Configuration and settings management for Layerkit
//!
//! Provides configuration file handling, validation and merging.
//! Supports JSON and TOML file formats; the default location is the
//! platform-specific configuration directory.
//!
//! Configuration is organized into logical sections:
//! - History settings (undo depth)
//! - Auto-save settings (debounce)
//! - Serialization settings (minification, pretty printing)
//! - Defaults for newly created pages

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shortest accepted auto-save quiet period.
pub const MIN_DEBOUNCE_MS: u64 = 100;
/// Longest accepted auto-save quiet period.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Undo/redo history settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undoable checkpoints. `None` keeps every checkpoint;
    /// with `Some(n)` the oldest entries are dropped silently once `n` is reached.
    pub max_depth: Option<usize>,
}

/// Auto-save settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveSettings {
    /// Whether changes are pushed to the persistence API automatically
    pub enabled: bool,
    /// Quiet period after the last change before a save fires
    pub debounce_ms: u64,
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 1500,
        }
    }
}

/// Serialization settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationSettings {
    /// Minify payloads sent to the persistence API
    pub minify: bool,
    /// Pretty-print exported document files
    pub pretty: bool,
}

impl Default for SerializationSettings {
    fn default() -> Self {
        Self {
            minify: true,
            pretty: false,
        }
    }
}

/// Geometry and background of newly created pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDefaults {
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            width: 1640.0,
            height: 924.0,
            background: "rgb(255, 255, 255)".to_string(),
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub history: HistorySettings,
    pub autosave: AutoSaveSettings,
    pub serialization: SerializationSettings,
    pub page: PageDefaults,
}

impl EditorSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings file location (`<config dir>/layerkit/settings.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("layerkit").join("settings.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load settings from the default location, falling back to defaults
    /// when no settings file exists yet.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let settings: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        tracing::info!("Loaded editor settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.history.max_depth == Some(0) {
            return Err(invalid("history.max_depth", "must be > 0 when set"));
        }

        if !(MIN_DEBOUNCE_MS..=MAX_DEBOUNCE_MS).contains(&self.autosave.debounce_ms) {
            return Err(ConfigError::ValueOutOfRange {
                key: "autosave.debounce_ms".to_string(),
                value: self.autosave.debounce_ms.to_string(),
            }
            .into());
        }

        if !(self.page.width.is_finite() && self.page.width > 0.0) {
            return Err(invalid("page.width", "must be > 0"));
        }

        if !(self.page.height.is_finite() && self.page.height > 0.0) {
            return Err(invalid("page.height", "must be > 0"));
        }

        if self.page.background.trim().is_empty() {
            return Err(invalid("page.background", "must not be empty"));
        }

        Ok(())
    }

    /// Merge another settings value into this one; sections of `other`
    /// still at their defaults leave the corresponding section untouched.
    pub fn merge(&mut self, other: &EditorSettings) {
        if other.history != HistorySettings::default() {
            self.history = other.history.clone();
        }
        if other.autosave != AutoSaveSettings::default() {
            self.autosave = other.autosave.clone();
        }
        if other.serialization != SerializationSettings::default() {
            self.serialization = other.serialization.clone();
        }
        if other.page != PageDefaults::default() {
            self.page = other.page.clone();
        }
    }
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
