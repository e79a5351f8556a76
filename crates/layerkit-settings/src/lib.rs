//! Layerkit Settings Crate
//!
//! Handles editor configuration: history depth, auto-save debounce,
//! serialization options and the geometry of newly created pages.

pub mod config;
pub mod error;

pub use config::{
    AutoSaveSettings, EditorSettings, HistorySettings, PageDefaults, SerializationSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
