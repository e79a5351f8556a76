//! # Layerkit
//!
//! Document engine for a page/layer graphic-design editor.
//!
//! ## Architecture
//!
//! Layerkit is organized as a workspace with multiple crates:
//!
//! 1. **layerkit-core** - Shared error types and the editor event bus
//! 2. **layerkit-settings** - Editor configuration (history depth, auto-save,
//!    serialization, page defaults)
//! 3. **layerkit-document** - Layer tree store, editor session, undo/redo,
//!    serialization and minification, auto-save
//! 4. **layerkit** - This crate: re-exports and the `layerkit` command-line tool
//!
//! ## Features
//!
//! - **Layer Trees**: Pages of root, shape, text, image, video, group and frame
//!   layers with validated parent/child links
//! - **Command Layer**: Every edit is one undoable checkpoint; failed edits leave
//!   the document untouched
//! - **Compact Storage**: Flat JSON layout with key minification
//! - **Auto-Save**: Debounced saves to a pluggable persistence API

pub use layerkit_core as core;
pub use layerkit_document as document;
pub use layerkit_settings as settings;

pub use layerkit_core::{EditorEvent, Error, EventBus, Result};
pub use layerkit_document::{
    DetachChildrenMode, Document, DocumentError, DocumentFile, DocumentResult, EditorSession,
    Layer, LayerId, LayerKind, LayerProps, Page, Privilege,
};
pub use layerkit_settings::EditorSettings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging to stderr with `RUST_LOG` support, so that
/// command output on stdout stays machine readable.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
