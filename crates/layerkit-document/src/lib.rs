//! # Layerkit Document
//!
//! Document engine of a page/layer graphic-design editor. A document is an
//! ordered list of pages; each page is a tree of layers rooted at a single
//! `ROOT` layer and stored as a flat id map with parent/child links.
//!
//! ## Core Components
//!
//! - **Model**: Layer kinds and their typed props (root, shape, text, image,
//!   video, group, frame)
//! - **Store**: Tree primitives (insert, remove, reparent, props and lock
//!   updates, page operations) that keep every page a valid tree
//! - **History**: Snapshot undo/redo over whole documents
//! - **Serialization**: Flat JSON layout and the key minifier used for
//!   storage payloads
//! - **Session**: The command layer: every edit, selection and lifecycle
//!   action of the editor goes through [`EditorSession`]
//! - **Persistence**: Debounced auto-save to a pluggable persistence API
//!
//! ## Architecture
//!
//! ```text
//! EditorSession (commands, selection, clipboard, editor mode)
//!   ├── HistoryManager<Document> (undo/redo snapshots)
//!   │     └── Document → Page → Layer tree (store primitives)
//!   ├── Query (read-only views)
//!   └── AutoSaver → PersistenceApi
//!
//! serialize/deserialize ⇄ SerializedDocument ⇄ minify/unminify
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layerkit_document::{EditorSession, LayerId, ShapeProps, BoxSize};
//!
//! let mut session = EditorSession::default();
//! let id = session.add_layer(
//!     0,
//!     &LayerId::root(),
//!     ShapeProps::new(BoxSize::new(100.0, 100.0), "M 0 0 L 1 0 L 1 1 Z", "#000").into(),
//! )?;
//! session.undo()?;
//! ```

pub mod autosave;
pub mod document;
pub mod error;
pub mod file;
pub mod history;
pub mod id;
pub mod minify;
pub mod model;
pub mod persistence;
pub mod serialization;
pub mod session;
pub mod store;

pub use autosave::AutoSaver;
pub use document::{Document, Page};
pub use error::{
    DocumentError, DocumentResult, MalformedDocumentError, MalformedReason, MinifyError,
};
pub use file::{DocumentFile, DocumentMetadata, FILE_FORMAT_VERSION};
pub use history::{ActionType, HistoryAction, HistoryManager};
pub use id::{is_generated_id, is_reserved_or_external_id, new_layer_id, LayerId, ROOT_ID};
pub use minify::{minify, minify_document, unminify, unminify_document, MinifiedDocument};
pub use model::{
    Border, BoxSize, FontRef, FrameProps, GroupProps, ImageProps, ImageSource, Layer, LayerKind,
    LayerProps, Point, Privilege, PropsMap, RootProps, ShapeProps, TextProps, VideoProps,
    VideoSource,
};
pub use persistence::{FilePersistence, PersistenceApi};
pub use serialization::{
    deserialize, serialize, LayerType, SerializedDocument, SerializedLayer, SerializedPage,
};
pub use session::{EditorMode, EditorSession, Query, Selection, SidebarTab, UNTITLED};
pub use store::{DetachChildrenMode, RemovedSubtree, Subtree};
