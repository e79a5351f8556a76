//! Error types for the document engine.
//!
//! Store, serializer and command-layer failures are returned as
//! `DocumentError`; none of them is fatal to an editor session.

use thiserror::Error;

use crate::id::LayerId;

/// Errors returned by the layer tree store, the command layer and the
/// serialization pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// The layer does not exist on the page.
    #[error("Layer {layer} not found on page {page}")]
    NotFound { page: usize, layer: LayerId },

    /// The page index is out of range.
    #[error("Page {0} not found")]
    PageNotFound(usize),

    /// The requested parent does not exist on the page.
    #[error("Invalid parent {parent} on page {page}")]
    InvalidParent { page: usize, parent: LayerId },

    /// A layer with this identifier already exists on the page.
    #[error("Duplicate layer id {layer} on page {page}")]
    DuplicateId { page: usize, layer: LayerId },

    /// The move would make a layer its own ancestor.
    #[error("Moving {layer} under {parent} would create a cycle")]
    WouldCreateCycle { layer: LayerId, parent: LayerId },

    /// Structural operations on the root layer are not allowed.
    #[error("Operation not allowed on the root layer of page {page}")]
    IsRoot { page: usize },

    /// The layer is locked against edits by this caller.
    #[error("Layer {layer} on page {page} is locked")]
    Locked { page: usize, layer: LayerId },

    /// The page is locked against edits.
    #[error("Page {0} is locked")]
    PageLocked(usize),

    /// The only page of a document cannot be removed.
    #[error("Cannot remove the last page of a document")]
    LastPage,

    /// A props patch does not fit the layer kind.
    #[error("Invalid props for {layer}: {reason}")]
    InvalidProps { layer: LayerId, reason: String },

    /// The action requires a layer of a different kind.
    #[error("Layer {layer} is a {found}, expected {expected}")]
    KindMismatch {
        layer: LayerId,
        expected: String,
        found: String,
    },

    /// Deserialized input violates the tree invariants.
    #[error(transparent)]
    Malformed(#[from] MalformedDocumentError),

    /// The minify/unminify transform was applied to the wrong input.
    #[error(transparent)]
    Minify(#[from] MinifyError),

    /// The undo stack is empty.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Export or auto-save transport failed.
    #[error("Save failed: {0}")]
    SaveFailed(String),

    /// Fetching a stored document failed.
    #[error("Load failed: {0}")]
    LoadFailed(String),

    /// The session was closed; no further commands are accepted.
    #[error("Editor session is closed")]
    SessionClosed,

    /// The command was prepared against a document that has since been replaced.
    #[error("Stale session: expected generation {expected}, current is {actual}")]
    StaleSession { expected: u64, actual: u64 },
}

/// A document that failed invariant checks, naming the first violation found.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed document{}: {reason}", .page.map(|p| format!(" (page {})", p)).unwrap_or_default())]
pub struct MalformedDocumentError {
    /// Page the violation was found on, if it is page-specific.
    pub page: Option<usize>,
    /// What is wrong.
    pub reason: MalformedReason,
}

impl MalformedDocumentError {
    pub fn on_page(page: usize, reason: MalformedReason) -> Self {
        Self {
            page: Some(page),
            reason,
        }
    }

    pub fn document(reason: MalformedReason) -> Self {
        Self { page: None, reason }
    }
}

/// Invariant violations detected while validating a page tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedReason {
    #[error("missing root layer")]
    MissingRoot,

    #[error("layer {0} has no parent but is not the root")]
    MultipleRoots(String),

    #[error("root layer has parent {0}")]
    RootHasParent(String),

    #[error("layer {layer} references missing parent {parent}")]
    DanglingParent { layer: String, parent: String },

    #[error("layer {layer} references missing child {child}")]
    DanglingChild { layer: String, child: String },

    #[error("layer {child} is listed by {listed_by} but claims parent {claimed}")]
    ParentMismatch {
        child: String,
        listed_by: String,
        claimed: String,
    },

    #[error("layer {layer} claims parent {parent}, which does not list it")]
    NotListedByParent { layer: String, parent: String },

    #[error("layer {layer} lists child {child} more than once")]
    DuplicateChild { layer: String, child: String },

    #[error("cycle through layer {0}")]
    Cycle(String),

    #[error("layer {0} is not reachable from the root")]
    Unreachable(String),

    #[error("invalid props on layer {layer}: {reason}")]
    InvalidProps { layer: String, reason: String },

    #[error("document has no pages")]
    NoPages,

    #[error("unsupported file format version {0}")]
    UnsupportedVersion(String),

    #[error("{0}")]
    Json(String),
}

/// Errors from the minify/unminify transform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinifyError {
    /// The payload is already minified; minifying again would double-remap keys.
    #[error("Payload is already minified")]
    AlreadyMinified,

    /// The payload is not minified.
    #[error("Payload is not minified")]
    NotMinified,

    /// Minified and plain fragments are mixed in one payload.
    #[error("Payload mixes minified and plain fragments at {0}")]
    MixedMinification(String),

    /// The payload is not a serialized document.
    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

/// Result type alias for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
