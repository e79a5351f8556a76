//! Event type definitions for the event bus.
//!
//! This module defines all editor events organized by category.
//! Events are cloneable and serializable so they can be logged or replayed.
//! Layer and page references are carried as plain strings/indices; the core
//! crate has no knowledge of the document model.

use serde::{Deserialize, Serialize};

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Layer tree and page mutations
    Document(DocumentEvent),
    /// Undo/redo history movement
    History(HistoryEvent),
    /// Selection changes
    Selection(SelectionEvent),
    /// Auto-save and export outcomes
    Persistence(PersistenceEvent),
    /// Session lifecycle and auxiliary editor modes
    Session(SessionEvent),
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::Document(_) => EventCategory::Document,
            EditorEvent::History(_) => EventCategory::History,
            EditorEvent::Selection(_) => EventCategory::Selection,
            EditorEvent::Persistence(_) => EventCategory::Persistence,
            EditorEvent::Session(_) => EventCategory::Session,
        }
    }

    /// Page the event is about, for events bound to one page
    pub fn page(&self) -> Option<usize> {
        match self {
            EditorEvent::Document(e) => match e {
                DocumentEvent::LayerAdded { page, .. }
                | DocumentEvent::LayersRemoved { page, .. }
                | DocumentEvent::LayerMoved { page, .. }
                | DocumentEvent::PropsChanged { page, .. }
                | DocumentEvent::LockChanged { page, .. }
                | DocumentEvent::PageAdded { page }
                | DocumentEvent::PageRemoved { page }
                | DocumentEvent::PageChanged { page } => Some(*page),
                DocumentEvent::DocumentLoaded { .. } => None,
            },
            EditorEvent::Selection(SelectionEvent::SelectionChanged { page, .. }) => Some(*page),
            EditorEvent::Session(SessionEvent::ActivePageChanged { page }) => Some(*page),
            EditorEvent::History(_) | EditorEvent::Persistence(_) | EditorEvent::Session(_) => {
                None
            }
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::Document(e) => e.description(),
            EditorEvent::History(e) => e.description(),
            EditorEvent::Selection(e) => e.description(),
            EditorEvent::Persistence(e) => e.description(),
            EditorEvent::Session(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Layer tree and page mutations.
    Document,
    /// Undo/redo history movement.
    History,
    /// Selection changes.
    Selection,
    /// Auto-save and export outcomes.
    Persistence,
    /// Session lifecycle events.
    Session,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Document => write!(f, "Document"),
            EventCategory::History => write!(f, "History"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Persistence => write!(f, "Persistence"),
            EventCategory::Session => write!(f, "Session"),
        }
    }
}

/// Layer tree and page mutation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A layer was inserted.
    LayerAdded {
        /// Page index.
        page: usize,
        /// Identifier of the new layer.
        layer: String,
        /// Identifier of its parent.
        parent: String,
    },
    /// One or more layers were removed (with their descendants when cascading).
    LayersRemoved {
        /// Page index.
        page: usize,
        /// Identifiers of every removed layer.
        layers: Vec<String>,
    },
    /// A layer changed parent or position among its siblings.
    LayerMoved {
        /// Page index.
        page: usize,
        /// Identifier of the moved layer.
        layer: String,
        /// Identifier of the (possibly unchanged) parent.
        parent: String,
        /// New index in the parent's children.
        index: usize,
    },
    /// Props of a layer were updated.
    PropsChanged {
        /// Page index.
        page: usize,
        /// Identifier of the updated layer.
        layer: String,
    },
    /// Lock flags of one or more layers changed.
    LockChanged {
        /// Page index.
        page: usize,
        /// Identifiers of the affected layers.
        layers: Vec<String>,
        /// The new `locked` value.
        locked: bool,
    },
    /// A page was inserted.
    PageAdded {
        /// Index of the new page.
        page: usize,
    },
    /// A page was removed.
    PageRemoved {
        /// Index the page occupied.
        page: usize,
    },
    /// Page metadata (name, notes, lock, order) changed.
    PageChanged {
        /// Page index after the change.
        page: usize,
    },
    /// A whole document replaced the previous one.
    DocumentLoaded {
        /// Document name.
        name: String,
        /// Number of pages loaded.
        pages: usize,
    },
}

impl DocumentEvent {
    fn description(&self) -> String {
        match self {
            DocumentEvent::LayerAdded { page, layer, parent } => {
                format!("Layer {} added under {} on page {}", layer, parent, page)
            }
            DocumentEvent::LayersRemoved { page, layers } => {
                format!("{} layer(s) removed from page {}", layers.len(), page)
            }
            DocumentEvent::LayerMoved {
                page,
                layer,
                parent,
                index,
            } => format!(
                "Layer {} moved to {}[{}] on page {}",
                layer, parent, index, page
            ),
            DocumentEvent::PropsChanged { page, layer } => {
                format!("Props of {} changed on page {}", layer, page)
            }
            DocumentEvent::LockChanged {
                page,
                layers,
                locked,
            } => format!(
                "{} layer(s) {} on page {}",
                layers.len(),
                if *locked { "locked" } else { "unlocked" },
                page
            ),
            DocumentEvent::PageAdded { page } => format!("Page {} added", page),
            DocumentEvent::PageRemoved { page } => format!("Page {} removed", page),
            DocumentEvent::PageChanged { page } => format!("Page {} changed", page),
            DocumentEvent::DocumentLoaded { name, pages } => {
                format!("Document '{}' loaded ({} pages)", name, pages)
            }
        }
    }
}

/// Undo/redo history events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// A checkpoint was recorded.
    Checkpoint {
        /// Label of the action that produced it.
        label: String,
        /// Undo depth after recording.
        depth: usize,
    },
    /// A checkpoint was undone.
    Undo {
        /// Label of the undone action.
        label: String,
    },
    /// A checkpoint was redone.
    Redo {
        /// Label of the redone action.
        label: String,
    },
    /// History was cleared.
    Cleared,
}

impl HistoryEvent {
    fn description(&self) -> String {
        match self {
            HistoryEvent::Checkpoint { label, depth } => {
                format!("Checkpoint '{}' (depth {})", label, depth)
            }
            HistoryEvent::Undo { label } => format!("Undo '{}'", label),
            HistoryEvent::Redo { label } => format!("Redo '{}'", label),
            HistoryEvent::Cleared => "History cleared".to_string(),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The selected layer set changed.
    SelectionChanged {
        /// Page index the selection belongs to.
        page: usize,
        /// Selected layer identifiers in selection order.
        layers: Vec<String>,
    },
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::SelectionChanged { page, layers } => {
                format!("{} layer(s) selected on page {}", layers.len(), page)
            }
        }
    }
}

/// Auto-save and export events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PersistenceEvent {
    /// A debounced save was (re)scheduled.
    SaveScheduled {
        /// Quiet period before the save fires.
        debounce_ms: u64,
    },
    /// A save completed.
    SaveSucceeded {
        /// Location returned by the persistence API.
        url: String,
    },
    /// A save failed; local edits are unaffected.
    SaveFailed {
        /// Failure description.
        reason: String,
    },
    /// A pending save was cancelled.
    SaveCancelled,
}

impl PersistenceEvent {
    fn description(&self) -> String {
        match self {
            PersistenceEvent::SaveScheduled { debounce_ms } => {
                format!("Save scheduled in {}ms", debounce_ms)
            }
            PersistenceEvent::SaveSucceeded { url } => format!("Saved to {}", url),
            PersistenceEvent::SaveFailed { reason } => format!("Save failed: {}", reason),
            PersistenceEvent::SaveCancelled => "Pending save cancelled".to_string(),
        }
    }
}

/// Session lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The auxiliary editor mode changed (text editing, image crop, ...).
    ModeChanged {
        /// New mode name.
        mode: String,
    },
    /// The sidebar was opened or closed.
    SidebarChanged {
        /// Open sidebar tab, if any.
        tab: Option<String>,
    },
    /// The active page changed.
    ActivePageChanged {
        /// New active page index.
        page: usize,
    },
    /// The session was torn down.
    Closed,
}

impl SessionEvent {
    fn description(&self) -> String {
        match self {
            SessionEvent::ModeChanged { mode } => format!("Editor mode: {}", mode),
            SessionEvent::SidebarChanged { tab } => match tab {
                Some(tab) => format!("Sidebar opened: {}", tab),
                None => "Sidebar closed".to_string(),
            },
            SessionEvent::ActivePageChanged { page } => format!("Active page: {}", page),
            SessionEvent::Closed => "Session closed".to_string(),
        }
    }
}
