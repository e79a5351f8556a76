//! Editor session: the command layer over one document.
//!
//! An [`EditorSession`] owns the document, its undo/redo history and the
//! auxiliary editor state (selection, clipboard, sidebar, editor mode). All
//! reads go through [`Query`] and all writes through the session's actions;
//! the presentation layer never touches the store directly.
//!
//! This module is split into submodules:
//! - `layers`: Layer actions (add, remove, move, props, locks, duplicate)
//! - `pages`: Page actions
//! - `clipboard`: Copy and paste
//! - `selection`: Selection, sidebar and editor mode
//! - `history`: Undo/redo
//! - `query`: Read-only views
//! - `file_io`: Load, export, persistence and lifecycle
//!
//! Every successful mutating action records exactly one history checkpoint;
//! actions that leave the document unchanged record none. A failed action
//! leaves the document untouched, since mutations run on a working copy that
//! only replaces the current document once the whole action succeeded.

mod clipboard;
mod file_io;
mod history;
mod layers;
mod pages;
mod query;
mod selection;

pub use query::Query;
pub use selection::{EditorMode, Selection, SidebarTab};

use std::sync::Arc;

use layerkit_core::{DocumentEvent, EditorEvent, EventBus, HistoryEvent};
use layerkit_settings::EditorSettings;
use serde_json::Value;

use crate::autosave::AutoSaver;
use crate::document::{Document, Page};
use crate::error::{DocumentError, DocumentResult};
use crate::history::{ActionType, HistoryAction, HistoryManager};
use crate::id::LayerId;
use crate::store::Subtree;

/// Default name of a new document.
pub const UNTITLED: &str = "Untitled";

/// One open document and the state of the editor around it.
pub struct EditorSession {
    pub(crate) history: HistoryManager<Document>,
    pub(crate) name: String,
    pub(crate) editor_config: Value,
    pub(crate) settings: EditorSettings,
    pub(crate) events: Arc<EventBus>,
    pub(crate) autosave: Option<AutoSaver>,
    pub(crate) selection: Selection,
    pub(crate) active_page: usize,
    pub(crate) clipboard: Vec<Subtree>,
    pub(crate) mode: EditorMode,
    pub(crate) sidebar: Option<SidebarTab>,
    pub(crate) generation: u64,
    pub(crate) modified: bool,
    pub(crate) closed: bool,
}

impl EditorSession {
    /// Creates a session holding an empty single-page document.
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_event_bus(settings, Arc::new(EventBus::new()))
    }

    /// Creates a session publishing on an existing event bus.
    pub fn with_event_bus(settings: EditorSettings, events: Arc<EventBus>) -> Self {
        let document = Document::with_defaults(&settings.page);
        Self {
            history: HistoryManager::with_max_depth(document, settings.history.max_depth),
            name: UNTITLED.to_string(),
            editor_config: Value::Null,
            settings,
            events,
            autosave: None,
            selection: Selection::default(),
            active_page: 0,
            clipboard: Vec::new(),
            mode: EditorMode::Idle,
            sidebar: None,
            generation: 0,
            modified: false,
            closed: false,
        }
    }

    /// Read-only view of the session.
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        self.history.current()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.modified = true;
    }

    pub fn editor_config(&self) -> &Value {
        &self.editor_config
    }

    pub fn set_editor_config(&mut self, config: Value) {
        self.editor_config = config;
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Counter bumped whenever the document is replaced or the session closes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rejects work prepared against an earlier document of this session.
    pub fn ensure_generation(&self, expected: u64) -> DocumentResult<()> {
        self.ensure_open()?;
        if expected != self.generation {
            tracing::warn!(
                "Rejected stale operation for generation {} (current {})",
                expected,
                self.generation
            );
            return Err(DocumentError::StaleSession {
                expected,
                actual: self.generation,
            });
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn ensure_open(&self) -> DocumentResult<()> {
        if self.closed {
            Err(DocumentError::SessionClosed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn page(&self, page: usize) -> DocumentResult<&Page> {
        self.document()
            .page(page)
            .ok_or(DocumentError::PageNotFound(page))
    }

    /// Fails with `PageLocked` for edits on a locked page.
    pub(crate) fn ensure_page_unlocked(&self, page: usize) -> DocumentResult<()> {
        if self.page(page)?.is_locked() {
            return Err(DocumentError::PageLocked(page));
        }
        Ok(())
    }

    /// Runs several store operations as one undoable step.
    ///
    /// `change` works on a copy of the document through the store's
    /// primitives; if it fails, nothing changes. Layers that were locked
    /// before the transaction must come out of it untouched: the whole
    /// transaction fails with `Locked` if one of them was removed, moved,
    /// edited, given new children or had its lock flags changed.
    pub fn transaction<T>(
        &mut self,
        label: impl Into<String>,
        change: impl FnOnce(&mut Document) -> DocumentResult<T>,
    ) -> DocumentResult<T> {
        let before = self.document().clone();
        let action = HistoryAction::simple(ActionType::Batch, label);
        let (out, changed) = self.commit(action, |doc| {
            let out = change(doc)?;
            ensure_locked_layers_kept(&before, doc)?;
            Ok(out)
        })?;
        if changed {
            let touched: Vec<usize> = (0..self.document().page_count())
                .filter(|&i| {
                    match (before.pages.get(i), self.document().pages.get(i)) {
                        (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
                        _ => true,
                    }
                })
                .collect();
            for page in touched {
                self.emit(EditorEvent::Document(DocumentEvent::PageChanged { page }));
            }
        }
        Ok(out)
    }

    /// Runs `change` on a working copy of the document and, if it succeeds and
    /// changed anything, makes the copy current as one history checkpoint.
    pub(crate) fn commit<T>(
        &mut self,
        action: HistoryAction,
        change: impl FnOnce(&mut Document) -> DocumentResult<T>,
    ) -> DocumentResult<(T, bool)> {
        self.commit_remapping(action, Some, change)
    }

    /// Like [`commit`](Self::commit) for actions that shift page indices.
    /// `remap` gives the new index of an old page, `None` for a removed one;
    /// selection, editor mode and active page follow their pages.
    pub(crate) fn commit_remapping<T>(
        &mut self,
        action: HistoryAction,
        remap: impl Fn(usize) -> Option<usize>,
        change: impl FnOnce(&mut Document) -> DocumentResult<T>,
    ) -> DocumentResult<(T, bool)> {
        self.ensure_open()?;
        let mut working = self.document().clone();
        let out = change(&mut working)?;

        let current = self.document();
        if working.shares_pages_with(current) || working == *current {
            tracing::debug!("'{}' left the document unchanged", action.description);
            return Ok((out, false));
        }

        tracing::debug!("Committed '{}'", action.description);
        let label = action.description.clone();
        self.history.record(action, working);
        self.modified = true;
        self.remap_pages(&remap);
        self.after_document_change();
        self.emit(EditorEvent::History(HistoryEvent::Checkpoint {
            label,
            depth: self.history.undo_depth(),
        }));
        Ok((out, true))
    }

    /// Reconciles auxiliary state with the current document and schedules an
    /// auto-save.
    pub(crate) fn after_document_change(&mut self) {
        let page_count = self.document().page_count();
        if self.active_page >= page_count {
            self.set_active_page_unchecked(page_count.saturating_sub(1));
        }
        self.prune_selection();
        self.prune_mode();
        self.schedule_autosave();
    }

    pub(crate) fn layer_exists(&self, page: usize, id: &LayerId) -> bool {
        self.document()
            .page(page)
            .is_some_and(|p| p.contains(id.as_str()))
    }

    pub(crate) fn emit(&self, event: EditorEvent) {
        tracing::trace!("{}", event.description());
        self.events.publish(event);
    }
}

/// Fails with `Locked` if a layer locked in `before` changed in `after`.
///
/// Pages are compared at the same index; pages that `after` still shares with
/// `before` (wherever they moved) are skipped, as are pages that were removed.
fn ensure_locked_layers_kept(before: &Document, after: &Document) -> DocumentResult<()> {
    for (index, old_page) in before.pages.iter().enumerate() {
        if after.pages.iter().any(|p| Arc::ptr_eq(p, old_page)) {
            continue;
        }
        let Some(new_page) = after.pages.get(index) else {
            continue;
        };
        for old in old_page.layers.values().filter(|l| l.locked) {
            let kept = new_page.get(old.id.as_str()).is_some_and(|new| {
                new.parent == old.parent
                    && new.props == old.props
                    && new.locked == old.locked
                    && new.lock_hidden == old.lock_hidden
                    && new.children.iter().all(|c| old.children.contains(c))
            });
            if !kept {
                return Err(DocumentError::Locked {
                    page: index,
                    layer: old.id.clone(),
                });
            }
        }
    }
    Ok(())
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("name", &self.name)
            .field("pages", &self.document().page_count())
            .field("generation", &self.generation)
            .field("undo_depth", &self.history.undo_depth())
            .field("redo_depth", &self.history.redo_depth())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}
