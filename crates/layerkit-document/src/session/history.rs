//! Undo/redo for the editor session.

use layerkit_core::{EditorEvent, HistoryEvent};

use super::EditorSession;
use crate::error::DocumentResult;

impl EditorSession {
    /// Restores the document as it was before the latest action.
    pub fn undo(&mut self) -> DocumentResult<()> {
        self.ensure_open()?;
        let label = self.history.undo_description().unwrap_or_default();
        self.history.undo()?;
        tracing::debug!("Undo '{}'", label);
        self.after_history_move();
        self.emit(EditorEvent::History(HistoryEvent::Undo { label }));
        Ok(())
    }

    /// Reapplies the latest undone action.
    pub fn redo(&mut self) -> DocumentResult<()> {
        self.ensure_open()?;
        let label = self.history.redo_description().unwrap_or_default();
        self.history.redo()?;
        tracing::debug!("Redo '{}'", label);
        self.after_history_move();
        self.emit(EditorEvent::History(HistoryEvent::Redo { label }));
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.closed && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.closed && self.history.can_redo()
    }

    /// Forgets undo and redo history, keeping the document.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.emit(EditorEvent::History(HistoryEvent::Cleared));
    }

    fn after_history_move(&mut self) {
        self.modified = true;
        self.after_document_change();
    }
}
