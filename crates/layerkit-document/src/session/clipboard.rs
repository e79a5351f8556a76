//! Copy and paste of layer subtrees.

use super::layers::top_level;
use super::EditorSession;
use crate::error::{DocumentError, DocumentResult};
use crate::history::{ActionType, HistoryAction};
use crate::id::LayerId;
use crate::store::Subtree;

impl EditorSession {
    /// Copies the selected layers with their descendants. Returns how many
    /// subtrees were copied.
    pub fn copy_selection(&mut self) -> DocumentResult<usize> {
        self.ensure_open()?;
        let page = self.selection.page();
        let current = self.page(page)?;
        let clipboard: Vec<Subtree> = top_level(current, self.selection.layers())
            .into_iter()
            .filter_map(|id| Subtree::capture(current, id.as_str()))
            .collect();
        tracing::debug!("Copied {} layer subtree(s)", clipboard.len());
        let count = clipboard.len();
        self.clipboard = clipboard;
        Ok(count)
    }

    pub fn has_clipboard(&self) -> bool {
        !self.clipboard.is_empty()
    }

    /// Appends copies of the clipboard under `parent` with fresh ids and
    /// selects them. Pasting again creates further copies.
    pub fn paste(&mut self, page: usize, parent: &LayerId) -> DocumentResult<Vec<LayerId>> {
        self.ensure_open()?;
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_page_unlocked(page)?;
        self.ensure_container(page, parent)?;

        let copies: Vec<Subtree> = self.clipboard.iter().map(Subtree::with_fresh_ids).collect();
        let action = HistoryAction::simple(
            ActionType::LayersPasted,
            format!("Paste {} layer(s)", copies.len()),
        );
        let (pasted, _) = self.commit(action, |doc| {
            copies
                .into_iter()
                .map(|copy| doc.insert_subtree(page, parent.as_str(), usize::MAX, copy))
                .collect::<Result<Vec<_>, DocumentError>>()
        })?;
        self.emit_added(page, &pasted);
        self.select(page, &pasted)?;
        Ok(pasted)
    }
}
