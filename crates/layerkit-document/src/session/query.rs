//! Read-only views of a session.

use super::{EditorMode, EditorSession, Selection};
use crate::document::{Document, Page};
use crate::error::{DocumentError, DocumentResult};
use crate::id::LayerId;
use crate::model::{Layer, Privilege};
use crate::serialization::{serialize, SerializedDocument};

/// Read-only access to the document and editor state.
///
/// Handed to presentation code that renders or inspects but must not mutate.
#[derive(Clone, Copy)]
pub struct Query<'a> {
    session: &'a EditorSession,
}

impl<'a> Query<'a> {
    pub(crate) fn new(session: &'a EditorSession) -> Self {
        Self { session }
    }

    pub fn document(&self) -> &'a Document {
        self.session.document()
    }

    pub fn serialize(&self) -> SerializedDocument {
        serialize(self.document())
    }

    pub fn page_count(&self) -> usize {
        self.document().page_count()
    }

    pub fn page(&self, index: usize) -> DocumentResult<&'a Page> {
        self.document()
            .page(index)
            .ok_or(DocumentError::PageNotFound(index))
    }

    /// Layers of a page in paint order, root first.
    pub fn layers(&self, page: usize) -> DocumentResult<Vec<&'a Layer>> {
        Ok(self.page(page)?.walk())
    }

    pub fn layer(&self, page: usize, id: &str) -> DocumentResult<&'a Layer> {
        self.document().get(page, id)
    }

    pub fn children(&self, page: usize, id: &str) -> DocumentResult<&'a [LayerId]> {
        Ok(self.layer(page, id)?.children())
    }

    pub fn ancestors(&self, page: usize, id: &str) -> DocumentResult<Vec<LayerId>> {
        self.layer(page, id)?;
        Ok(self.page(page)?.ancestors(id))
    }

    pub fn descendants(&self, page: usize, id: &str) -> DocumentResult<Vec<LayerId>> {
        self.layer(page, id)?;
        Ok(self.page(page)?.descendants(id))
    }

    /// Lock state of a layer as `privilege` may see it.
    pub fn lock_state(
        &self,
        page: usize,
        id: &str,
        privilege: Privilege,
    ) -> DocumentResult<Option<bool>> {
        Ok(self.layer(page, id)?.visible_lock_state(privilege))
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.session.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.session.history.redo_description()
    }

    pub fn selection(&self) -> &'a Selection {
        &self.session.selection
    }

    pub fn mode(&self) -> &'a EditorMode {
        &self.session.mode
    }

    pub fn active_page(&self) -> usize {
        self.session.active_page
    }

    pub fn is_modified(&self) -> bool {
        self.session.modified
    }
}
