//! Page actions.

use std::cmp::Ordering;

use layerkit_core::{DocumentEvent, EditorEvent};

use super::EditorSession;
use crate::document::Page;
use crate::error::DocumentResult;
use crate::history::{ActionType, HistoryAction};

impl EditorSession {
    /// Inserts an empty page after `after` (or at the end), built from the
    /// configured page defaults. Returns the new page's index.
    pub fn add_page(&mut self, after: Option<usize>) -> DocumentResult<usize> {
        let page = Page::from_defaults(&self.settings.page);
        let index = after.map_or(usize::MAX, |i| i.saturating_add(1));
        self.insert_page(index, page)
    }

    /// Inserts a copy of page `index` right after it.
    pub fn duplicate_page(&mut self, index: usize) -> DocumentResult<usize> {
        let copy = self.page(index)?.clone();
        self.insert_page(index + 1, copy)
    }

    fn insert_page(&mut self, index: usize, page: Page) -> DocumentResult<usize> {
        let action = HistoryAction::simple(ActionType::PageAdded, "Add page");
        let slot = index.min(self.document().page_count());
        let (at, _) = self.commit_remapping(
            action,
            |p| Some(if p >= slot { p + 1 } else { p }),
            |doc| doc.add_page(slot, page),
        )?;
        self.emit(EditorEvent::Document(DocumentEvent::PageAdded { page: at }));
        Ok(at)
    }

    /// Removes a page; the last remaining page cannot be removed.
    pub fn remove_page(&mut self, index: usize) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(index)?;
        let action = HistoryAction::simple(ActionType::PageRemoved, "Remove page");
        self.commit_remapping(
            action,
            |p| match p.cmp(&index) {
                Ordering::Less => Some(p),
                Ordering::Equal => None,
                Ordering::Greater => Some(p - 1),
            },
            |doc| doc.remove_page(index).map(|_| ()),
        )?;
        self.emit(EditorEvent::Document(DocumentEvent::PageRemoved { page: index }));
        Ok(())
    }

    pub fn move_page(&mut self, from: usize, to: usize) -> DocumentResult<()> {
        let action = HistoryAction::simple(ActionType::PageMoved, "Move page");
        let (_, changed) = self.commit_remapping(
            action,
            |p| {
                Some(if p == from {
                    to
                } else if from < p && p <= to {
                    p - 1
                } else if to <= p && p < from {
                    p + 1
                } else {
                    p
                })
            },
            |doc| doc.move_page(from, to),
        )?;
        if changed {
            self.emit(EditorEvent::Document(DocumentEvent::PageChanged { page: to }));
        }
        Ok(())
    }

    pub fn set_page_name(&mut self, page: usize, name: impl Into<String>) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let name = name.into();
        let action = HistoryAction::simple(ActionType::PageChanged, "Rename page");
        self.page_changed(page, action, |doc| doc.set_page_name(page, name))
    }

    pub fn set_page_notes(&mut self, page: usize, notes: impl Into<String>) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let notes = notes.into();
        let action = HistoryAction::simple(ActionType::PageChanged, "Edit page notes");
        self.page_changed(page, action, |doc| doc.set_page_notes(page, notes))
    }

    /// Locks or unlocks a whole page. This is the one edit allowed on a
    /// locked page.
    pub fn set_page_locked(&mut self, page: usize, locked: bool) -> DocumentResult<()> {
        let label = if locked { "Lock page" } else { "Unlock page" };
        let action = HistoryAction::simple(ActionType::PageChanged, label);
        self.page_changed(page, action, |doc| doc.set_page_locked(page, locked))
    }

    fn page_changed(
        &mut self,
        page: usize,
        action: HistoryAction,
        change: impl FnOnce(&mut crate::Document) -> DocumentResult<()>,
    ) -> DocumentResult<()> {
        let (_, changed) = self.commit(action, change)?;
        if changed {
            self.emit(EditorEvent::Document(DocumentEvent::PageChanged { page }));
        }
        Ok(())
    }
}
