//! Layer actions.

use layerkit_core::{DocumentEvent, EditorEvent};

use super::EditorSession;
use crate::error::{DocumentError, DocumentResult};
use crate::history::{ActionType, HistoryAction};
use crate::id::LayerId;
use crate::model::{Layer, LayerProps, Privilege, PropsMap};
use crate::store::{DetachChildrenMode, Subtree};

impl EditorSession {
    /// Appends a new layer with a generated id under `parent`.
    pub fn add_layer(
        &mut self,
        page: usize,
        parent: &LayerId,
        props: impl Into<LayerProps>,
    ) -> DocumentResult<LayerId> {
        let layer = Layer::with_new_id(props);
        let id = layer.id().clone();
        self.insert_layer(page, parent, usize::MAX, layer)?;
        Ok(id)
    }

    /// Inserts a layer record under `parent` at `index` (clamped). The record
    /// keeps its own id, e.g. one supplied on import.
    pub fn insert_layer(
        &mut self,
        page: usize,
        parent: &LayerId,
        index: usize,
        layer: Layer,
    ) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        self.ensure_container(page, parent)?;

        let id = layer.id().clone();
        let action = HistoryAction::simple(
            ActionType::LayerAdded,
            format!("Add {}", layer.kind().resolved_name()),
        );
        self.commit(action, |doc| doc.insert(page, parent.as_str(), index, layer))?;
        self.emit(EditorEvent::Document(DocumentEvent::LayerAdded {
            page,
            layer: id.to_string(),
            parent: parent.to_string(),
        }));
        Ok(())
    }

    /// Removes one layer.
    pub fn remove_layer(
        &mut self,
        page: usize,
        id: &LayerId,
        mode: DetachChildrenMode,
    ) -> DocumentResult<Vec<LayerId>> {
        self.remove_layers(page, std::slice::from_ref(id), mode)
    }

    /// Removes several layers as one undoable step, returning every id that
    /// left the page. Layers already removed with an earlier ancestor in the
    /// same call are skipped.
    pub fn remove_layers(
        &mut self,
        page: usize,
        ids: &[LayerId],
        mode: DetachChildrenMode,
    ) -> DocumentResult<Vec<LayerId>> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        for id in ids {
            self.ensure_unlocked(page, id)?;
            if mode == DetachChildrenMode::CascadeRemoveDescendants {
                for descendant in self.page(page)?.descendants(id.as_str()) {
                    self.ensure_unlocked(page, &descendant)?;
                }
            }
        }

        let action = HistoryAction::simple(
            ActionType::LayersRemoved,
            format!("Remove {} layer(s)", ids.len()),
        );
        let (removed, changed) = self.commit(action, |doc| {
            let mut removed = Vec::new();
            for id in ids {
                if removed.contains(id) {
                    continue;
                }
                removed.extend(doc.remove(page, id.as_str(), mode)?.removed_ids());
            }
            Ok(removed)
        })?;
        if changed {
            self.emit(EditorEvent::Document(DocumentEvent::LayersRemoved {
                page,
                layers: removed.iter().map(ToString::to_string).collect(),
            }));
        }
        Ok(removed)
    }

    /// Removes the selected layers and their descendants as one step.
    pub fn delete_selection(&mut self) -> DocumentResult<Vec<LayerId>> {
        if self.selection.is_empty() {
            return Ok(Vec::new());
        }
        let page = self.selection.page();
        let ids = self.selection.layers().to_vec();
        self.remove_layers(page, &ids, DetachChildrenMode::CascadeRemoveDescendants)
    }

    /// Moves a layer under `new_parent` at `index` (clamped).
    pub fn reparent_layer(
        &mut self,
        page: usize,
        id: &LayerId,
        new_parent: &LayerId,
        index: usize,
    ) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        if id.is_root() {
            return Err(DocumentError::IsRoot { page });
        }
        self.ensure_unlocked(page, id)?;
        self.ensure_container(page, new_parent)?;

        let action = HistoryAction::simple(ActionType::LayerMoved, "Move layer");
        let (position, changed) = self.commit(action, |doc| {
            doc.reparent(page, id.as_str(), new_parent.as_str(), index)?;
            Ok(sibling_index(doc.get(page, new_parent.as_str())?, id))
        })?;
        if changed {
            self.emit(EditorEvent::Document(DocumentEvent::LayerMoved {
                page,
                layer: id.to_string(),
                parent: new_parent.to_string(),
                index: position,
            }));
        }
        Ok(())
    }

    /// Moves a layer among its siblings (z-order).
    pub fn move_layer(&mut self, page: usize, id: &LayerId, index: usize) -> DocumentResult<()> {
        self.ensure_open()?;
        let parent = self
            .document()
            .get(page, id.as_str())?
            .parent()
            .cloned()
            .ok_or(DocumentError::IsRoot { page })?;
        self.reparent_layer(page, id, &parent, index)
    }

    /// Shallow-merges `patch` into the props of a layer.
    pub fn set_props(&mut self, page: usize, id: &LayerId, patch: &PropsMap) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let action = HistoryAction::simple(ActionType::PropsChanged, "Change properties");
        let (_, changed) = self.commit(action, |doc| doc.set_props(page, id.as_str(), patch))?;
        if changed {
            self.emit_props_changed(page, id);
        }
        Ok(())
    }

    /// Replaces the props of a layer with typed props of the same kind.
    pub fn replace_props(
        &mut self,
        page: usize,
        id: &LayerId,
        props: impl Into<LayerProps>,
    ) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let props = props.into();
        let action = HistoryAction::simple(ActionType::PropsChanged, "Change properties");
        let (_, changed) =
            self.commit(action, |doc| doc.replace_props(page, id.as_str(), props))?;
        if changed {
            self.emit_props_changed(page, id);
        }
        Ok(())
    }

    fn emit_props_changed(&self, page: usize, id: &LayerId) {
        self.emit(EditorEvent::Document(DocumentEvent::PropsChanged {
            page,
            layer: id.to_string(),
        }));
    }

    /// Locks or unlocks layers as one step.
    ///
    /// Anyone may lock, and an ordinary user may lift a plain lock. Lifting a
    /// hidden lock needs [`Privilege::Admin`]; unlocking clears the hidden
    /// flag as well.
    pub fn set_locked(
        &mut self,
        page: usize,
        ids: &[LayerId],
        locked: bool,
        privilege: Privilege,
    ) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let mut flags = Vec::with_capacity(ids.len());
        for id in ids {
            let layer = self.document().get(page, id.as_str())?;
            if !locked && layer.is_lock_hidden() && !privilege.is_admin() {
                return Err(DocumentError::Locked {
                    page,
                    layer: id.clone(),
                });
            }
            let hidden = locked && layer.is_lock_hidden();
            flags.push((id, locked, hidden));
        }
        let label = if locked { "Lock layers" } else { "Unlock layers" };
        self.apply_lock_flags(page, flags, label, locked)
    }

    /// Sets or clears the hidden-lock flag. Admin only. Hiding a lock also
    /// locks the layer.
    pub fn set_lock_hidden(
        &mut self,
        page: usize,
        ids: &[LayerId],
        hidden: bool,
        privilege: Privilege,
    ) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let mut flags = Vec::with_capacity(ids.len());
        for id in ids {
            let layer = self.document().get(page, id.as_str())?;
            if !privilege.is_admin() {
                return Err(DocumentError::Locked {
                    page,
                    layer: id.clone(),
                });
            }
            let locked = hidden || layer.is_locked();
            flags.push((id, locked, hidden));
        }
        let label = if hidden { "Hide lock" } else { "Show lock" };
        self.apply_lock_flags(page, flags, label, hidden)
    }

    fn apply_lock_flags(
        &mut self,
        page: usize,
        flags: Vec<(&LayerId, bool, bool)>,
        label: &str,
        locked: bool,
    ) -> DocumentResult<()> {
        let layers: Vec<String> = flags.iter().map(|(id, _, _)| id.to_string()).collect();
        let action = HistoryAction::simple(ActionType::LockChanged, label);
        let (_, changed) = self.commit(action, |doc| {
            for (id, locked, hidden) in flags {
                doc.set_lock_flags(page, id.as_str(), locked, hidden)?;
            }
            Ok(())
        })?;
        if changed {
            self.emit(EditorEvent::Document(DocumentEvent::LockChanged {
                page,
                layers,
                locked,
            }));
        }
        Ok(())
    }

    /// Copies layers (with their descendants) and inserts each copy right
    /// after its original. Returns the ids of the copies' roots.
    pub fn duplicate_layers(&mut self, page: usize, ids: &[LayerId]) -> DocumentResult<Vec<LayerId>> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let current = self.page(page)?;
        let mut copies = Vec::new();
        for id in top_level(current, ids) {
            if id.is_root() {
                return Err(DocumentError::IsRoot { page });
            }
            let subtree = Subtree::capture(current, id.as_str()).ok_or_else(|| {
                DocumentError::NotFound {
                    page,
                    layer: id.clone(),
                }
            })?;
            let parent = subtree.root().parent().cloned().ok_or(DocumentError::IsRoot { page })?;
            copies.push((parent, id.clone(), subtree.with_fresh_ids()));
        }

        let action = HistoryAction::simple(
            ActionType::LayersDuplicated,
            format!("Duplicate {} layer(s)", copies.len()),
        );
        let (created, _) = self.commit(action, |doc| {
            let mut created = Vec::with_capacity(copies.len());
            for (parent, original, copy) in copies {
                let index = sibling_index(doc.get(page, parent.as_str())?, &original) + 1;
                created.push(doc.insert_subtree(page, parent.as_str(), index, copy)?);
            }
            Ok(created)
        })?;
        self.emit_added(page, &created);
        Ok(created)
    }

    pub(crate) fn emit_added(&self, page: usize, ids: &[LayerId]) {
        for id in ids {
            let parent = self
                .document()
                .get(page, id.as_str())
                .ok()
                .and_then(|l| l.parent())
                .map(ToString::to_string)
                .unwrap_or_default();
            self.emit(EditorEvent::Document(DocumentEvent::LayerAdded {
                page,
                layer: id.to_string(),
                parent,
            }));
        }
    }

    /// Fails with `Locked` if the layer is locked.
    pub(crate) fn ensure_unlocked(&self, page: usize, id: &LayerId) -> DocumentResult<()> {
        if self.document().get(page, id.as_str())?.is_locked() {
            return Err(DocumentError::Locked {
                page,
                layer: id.clone(),
            });
        }
        Ok(())
    }

    /// Fails unless `parent` exists, may hold children and is not locked.
    pub(crate) fn ensure_container(&self, page: usize, parent: &LayerId) -> DocumentResult<()> {
        let layer = self
            .document()
            .get(page, parent.as_str())
            .map_err(|_| DocumentError::InvalidParent {
                page,
                parent: parent.clone(),
            })?;
        let kind = layer.kind();
        if !kind.is_container() {
            return Err(DocumentError::KindMismatch {
                layer: parent.clone(),
                expected: "a container layer".to_string(),
                found: kind.to_string(),
            });
        }
        if layer.is_locked() {
            return Err(DocumentError::Locked {
                page,
                layer: parent.clone(),
            });
        }
        Ok(())
    }
}

fn sibling_index(parent: &Layer, id: &LayerId) -> usize {
    parent
        .children()
        .iter()
        .position(|c| c == id)
        .unwrap_or(parent.children().len())
}

/// `ids` without those that have an ancestor also in `ids`, deduplicated.
pub(crate) fn top_level<'a>(page: &crate::Page, ids: &'a [LayerId]) -> Vec<&'a LayerId> {
    let mut out: Vec<&LayerId> = Vec::with_capacity(ids.len());
    for id in ids {
        if out.contains(&id) {
            continue;
        }
        let nested = page
            .ancestors(id.as_str())
            .iter()
            .any(|a| ids.contains(a));
        if !nested {
            out.push(id);
        }
    }
    out
}
