//! Layer tree store.
//!
//! Primitive mutations on a [`Document`]. Every operation checks all of its
//! preconditions against the current tree before touching it, so a failed call
//! leaves the document exactly as it was. Policy (locks held by callers,
//! privileges, selection) belongs to the session.

use std::collections::HashMap;
use std::sync::Arc;

use crate::document::{Document, Page};
use crate::error::{DocumentError, DocumentResult, MalformedDocumentError};
use crate::id::LayerId;
use crate::model::{Layer, LayerKind, LayerProps, PropsMap};

/// What happens to the children of a removed layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachChildrenMode {
    /// Remove the whole subtree.
    CascadeRemoveDescendants,
    /// Splice the children into the grandparent at the removed layer's position.
    ReparentChildrenToGrandparent,
}

/// A detached layer together with its descendants in depth-first order.
///
/// Links inside the subtree are intact; the parent of the subtree root is
/// replaced when the subtree is inserted somewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    root: Layer,
    descendants: Vec<Layer>,
}

impl Subtree {
    /// A subtree consisting of a single leaf.
    pub fn leaf(mut layer: Layer) -> Self {
        layer.children.clear();
        Self {
            root: layer,
            descendants: Vec::new(),
        }
    }

    /// Copies the layer `id` and everything below it out of `page`.
    pub fn capture(page: &Page, id: &str) -> Option<Self> {
        let root = page.get(id)?.clone();
        let descendants = page
            .descendants(id)
            .iter()
            .filter_map(|d| page.get(d.as_str()).cloned())
            .collect();
        Some(Self { root, descendants })
    }

    pub fn root(&self) -> &Layer {
        &self.root
    }

    pub fn root_id(&self) -> &LayerId {
        &self.root.id
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        std::iter::once(&self.root).chain(self.descendants.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.descendants.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Types opaque props of known kinds and rejects root props, which only
    /// the page root may carry.
    fn checked(self) -> DocumentResult<Self> {
        Ok(Self {
            root: checked_layer(self.root)?,
            descendants: self
                .descendants
                .into_iter()
                .map(checked_layer)
                .collect::<DocumentResult<_>>()?,
        })
    }

    /// A copy of this subtree in which every layer has a new generated id.
    pub fn with_fresh_ids(&self) -> Self {
        let mapping: HashMap<&LayerId, LayerId> =
            self.layers().map(|l| (&l.id, LayerId::generate())).collect();
        let remap = |layer: &Layer| {
            let mut copy = layer.clone();
            if let Some(id) = mapping.get(&layer.id) {
                copy.id = id.clone();
            }
            if let Some(parent) = layer.parent.as_ref().and_then(|p| mapping.get(p)) {
                copy.parent = Some(parent.clone());
            }
            copy.children = layer
                .children
                .iter()
                .map(|c| mapping.get(c).cloned().unwrap_or_else(|| c.clone()))
                .collect();
            copy
        };
        Self {
            root: remap(&self.root),
            descendants: self.descendants.iter().map(remap).collect(),
        }
    }
}

/// The result of a successful [`Document::remove`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedSubtree {
    /// Parent the removed layer was attached to.
    pub parent: LayerId,
    /// Its position among the parent's children.
    pub index: usize,
    pub mode: DetachChildrenMode,
    /// The removed layers. In reparent mode this is the removed layer alone.
    pub subtree: Subtree,
    /// Children moved to the grandparent in reparent mode.
    pub reparented: Vec<LayerId>,
}

impl RemovedSubtree {
    /// Identifiers of every layer that left the page.
    pub fn removed_ids(&self) -> Vec<LayerId> {
        self.subtree.layers().map(|l| l.id.clone()).collect()
    }
}

impl Document {
    pub fn get(&self, page: usize, id: &str) -> DocumentResult<&Layer> {
        self.page_ref(page)?
            .get(id)
            .ok_or_else(|| not_found(page, id))
    }

    pub(crate) fn page_ref(&self, page: usize) -> DocumentResult<&Page> {
        self.page(page).ok_or(DocumentError::PageNotFound(page))
    }

    /// Copy-on-write access to one page; untouched pages stay shared.
    pub(crate) fn page_mut(&mut self, page: usize) -> DocumentResult<&mut Page> {
        self.pages
            .get_mut(page)
            .map(Arc::make_mut)
            .ok_or(DocumentError::PageNotFound(page))
    }

    /// Inserts `layer` as a leaf child of `parent` at `index` (clamped to the
    /// end of the children list).
    pub fn insert(
        &mut self,
        page: usize,
        parent: &str,
        index: usize,
        layer: Layer,
    ) -> DocumentResult<()> {
        self.insert_subtree(page, parent, index, Subtree::leaf(layer))
            .map(|_| ())
    }

    /// Inserts a whole subtree under `parent`, returning the id of its root.
    pub fn insert_subtree(
        &mut self,
        page: usize,
        parent: &str,
        index: usize,
        subtree: Subtree,
    ) -> DocumentResult<LayerId> {
        let current = self.page_ref(page)?;
        if !current.contains(parent) {
            return Err(DocumentError::InvalidParent {
                page,
                parent: LayerId::from(parent),
            });
        }
        if let Some(taken) = subtree.layers().find(|l| current.contains(l.id.as_str())) {
            return Err(DocumentError::DuplicateId {
                page,
                layer: taken.id.clone(),
            });
        }

        let Subtree {
            mut root,
            descendants,
        } = subtree.checked()?;
        let root_id = root.id.clone();
        root.parent = Some(LayerId::from(parent));

        let target = self.page_mut(page)?;
        if let Some(parent_layer) = target.layers.get_mut(parent) {
            let at = index.min(parent_layer.children.len());
            parent_layer.children.insert(at, root_id.clone());
        }
        target.layers.insert(root_id.clone(), root);
        for layer in descendants {
            target.layers.insert(layer.id.clone(), layer);
        }
        Ok(root_id)
    }

    /// Removes a layer, detaching it from its parent. The root cannot be removed.
    pub fn remove(
        &mut self,
        page: usize,
        id: &str,
        mode: DetachChildrenMode,
    ) -> DocumentResult<RemovedSubtree> {
        let current = self.page_ref(page)?;
        let layer = current.get(id).ok_or_else(|| not_found(page, id))?;
        let Some(parent) = layer.parent.clone() else {
            return Err(DocumentError::IsRoot { page });
        };
        let index = current
            .get(parent.as_str())
            .and_then(|p| p.children.iter().position(|c| c.as_str() == id))
            .unwrap_or(0);

        let (subtree, reparented) = match mode {
            DetachChildrenMode::CascadeRemoveDescendants => (
                Subtree::capture(current, id).ok_or_else(|| not_found(page, id))?,
                Vec::new(),
            ),
            DetachChildrenMode::ReparentChildrenToGrandparent => {
                (Subtree::leaf(layer.clone()), layer.children.clone())
            }
        };

        let target = self.page_mut(page)?;
        for removed in subtree.layers() {
            target.layers.remove(&removed.id);
        }
        for child in &reparented {
            if let Some(layer) = target.layers.get_mut(child) {
                layer.parent = Some(parent.clone());
            }
        }
        if let Some(parent_layer) = target.layers.get_mut(&parent) {
            parent_layer.children.retain(|c| c.as_str() != id);
            let at = index.min(parent_layer.children.len());
            parent_layer
                .children
                .splice(at..at, reparented.iter().cloned());
        }

        Ok(RemovedSubtree {
            parent,
            index,
            mode,
            subtree,
            reparented,
        })
    }

    /// Moves `id` under `new_parent` at `index` (clamped). Fails if
    /// `new_parent` is `id` itself or one of its descendants.
    pub fn reparent(
        &mut self,
        page: usize,
        id: &str,
        new_parent: &str,
        index: usize,
    ) -> DocumentResult<()> {
        let current = self.page_ref(page)?;
        let layer = current.get(id).ok_or_else(|| not_found(page, id))?;
        if layer.is_root() {
            return Err(DocumentError::IsRoot { page });
        }
        if !current.contains(new_parent) {
            return Err(not_found(page, new_parent));
        }
        if id == new_parent || current.is_ancestor(id, new_parent) {
            return Err(DocumentError::WouldCreateCycle {
                layer: LayerId::from(id),
                parent: LayerId::from(new_parent),
            });
        }
        let old_parent = layer.parent.clone();

        let target = self.page_mut(page)?;
        if let Some(old) = old_parent.as_ref().and_then(|p| target.layers.get_mut(p)) {
            old.children.retain(|c| c.as_str() != id);
        }
        if let Some(parent_layer) = target.layers.get_mut(new_parent) {
            let at = index.min(parent_layer.children.len());
            parent_layer.children.insert(at, LayerId::from(id));
        }
        if let Some(moved) = target.layers.get_mut(id) {
            moved.parent = Some(LayerId::from(new_parent));
        }
        Ok(())
    }

    /// Moves `id` to `index` (clamped) among its current siblings.
    pub fn move_layer(&mut self, page: usize, id: &str, index: usize) -> DocumentResult<()> {
        let layer = self.get(page, id)?;
        let Some(parent) = layer.parent.clone() else {
            return Err(DocumentError::IsRoot { page });
        };
        self.reparent(page, id, parent.as_str(), index)
    }

    /// Shallow-merges `patch` into the props of `id`.
    ///
    /// Each top-level key replaces the old value wholesale. Fails with
    /// `Locked` if the layer is locked and with `InvalidProps` if the merged
    /// props no longer fit the layer's kind.
    pub fn set_props(&mut self, page: usize, id: &str, patch: &PropsMap) -> DocumentResult<()> {
        let layer = self.get(page, id)?;
        if layer.locked {
            return Err(DocumentError::Locked {
                page,
                layer: layer.id.clone(),
            });
        }
        let merged = layer
            .props
            .merged(patch)
            .map_err(|e| DocumentError::InvalidProps {
                layer: layer.id.clone(),
                reason: e.to_string(),
            })?;
        self.write_props(page, id, merged)
    }

    /// Replaces the props of `id` with typed props of the same kind.
    pub fn replace_props(
        &mut self,
        page: usize,
        id: &str,
        props: LayerProps,
    ) -> DocumentResult<()> {
        let layer = self.get(page, id)?;
        if layer.locked {
            return Err(DocumentError::Locked {
                page,
                layer: layer.id.clone(),
            });
        }
        let props = normalized(&layer.id, props)?;
        let (expected, found) = (layer.kind(), props.kind());
        if expected != found {
            return Err(DocumentError::KindMismatch {
                layer: layer.id.clone(),
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        self.write_props(page, id, props)
    }

    fn write_props(&mut self, page: usize, id: &str, props: LayerProps) -> DocumentResult<()> {
        let target = self.page_mut(page)?;
        let layer = target
            .layers
            .get_mut(id)
            .ok_or_else(|| not_found(page, id))?;
        layer.props = props;
        Ok(())
    }

    /// Sets both lock flags of `id` verbatim.
    pub(crate) fn set_lock_flags(
        &mut self,
        page: usize,
        id: &str,
        locked: bool,
        lock_hidden: bool,
    ) -> DocumentResult<()> {
        self.get(page, id)?;
        let target = self.page_mut(page)?;
        if let Some(layer) = target.layers.get_mut(id) {
            layer.locked = locked;
            layer.lock_hidden = lock_hidden;
        }
        Ok(())
    }

    /// Inserts a page at `index` (clamped), returning where it landed.
    pub fn add_page(&mut self, index: usize, page: Page) -> DocumentResult<usize> {
        let at = index.min(self.pages.len());
        page.validate()
            .map_err(|reason| MalformedDocumentError::on_page(at, reason))?;
        self.pages.insert(at, Arc::new(page));
        Ok(at)
    }

    /// Removes a page. A document always keeps at least one page.
    pub fn remove_page(&mut self, index: usize) -> DocumentResult<Page> {
        if index >= self.pages.len() {
            return Err(DocumentError::PageNotFound(index));
        }
        if self.pages.len() == 1 {
            return Err(DocumentError::LastPage);
        }
        Ok(Arc::unwrap_or_clone(self.pages.remove(index)))
    }

    pub fn move_page(&mut self, from: usize, to: usize) -> DocumentResult<()> {
        for index in [from, to] {
            if index >= self.pages.len() {
                return Err(DocumentError::PageNotFound(index));
            }
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        Ok(())
    }

    pub fn set_page_name(&mut self, page: usize, name: impl Into<String>) -> DocumentResult<()> {
        self.page_mut(page)?.name = name.into();
        Ok(())
    }

    pub fn set_page_notes(&mut self, page: usize, notes: impl Into<String>) -> DocumentResult<()> {
        self.page_mut(page)?.notes = notes.into();
        Ok(())
    }

    pub fn set_page_locked(&mut self, page: usize, locked: bool) -> DocumentResult<()> {
        self.page_mut(page)?.locked = locked;
        Ok(())
    }
}

fn normalized(id: &LayerId, props: LayerProps) -> DocumentResult<LayerProps> {
    props
        .normalized()
        .map_err(|e| DocumentError::InvalidProps {
            layer: id.clone(),
            reason: e.to_string(),
        })
}

fn checked_layer(mut layer: Layer) -> DocumentResult<Layer> {
    layer.props = normalized(&layer.id, layer.props)?;
    if layer.kind() == LayerKind::Root {
        return Err(DocumentError::KindMismatch {
            layer: layer.id,
            expected: "a non-root layer kind".to_string(),
            found: LayerKind::Root.to_string(),
        });
    }
    Ok(layer)
}

fn not_found(page: usize, id: &str) -> DocumentError {
    DocumentError::NotFound {
        page,
        layer: LayerId::from(id),
    }
}
