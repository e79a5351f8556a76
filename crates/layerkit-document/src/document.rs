//! Pages and documents.
//!
//! A [`Page`] is an arena of layers keyed by [`LayerId`], rooted at the
//! reserved root id. A [`Document`] is an ordered list of pages held behind
//! `Arc`, so history snapshots share every page an edit did not touch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use layerkit_settings::PageDefaults;

use crate::error::{MalformedDocumentError, MalformedReason};
use crate::id::{LayerId, ROOT_ID};
use crate::model::{Layer, RootProps};

/// One canvas of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub(crate) layers: HashMap<LayerId, Layer>,
    pub(crate) locked: bool,
    pub(crate) name: String,
    pub(crate) notes: String,
}

impl Page {
    /// Creates a page holding only a root layer with the given props.
    pub fn new(root: RootProps) -> Self {
        let root = Layer::new(LayerId::root(), root);
        let mut layers = HashMap::new();
        layers.insert(root.id.clone(), root);
        Self {
            layers,
            locked: false,
            name: String::new(),
            notes: String::new(),
        }
    }

    pub fn from_defaults(defaults: &PageDefaults) -> Self {
        Self::new(RootProps::new(
            defaults.width,
            defaults.height,
            defaults.background.clone(),
        ))
    }

    pub fn root(&self) -> Option<&Layer> {
        self.layers.get(ROOT_ID)
    }

    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    /// Number of layers on the page, root included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.len() <= 1
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Layers in depth-first paint order, starting at the root.
    ///
    /// Only layers reachable from the root are returned.
    pub fn walk(&self) -> Vec<&Layer> {
        let mut out = Vec::with_capacity(self.layers.len());
        let mut seen = HashSet::new();
        let mut stack: Vec<&str> = vec![ROOT_ID];
        while let Some(id) = stack.pop() {
            let Some(layer) = self.layers.get(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            out.push(layer);
            stack.extend(layer.children.iter().rev().map(LayerId::as_str));
        }
        out
    }

    /// Identifiers from the parent of `id` up to the root, nearest first.
    pub fn ancestors(&self, id: &str) -> Vec<LayerId> {
        let mut out = Vec::new();
        let mut current = self.layers.get(id).and_then(|l| l.parent.as_ref());
        while let Some(parent) = current {
            if out.contains(parent) || out.len() > self.layers.len() {
                break;
            }
            out.push(parent.clone());
            current = self.layers.get(parent).and_then(|l| l.parent.as_ref());
        }
        out
    }

    /// True if `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        self.ancestors(id).iter().any(|a| a.as_str() == ancestor)
    }

    /// Identifiers of every layer below `id`, in depth-first order.
    pub fn descendants(&self, id: &str) -> Vec<LayerId> {
        let mut out = Vec::new();
        let Some(layer) = self.layers.get(id) else {
            return out;
        };
        let mut stack: Vec<&LayerId> = layer.children.iter().rev().collect();
        while let Some(child) = stack.pop() {
            if out.contains(child) {
                continue;
            }
            out.push(child.clone());
            if let Some(layer) = self.layers.get(child) {
                stack.extend(layer.children.iter().rev());
            }
        }
        out
    }

    /// Checks the tree invariants, returning the first violation.
    pub fn validate(&self) -> Result<(), MalformedReason> {
        let links = self
            .layers
            .iter()
            .map(|(id, layer)| {
                (
                    id,
                    Links {
                        parent: layer.parent.as_ref(),
                        children: &layer.children,
                    },
                )
            })
            .collect();
        validate_tree(&links)
    }
}

/// An ordered sequence of pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) pages: Vec<Arc<Page>>,
}

impl Document {
    pub fn new(first_page: Page) -> Self {
        Self {
            pages: vec![Arc::new(first_page)],
        }
    }

    /// A single empty page built from the configured defaults.
    pub fn with_defaults(defaults: &PageDefaults) -> Self {
        Self::new(Page::from_defaults(defaults))
    }

    pub(crate) fn from_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: pages.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index).map(Arc::as_ref)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().map(Arc::as_ref)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of layers across all pages.
    pub fn layer_count(&self) -> usize {
        self.pages.iter().map(|p| p.len()).sum()
    }

    /// Checks every page, naming the first page that fails.
    pub fn validate(&self) -> Result<(), MalformedDocumentError> {
        if self.pages.is_empty() {
            return Err(MalformedDocumentError::document(MalformedReason::NoPages));
        }
        for (index, page) in self.pages.iter().enumerate() {
            page.validate()
                .map_err(|reason| MalformedDocumentError::on_page(index, reason))?;
        }
        Ok(())
    }

    /// True if both documents hold the very same page allocations.
    pub fn shares_pages_with(&self, other: &Document) -> bool {
        self.pages.len() == other.pages.len()
            && self
                .pages
                .iter()
                .zip(&other.pages)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::with_defaults(&PageDefaults::default())
    }
}

/// Tree links of one layer, detached from its props.
pub(crate) struct Links<'a> {
    pub parent: Option<&'a LayerId>,
    pub children: &'a [LayerId],
}

/// Validates root, link, duplicate, consistency and reachability invariants,
/// in that order. Layers are visited in id order so the reported violation is
/// stable.
pub(crate) fn validate_tree(links: &HashMap<&LayerId, Links<'_>>) -> Result<(), MalformedReason> {
    let Some(root) = links.get(&LayerId::root()) else {
        return Err(MalformedReason::MissingRoot);
    };
    if let Some(parent) = root.parent {
        return Err(MalformedReason::RootHasParent(parent.to_string()));
    }

    let mut ids: Vec<&LayerId> = links.keys().copied().collect();
    ids.sort();

    for id in &ids {
        let entry = &links[id];
        match entry.parent {
            None if !id.is_root() => return Err(MalformedReason::MultipleRoots(id.to_string())),
            Some(parent) if !links.contains_key(parent) => {
                return Err(MalformedReason::DanglingParent {
                    layer: id.to_string(),
                    parent: parent.to_string(),
                })
            }
            _ => {}
        }
        if let Some(child) = entry.children.iter().find(|c| !links.contains_key(c)) {
            return Err(MalformedReason::DanglingChild {
                layer: id.to_string(),
                child: child.to_string(),
            });
        }
    }

    for id in &ids {
        let mut seen = HashSet::new();
        if let Some(child) = links[id].children.iter().find(|c| !seen.insert(*c)) {
            return Err(MalformedReason::DuplicateChild {
                layer: id.to_string(),
                child: child.to_string(),
            });
        }
    }

    for id in &ids {
        for child in links[id].children {
            let claimed = links[child].parent;
            if claimed != Some(*id) {
                return Err(MalformedReason::ParentMismatch {
                    child: child.to_string(),
                    listed_by: id.to_string(),
                    claimed: claimed.map_or_else(|| "none".to_string(), ToString::to_string),
                });
            }
        }
    }
    for id in &ids {
        if let Some(parent) = links[id].parent {
            if !links[parent].children.contains(*id) {
                return Err(MalformedReason::NotListedByParent {
                    layer: id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }

    let mut reachable = HashSet::new();
    let mut stack = vec![LayerId::root()];
    while let Some(id) = stack.pop() {
        if reachable.insert(id.clone()) {
            stack.extend(links[&id].children.iter().cloned());
        }
    }
    if let Some(orphan) = ids.iter().find(|id| !reachable.contains(**id)) {
        // With consistent links every parent chain either reaches the root or loops.
        let mut steps = 0;
        let mut current = links[orphan].parent;
        while let Some(parent) = current {
            if parent == *orphan || steps > ids.len() {
                return Err(MalformedReason::Cycle(orphan.to_string()));
            }
            steps += 1;
            current = links[parent].parent;
        }
        return Err(MalformedReason::Unreachable(orphan.to_string()));
    }

    Ok(())
}
