//! Selection, sidebar and editor mode.
//!
//! Auxiliary state: none of it is part of the document or its history.

use std::fmt;

use layerkit_core::{EditorEvent, SelectionEvent, SessionEvent};

use super::EditorSession;
use crate::error::{DocumentError, DocumentResult};
use crate::id::LayerId;
use crate::model::LayerKind;

/// Selected layers of one page, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    page: usize,
    layers: Vec<LayerId>,
}

impl Selection {
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.as_str() == id)
    }
}

/// Sidebar panels of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidebarTab {
    Templates,
    Text,
    Photos,
    Shapes,
    Frames,
    Videos,
    Uploads,
    Layers,
    Notes,
}

impl fmt::Display for SidebarTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SidebarTab::Templates => "templates",
            SidebarTab::Text => "text",
            SidebarTab::Photos => "photos",
            SidebarTab::Shapes => "shapes",
            SidebarTab::Frames => "frames",
            SidebarTab::Videos => "videos",
            SidebarTab::Uploads => "uploads",
            SidebarTab::Layers => "layers",
            SidebarTab::Notes => "notes",
        };
        f.write_str(name)
    }
}

/// Auxiliary editing mode bound to one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Idle,
    /// Inline rich-text editing of a text layer.
    TextEditing { page: usize, layer: LayerId },
    /// Crop/position editing of the image inside an image or frame layer.
    ImageEditing { page: usize, layer: LayerId },
}

impl EditorMode {
    /// The layer the mode is bound to, if any.
    pub fn target(&self) -> Option<(usize, &LayerId)> {
        match self {
            EditorMode::Idle => None,
            EditorMode::TextEditing { page, layer } | EditorMode::ImageEditing { page, layer } => {
                Some((*page, layer))
            }
        }
    }

    fn on_page(&self, page: usize) -> Self {
        match self {
            EditorMode::Idle => EditorMode::Idle,
            EditorMode::TextEditing { layer, .. } => EditorMode::TextEditing {
                page,
                layer: layer.clone(),
            },
            EditorMode::ImageEditing { layer, .. } => EditorMode::ImageEditing {
                page,
                layer: layer.clone(),
            },
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::Idle => f.write_str("idle"),
            EditorMode::TextEditing { layer, .. } => write!(f, "text:{}", layer),
            EditorMode::ImageEditing { layer, .. } => write!(f, "image:{}", layer),
        }
    }
}

impl EditorSession {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces the selection. Every id must exist on `page`; the root cannot
    /// be selected and duplicates are dropped.
    pub fn select(&mut self, page: usize, ids: &[LayerId]) -> DocumentResult<()> {
        self.ensure_open()?;
        let current = self.page(page)?;
        let mut layers: Vec<LayerId> = Vec::with_capacity(ids.len());
        for id in ids {
            if id.is_root() {
                return Err(DocumentError::IsRoot { page });
            }
            if !current.contains(id.as_str()) {
                return Err(DocumentError::NotFound {
                    page,
                    layer: id.clone(),
                });
            }
            if !layers.contains(id) {
                layers.push(id.clone());
            }
        }
        self.replace_selection(Selection { page, layers });
        Ok(())
    }

    /// Selects every top-level layer of `page`.
    pub fn select_all(&mut self, page: usize) -> DocumentResult<()> {
        self.ensure_open()?;
        let layers = self
            .page(page)?
            .root()
            .map(|root| root.children().to_vec())
            .unwrap_or_default();
        self.replace_selection(Selection { page, layers });
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        let page = self.selection.page;
        self.replace_selection(Selection {
            page,
            layers: Vec::new(),
        });
    }

    fn replace_selection(&mut self, selection: Selection) {
        if selection == self.selection {
            return;
        }
        self.selection = selection;
        self.emit(EditorEvent::Selection(SelectionEvent::SelectionChanged {
            page: self.selection.page,
            layers: self
                .selection
                .layers
                .iter()
                .map(ToString::to_string)
                .collect(),
        }));
    }

    /// Moves selection, editor mode and active page along with their pages.
    /// State on a removed page is dropped; the active page is left for
    /// `after_document_change` to clamp.
    pub(crate) fn remap_pages(&mut self, remap: &dyn Fn(usize) -> Option<usize>) {
        let selection = match remap(self.selection.page) {
            Some(page) => Selection {
                page,
                layers: self.selection.layers.clone(),
            },
            None => Selection {
                page: self.selection.page,
                layers: Vec::new(),
            },
        };
        self.replace_selection(selection);

        let mode_page = self.mode.target().map(|(page, _)| page);
        if let Some(page) = mode_page {
            let mode = match remap(page) {
                Some(page) => self.mode.on_page(page),
                None => EditorMode::Idle,
            };
            self.set_mode(mode);
        }

        if let Some(page) = remap(self.active_page) {
            self.set_active_page_unchecked(page);
        }
    }

    /// Drops selected layers that no longer exist.
    pub(crate) fn prune_selection(&mut self) {
        let page = self.selection.page;
        let kept: Vec<LayerId> = match self.document().page(page) {
            Some(current) => self
                .selection
                .layers
                .iter()
                .filter(|id| current.contains(id.as_str()))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        let page = page.min(self.document().page_count().saturating_sub(1));
        self.replace_selection(Selection { page, layers: kept });
    }

    pub fn active_page(&self) -> usize {
        self.active_page
    }

    pub fn set_active_page(&mut self, page: usize) -> DocumentResult<()> {
        self.ensure_open()?;
        self.page(page)?;
        self.set_active_page_unchecked(page);
        Ok(())
    }

    pub(crate) fn set_active_page_unchecked(&mut self, page: usize) {
        if self.active_page != page {
            self.active_page = page;
            self.emit(EditorEvent::Session(SessionEvent::ActivePageChanged { page }));
        }
    }

    pub fn sidebar(&self) -> Option<SidebarTab> {
        self.sidebar
    }

    pub fn open_sidebar(&mut self, tab: SidebarTab) {
        self.set_sidebar(Some(tab));
    }

    pub fn close_sidebar(&mut self) {
        self.set_sidebar(None);
    }

    fn set_sidebar(&mut self, tab: Option<SidebarTab>) {
        if self.sidebar != tab {
            self.sidebar = tab;
            self.emit(EditorEvent::Session(SessionEvent::SidebarChanged {
                tab: tab.map(|t| t.to_string()),
            }));
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Enters inline text editing for a text layer.
    pub fn open_text_editor(&mut self, page: usize, id: &LayerId) -> DocumentResult<()> {
        self.ensure_editable_kind(page, id, &[LayerKind::Text], "TextLayer")?;
        self.set_mode(EditorMode::TextEditing {
            page,
            layer: id.clone(),
        });
        Ok(())
    }

    /// Enters image editing for an image or frame layer.
    pub fn open_image_editor(&mut self, page: usize, id: &LayerId) -> DocumentResult<()> {
        self.ensure_editable_kind(
            page,
            id,
            &[LayerKind::Image, LayerKind::Frame],
            "ImageLayer or FrameLayer",
        )?;
        self.set_mode(EditorMode::ImageEditing {
            page,
            layer: id.clone(),
        });
        Ok(())
    }

    pub fn close_editor(&mut self) {
        self.set_mode(EditorMode::Idle);
    }

    fn ensure_editable_kind(
        &self,
        page: usize,
        id: &LayerId,
        kinds: &[LayerKind],
        expected: &str,
    ) -> DocumentResult<()> {
        self.ensure_open()?;
        self.ensure_page_unlocked(page)?;
        let layer = self.document().get(page, id.as_str())?;
        if !kinds.contains(&layer.kind()) {
            return Err(DocumentError::KindMismatch {
                layer: id.clone(),
                expected: expected.to_string(),
                found: layer.kind().to_string(),
            });
        }
        if layer.is_locked() {
            return Err(DocumentError::Locked {
                page,
                layer: id.clone(),
            });
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: EditorMode) {
        if self.mode != mode {
            tracing::debug!("Editor mode: {}", mode);
            self.mode = mode;
            self.emit(EditorEvent::Session(SessionEvent::ModeChanged {
                mode: self.mode.to_string(),
            }));
        }
    }

    /// Leaves an editor mode whose layer is gone.
    pub(crate) fn prune_mode(&mut self) {
        let stale = self
            .mode
            .target()
            .is_some_and(|(page, layer)| !self.layer_exists(page, layer));
        if stale {
            self.set_mode(EditorMode::Idle);
        }
    }
}
