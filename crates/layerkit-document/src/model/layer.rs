use serde::{Deserialize, Serialize};

use super::props::LayerProps;
use super::LayerKind;
use crate::id::LayerId;

/// Who is acting on the document; decides who may see and lift locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Privilege {
    #[default]
    User,
    Admin,
}

impl Privilege {
    pub fn is_admin(self) -> bool {
        self == Privilege::Admin
    }
}

/// One node of a page's layer tree.
///
/// Tree links are held by identifier. They are only changed by the store, which
/// keeps `parent` and the parent's `children` consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub(crate) props: LayerProps,
    pub(crate) locked: bool,
    pub(crate) lock_hidden: bool,
    pub(crate) parent: Option<LayerId>,
    pub(crate) children: Vec<LayerId>,
}

impl Layer {
    /// Creates a detached, unlocked leaf layer.
    pub fn new(id: LayerId, props: impl Into<LayerProps>) -> Self {
        Self {
            id,
            props: props.into(),
            locked: false,
            lock_hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Creates a detached leaf with a freshly generated id.
    pub fn with_new_id(props: impl Into<LayerProps>) -> Self {
        Self::new(LayerId::generate(), props)
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.props.kind()
    }

    pub fn props(&self) -> &LayerProps {
        &self.props
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_lock_hidden(&self) -> bool {
        self.lock_hidden
    }

    pub fn parent(&self) -> Option<&LayerId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[LayerId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    /// Lock state as shown to a caller; `None` when it is hidden from them.
    pub fn visible_lock_state(&self, privilege: Privilege) -> Option<bool> {
        if self.lock_hidden && !privilege.is_admin() {
            None
        } else {
            Some(self.locked)
        }
    }
}
