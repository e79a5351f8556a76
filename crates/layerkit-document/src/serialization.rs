//! Serialized document format.
//!
//! A document serializes to a JSON array of pages. Each page maps layer ids to
//! layer records:
//!
//! ```json
//! [{
//!   "layers": {
//!     "ROOT": {
//!       "type": { "resolvedName": "RootLayer" },
//!       "props": { "boxSize": { "width": 1640.0, "height": 924.0 }, "...": "..." },
//!       "locked": false,
//!       "parent": null,
//!       "child": ["L1_..."]
//!     }
//!   },
//!   "locked": false,
//!   "name": "",
//!   "notes": ""
//! }]
//! ```
//!
//! Deserialization rejects any input that breaks the tree invariants; it
//! never repairs a document.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{validate_tree, Document, Links, Page};
use crate::error::{DocumentResult, MalformedDocumentError, MalformedReason};
use crate::id::LayerId;
use crate::model::{Layer, LayerKind, LayerProps, PropsMap};

/// Serialized form of a whole document: its pages in order.
pub type SerializedDocument = Vec<SerializedPage>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedPage {
    pub layers: BTreeMap<LayerId, SerializedLayer>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedLayer {
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub props: PropsMap,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub lock_hidden: bool,
    pub parent: Option<LayerId>,
    #[serde(default)]
    pub child: Vec<LayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerType {
    pub resolved_name: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Serializes every layer reachable from each page's root.
pub fn serialize(document: &Document) -> SerializedDocument {
    document.pages().map(serialize_page).collect()
}

fn serialize_page(page: &Page) -> SerializedPage {
    let layers = page
        .walk()
        .into_iter()
        .map(|layer| {
            let record = SerializedLayer {
                layer_type: LayerType {
                    resolved_name: layer.kind().resolved_name().to_string(),
                },
                props: layer.props.to_map(),
                locked: layer.locked,
                lock_hidden: layer.lock_hidden,
                parent: layer.parent.clone(),
                child: layer.children.clone(),
            };
            (layer.id.clone(), record)
        })
        .collect();
    SerializedPage {
        layers,
        locked: page.locked,
        name: page.name.clone(),
        notes: page.notes.clone(),
    }
}

/// Rebuilds a document, failing on the first invariant violation found.
pub fn deserialize(serialized: &SerializedDocument) -> DocumentResult<Document> {
    if serialized.is_empty() {
        return Err(MalformedDocumentError::document(MalformedReason::NoPages).into());
    }
    let pages = serialized
        .iter()
        .enumerate()
        .map(|(index, page)| {
            deserialize_page(page).map_err(|reason| MalformedDocumentError::on_page(index, reason))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Document::from_pages(pages))
}

fn deserialize_page(page: &SerializedPage) -> Result<Page, MalformedReason> {
    let links: HashMap<&LayerId, Links<'_>> = page
        .layers
        .iter()
        .map(|(id, layer)| {
            (
                id,
                Links {
                    parent: layer.parent.as_ref(),
                    children: &layer.child,
                },
            )
        })
        .collect();
    validate_tree(&links)?;

    let mut layers = HashMap::with_capacity(page.layers.len());
    for (id, record) in &page.layers {
        let kind = LayerKind::from_resolved_name(&record.layer_type.resolved_name);
        if id.is_root() != (kind == LayerKind::Root) {
            return Err(MalformedReason::InvalidProps {
                layer: id.to_string(),
                reason: format!("{} cannot be used for this layer", kind),
            });
        }
        let props = LayerProps::from_map(&kind, record.props.clone()).map_err(|e| {
            MalformedReason::InvalidProps {
                layer: id.to_string(),
                reason: e.to_string(),
            }
        })?;
        let mut layer = Layer::new(id.clone(), props);
        layer.locked = record.locked;
        layer.lock_hidden = record.lock_hidden;
        layer.parent = record.parent.clone();
        layer.children = record.child.clone();
        layers.insert(id.clone(), layer);
    }

    Ok(Page {
        layers,
        locked: page.locked,
        name: page.name.clone(),
        notes: page.notes.clone(),
    })
}

/// Serializes straight to a JSON value.
pub fn to_value(document: &Document) -> Value {
    serde_json::to_value(serialize(document)).unwrap_or(Value::Null)
}

/// Parses and validates a JSON value as a document.
pub fn from_value(value: Value) -> DocumentResult<Document> {
    let serialized: SerializedDocument = serde_json::from_value(value).map_err(|e| {
        MalformedDocumentError::document(MalformedReason::Json(e.to_string()))
    })?;
    deserialize(&serialized)
}
