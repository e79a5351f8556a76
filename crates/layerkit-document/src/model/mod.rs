//! Layer data model.
//!
//! A [`Layer`] is one node of a page tree. Its kind is selected by the
//! [`LayerProps`] variant it carries; each kind has its own strongly typed
//! props struct, with an opaque escape hatch for kinds this crate does not
//! know about.

use serde::{Deserialize, Serialize};

mod group;
mod layer;
mod media;
mod props;
mod root;
mod shape;
mod text;

pub use group::{FrameProps, GroupProps};
pub use layer::{Layer, Privilege};
pub use media::{ImageProps, ImageSource, VideoProps, VideoSource};
pub use props::{LayerProps, PropsMap};
pub use root::RootProps;
pub use shape::{Border, ShapeProps};
pub use text::{FontRef, TextProps};

/// Position of a layer relative to its page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a layer's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The closed set of layer kinds, each interpreted by its own renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Root,
    Shape,
    Text,
    Image,
    Video,
    Group,
    Frame,
    /// A kind this version does not understand, kept verbatim.
    Unknown(String),
}

impl LayerKind {
    /// Name used in the serialized `type.resolvedName` field.
    pub fn resolved_name(&self) -> &str {
        match self {
            LayerKind::Root => "RootLayer",
            LayerKind::Shape => "ShapeLayer",
            LayerKind::Text => "TextLayer",
            LayerKind::Image => "ImageLayer",
            LayerKind::Video => "VideoLayer",
            LayerKind::Group => "GroupLayer",
            LayerKind::Frame => "FrameLayer",
            LayerKind::Unknown(name) => name,
        }
    }

    pub fn from_resolved_name(name: &str) -> Self {
        match name {
            "RootLayer" => LayerKind::Root,
            "ShapeLayer" => LayerKind::Shape,
            "TextLayer" => LayerKind::Text,
            "ImageLayer" => LayerKind::Image,
            "VideoLayer" => LayerKind::Video,
            "GroupLayer" => LayerKind::Group,
            "FrameLayer" => LayerKind::Frame,
            other => LayerKind::Unknown(other.to_string()),
        }
    }

    /// Whether layers of this kind may have children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            LayerKind::Root | LayerKind::Group | LayerKind::Frame | LayerKind::Unknown(_)
        )
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.resolved_name())
    }
}

pub(crate) fn default_scale() -> f64 {
    1.0
}
