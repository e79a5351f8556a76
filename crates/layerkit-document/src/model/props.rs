//! Kind-tagged layer props.
//!
//! Props travel as JSON objects (camelCase keys) in the serialized document and
//! in `set_props` patches, but are held in memory as one typed struct per
//! layer kind. Keys a struct does not know are kept in its `extra` map so a
//! load/save cycle never drops data.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::group::{FrameProps, GroupProps};
use super::media::{ImageProps, VideoProps};
use super::root::RootProps;
use super::shape::ShapeProps;
use super::text::TextProps;
use super::LayerKind;

/// Untyped props object, as found on the wire.
pub type PropsMap = serde_json::Map<String, Value>;

/// Props of a layer, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerProps {
    Root(RootProps),
    Shape(ShapeProps),
    Text(TextProps),
    Image(ImageProps),
    Video(VideoProps),
    Group(GroupProps),
    Frame(FrameProps),
    /// Props of a kind this version does not know, stored verbatim.
    Opaque {
        resolved_name: String,
        props: PropsMap,
    },
}

impl LayerProps {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerProps::Root(_) => LayerKind::Root,
            LayerProps::Shape(_) => LayerKind::Shape,
            LayerProps::Text(_) => LayerKind::Text,
            LayerProps::Image(_) => LayerKind::Image,
            LayerProps::Video(_) => LayerKind::Video,
            LayerProps::Group(_) => LayerKind::Group,
            LayerProps::Frame(_) => LayerKind::Frame,
            LayerProps::Opaque { resolved_name, .. } => {
                LayerKind::from_resolved_name(resolved_name)
            }
        }
    }

    /// Wire form of these props.
    pub fn to_map(&self) -> PropsMap {
        match self {
            LayerProps::Root(p) => to_object(p),
            LayerProps::Shape(p) => to_object(p),
            LayerProps::Text(p) => to_object(p),
            LayerProps::Image(p) => to_object(p),
            LayerProps::Video(p) => to_object(p),
            LayerProps::Group(p) => to_object(p),
            LayerProps::Frame(p) => to_object(p),
            LayerProps::Opaque { props, .. } => props.clone(),
        }
    }

    /// Parses a wire props object for the given kind.
    pub fn from_map(kind: &LayerKind, map: PropsMap) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            LayerKind::Root => LayerProps::Root(from_object(map)?),
            LayerKind::Shape => LayerProps::Shape(from_object(map)?),
            LayerKind::Text => LayerProps::Text(from_object(map)?),
            LayerKind::Image => LayerProps::Image(from_object(map)?),
            LayerKind::Video => LayerProps::Video(from_object(map)?),
            LayerKind::Group => LayerProps::Group(from_object(map)?),
            LayerKind::Frame => LayerProps::Frame(from_object(map)?),
            LayerKind::Unknown(name) => LayerProps::Opaque {
                resolved_name: name.clone(),
                props: map,
            },
        })
    }

    /// Parses opaque props that carry a known kind name into that kind's
    /// typed struct. Typed props and props of unknown kinds pass through.
    pub fn normalized(self) -> Result<Self, serde_json::Error> {
        match self {
            LayerProps::Opaque {
                resolved_name,
                props,
            } => Self::from_map(&LayerKind::from_resolved_name(&resolved_name), props),
            typed => Ok(typed),
        }
    }

    /// Returns these props with `patch` merged in.
    ///
    /// The merge is shallow: each top-level key of the patch replaces the
    /// existing value wholesale, nested objects included. The result is
    /// re-parsed for the layer's kind, so a patch that breaks the typed shape
    /// (wrong value type, a required key set to null) is an error.
    pub fn merged(&self, patch: &PropsMap) -> Result<Self, serde_json::Error> {
        let mut map = self.to_map();
        for (key, value) in patch {
            map.insert(key.clone(), value.clone());
        }
        Self::from_map(&self.kind(), map)
    }
}

impl From<RootProps> for LayerProps {
    fn from(props: RootProps) -> Self {
        LayerProps::Root(props)
    }
}

impl From<ShapeProps> for LayerProps {
    fn from(props: ShapeProps) -> Self {
        LayerProps::Shape(props)
    }
}

impl From<TextProps> for LayerProps {
    fn from(props: TextProps) -> Self {
        LayerProps::Text(props)
    }
}

impl From<ImageProps> for LayerProps {
    fn from(props: ImageProps) -> Self {
        LayerProps::Image(props)
    }
}

impl From<VideoProps> for LayerProps {
    fn from(props: VideoProps) -> Self {
        LayerProps::Video(props)
    }
}

impl From<GroupProps> for LayerProps {
    fn from(props: GroupProps) -> Self {
        LayerProps::Group(props)
    }
}

impl From<FrameProps> for LayerProps {
    fn from(props: FrameProps) -> Self {
        LayerProps::Frame(props)
    }
}

fn to_object<T: Serialize>(props: &T) -> PropsMap {
    match serde_json::to_value(props) {
        Ok(Value::Object(map)) => map,
        // Props structs only hold strings, numbers and nested objects.
        _ => PropsMap::new(),
    }
}

fn from_object<T: DeserializeOwned>(map: PropsMap) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(map))
}
