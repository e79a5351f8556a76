use serde::{Deserialize, Serialize};

use super::props::PropsMap;
use super::{default_scale, BoxSize, Point};

/// Stroke drawn around a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub style: String,
    pub weight: f64,
    pub color: String,
}

/// Props of a vector shape layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeProps {
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// SVG path data clipping the fill, in the shape's own coordinate space.
    pub clip_path: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(flatten)]
    pub extra: PropsMap,
}

impl ShapeProps {
    pub fn new(box_size: BoxSize, clip_path: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            box_size,
            position: Point::default(),
            rotation: 0.0,
            scale: 1.0,
            clip_path: clip_path.into(),
            color: color.into(),
            transparency: None,
            border: None,
            extra: PropsMap::new(),
        }
    }
}
