use serde::{Deserialize, Serialize};

use super::props::PropsMap;
use super::{default_scale, BoxSize, Point};

/// Reference to a font from the content catalog; stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Props of a rich-text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Rich text payload (HTML fragment produced by the text editor).
    pub text: String,
    #[serde(default)]
    pub fonts: Vec<FontRef>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub font_sizes: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    #[serde(flatten)]
    pub extra: PropsMap,
}

impl TextProps {
    pub fn new(box_size: BoxSize, text: impl Into<String>) -> Self {
        Self {
            box_size,
            position: Point::default(),
            rotation: 0.0,
            scale: 1.0,
            text: text.into(),
            fonts: Vec::new(),
            colors: Vec::new(),
            font_sizes: Vec::new(),
            transparency: None,
            extra: PropsMap::new(),
        }
    }
}
