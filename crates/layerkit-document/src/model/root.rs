use serde::{Deserialize, Serialize};

use super::media::ImageSource;
use super::props::PropsMap;
use super::{BoxSize, Point};

/// Props of a page's root layer: the page canvas itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootProps {
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    /// Background color as a CSS color string.
    pub color: String,
    /// Background image, drawn over the color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSource>,
    #[serde(flatten)]
    pub extra: PropsMap,
}

impl RootProps {
    pub fn new(width: f64, height: f64, color: impl Into<String>) -> Self {
        Self {
            box_size: BoxSize::new(width, height),
            position: Point::default(),
            rotation: 0.0,
            color: color.into(),
            image: None,
            extra: PropsMap::new(),
        }
    }
}
