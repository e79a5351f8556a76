use serde::{Deserialize, Serialize};

use super::media::ImageSource;
use super::props::PropsMap;
use super::{default_scale, BoxSize, Point};

/// Props of a group layer; its children are positioned relative to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProps {
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(flatten)]
    pub extra: PropsMap,
}

impl GroupProps {
    pub fn new(box_size: BoxSize, position: Point) -> Self {
        Self {
            box_size,
            position,
            rotation: 0.0,
            scale: 1.0,
            extra: PropsMap::new(),
        }
    }
}

/// Props of a frame layer: a clip path that an image can be dropped into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameProps {
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    pub clip_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSource>,
    #[serde(flatten)]
    pub extra: PropsMap,
}
