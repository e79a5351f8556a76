use serde::{Deserialize, Serialize};

use super::props::PropsMap;
use super::{BoxSize, Point};

/// An image placed inside a layer's box (possibly cropped by it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotate: f64,
}

impl ImageSource {
    pub fn new(url: impl Into<String>, box_size: BoxSize) -> Self {
        Self {
            url: url.into(),
            thumb: None,
            box_size,
            position: Point::default(),
            rotate: 0.0,
        }
    }
}

/// A video clip placed inside a layer's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotate: f64,
    /// Trim start in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<f64>,
    /// Trim end in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<f64>,
}

/// Props of an image layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    pub image: ImageSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    #[serde(flatten)]
    pub extra: PropsMap,
}

impl ImageProps {
    pub fn new(box_size: BoxSize, image: ImageSource) -> Self {
        Self {
            box_size,
            position: Point::default(),
            rotation: 0.0,
            image,
            clip_path: None,
            transparency: None,
            extra: PropsMap::new(),
        }
    }
}

/// Props of a video layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProps {
    pub box_size: BoxSize,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub rotation: f64,
    pub video: VideoSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
    #[serde(flatten)]
    pub extra: PropsMap,
}
