//! Shared builders for the core tests.

use layerkit_document::{
    BoxSize, EditorSession, GroupProps, Layer, LayerId, Point, ShapeProps, TextProps,
};
use layerkit_settings::EditorSettings;

pub fn shape() -> ShapeProps {
    ShapeProps::new(
        BoxSize::new(120.0, 80.0),
        "M 0 0 L 256 0 L 256 256 L 0 256 Z",
        "rgb(255, 0, 0)",
    )
}

pub fn text(content: &str) -> TextProps {
    TextProps::new(BoxSize::new(300.0, 40.0), format!("<p>{}</p>", content))
}

pub fn group() -> GroupProps {
    GroupProps::new(BoxSize::new(400.0, 300.0), Point::new(20.0, 20.0))
}

pub fn layer(id: &str) -> Layer {
    Layer::new(LayerId::from(id), shape())
}

pub fn session() -> EditorSession {
    EditorSession::new(EditorSettings::default())
}

pub fn root() -> LayerId {
    LayerId::root()
}
