use crate::coords::{Point2D, Rectangle};
use crate::paint::Color;

/// Canvas creation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Identity token; unique within a [`CanvasHost`](super::CanvasHost).
    pub id: String,
    /// Initial world rectangle shown by the canvas camera.
    pub world: Rectangle,
    /// Color every redraw starts from.
    pub background: Color,
    /// Route opaque primitives through the raw pixel backend.
    pub raw_pixel_path: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            id: "MainCanvas".to_string(),
            world: Rectangle::new(Point2D::zero(), Point2D::new(1000.0, 1000.0)),
            background: Color::WHITE,
            raw_pixel_path: true,
        }
    }
}

impl CanvasConfig {
    pub fn new(id: impl Into<String>, world: Rectangle) -> Self {
        Self {
            id: id.into(),
            world,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_raw_pixel_path(mut self, enabled: bool) -> Self {
        self.raw_pixel_path = enabled;
        self
    }
}
