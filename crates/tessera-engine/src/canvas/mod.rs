//! Canvases: off-screen surfaces redrawn by a user draw routine and shown
//! on a host widget.

mod config;
mod double_buffer;
mod registry;

pub use config::CanvasConfig;
pub use double_buffer::{Canvas, DrawFn};
pub use registry::{CanvasError, CanvasHost};
