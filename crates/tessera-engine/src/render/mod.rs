//! Drawing: the [`Renderer`] front end and the backends it dispatches to.
//!
//! Convention:
//! - Renderer input is in world units (+Y up) or screen pixels (+Y down),
//!   depending on its [`CoordinateSystem`].
//! - Backends only ever see screen pixels.

mod backend;
mod clip;
mod image;
mod pixel;
mod renderer;
mod vector;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{ArcPath, Backend, PaintMode, TransformGuard, VectorBackend};
pub use image::{ImageLoadError, RasterImage};
pub use pixel::PixelBackend;
pub use renderer::{CoordinateSystem, Renderer};
pub use vector::SkiaBackend;
