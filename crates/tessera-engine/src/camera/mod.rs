//! World ↔ screen mapping.
//!
//! The camera is the single authority on how world coordinates land on the
//! device. Canvases update its screen rectangle on resize; callers pan/zoom by
//! updating its world rectangle. Renderers only read it.

mod transform;

pub use transform::Camera;
