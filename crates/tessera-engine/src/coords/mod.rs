//! Coordinate and geometry types shared by the camera, canvas and renderer.
//!
//! Two spaces are in play:
//! - World space: caller-defined units, +X right, +Y up
//! - Screen space: device pixels, origin top-left, +X right, +Y down
//!
//! The [`Camera`](crate::camera::Camera) owns the mapping between them.

mod point;
mod rectangle;

pub use point::Point2D;
pub use rectangle::Rectangle;
