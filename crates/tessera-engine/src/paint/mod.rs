//! Paint model shared by the renderer and its backends.
//!
//! Scope:
//! - color representation (straight-alpha RGBA8)
//! - stroke style (width, cap, dash)
//! - font selection (family, slant, weight, size)
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod style;

pub use color::Color;
pub use style::{FontSlant, FontSpec, FontWeight, LineCap, LineDash, LineStyle};
