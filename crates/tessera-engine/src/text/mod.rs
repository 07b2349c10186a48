//! Font loading and text metrics.
//!
//! Fonts are registered under a family/slant/weight key and resolved from a
//! [`FontSpec`](crate::paint::FontSpec) at draw time. All measurements are in
//! device pixels with +Y down, matching the screen space backends draw in.

mod font_system;

pub use font_system::{FontExtents, FontId, FontLoadError, FontSystem, TextExtents};

/// Cantarell Regular (SIL Open Font License 1.1), for tests that need real
/// glyph outlines.
#[cfg(test)]
pub(crate) const TEST_FONT: &[u8] = include_bytes!("../../testdata/fonts/Cantarell-Regular.ttf");
