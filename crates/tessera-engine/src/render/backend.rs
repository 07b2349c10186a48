use std::ops::{Deref, DerefMut};

use crate::coords::Point2D;
use crate::paint::{Color, FontSpec, LineStyle};
use crate::text::{FontExtents, TextExtents};

use super::RasterImage;

/// Whether a closed shape is outlined or filled.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PaintMode {
    Stroke,
    Fill,
}

/// Circular or elliptic arc in screen space.
///
/// Angles are in degrees, measured counter-clockwise (as seen on screen) from
/// the positive x axis. A non-negative `extent_angle` sweeps counter-clockwise,
/// a negative one clockwise.
///
/// The ellipse is a circle of `radius` stretched vertically by `stretch`: the
/// horizontal radius is `radius`, the vertical one `radius * stretch`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcPath {
    pub center: Point2D,
    pub radius: f64,
    pub start_angle: f64,
    pub extent_angle: f64,
    pub stretch: f64,
}

impl ArcPath {
    #[inline]
    pub fn is_circular(&self) -> bool {
        self.stretch == 1.0
    }

    #[inline]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.extent_angle
    }

    /// Point on the arc at `degrees`.
    #[inline]
    pub fn point_at(&self, degrees: f64) -> Point2D {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point2D::new(
            self.center.x + self.radius * cos,
            self.center.y - self.radius * self.stretch * sin,
        )
    }

    /// Polyline approximation from start to end angle, endpoints included.
    pub fn points(&self) -> Vec<Point2D> {
        let sweep = self.extent_angle.to_radians().abs();
        let radius = self.radius.abs().max((self.radius * self.stretch).abs());
        let steps = ((sweep * radius).sqrt() * 2.0).ceil().clamp(4.0, 720.0) as usize;

        (0..=steps)
            .map(|i| self.point_at(self.start_angle + self.extent_angle * i as f64 / steps as f64))
            .collect()
    }
}

/// Primitive drawing contract shared by every backend.
///
/// All coordinates are in screen space (device pixels, +Y down). Culling and
/// world transforms happen in the [`Renderer`](super::Renderer) before a
/// backend sees a call.
pub trait Backend {
    /// Whether translucent colors are blended. Backends that return `false`
    /// draw every color as opaque, so the renderer routes translucent draws
    /// elsewhere.
    fn supports_alpha(&self) -> bool;

    fn set_color(&mut self, color: Color);

    fn set_line_style(&mut self, style: LineStyle);

    fn draw_line(&mut self, start: Point2D, end: Point2D);

    /// Axis-aligned rectangle spanned by two opposite corners.
    fn draw_rectangle(&mut self, start: Point2D, end: Point2D, mode: PaintMode);

    fn fill_polygon(&mut self, points: &[Point2D]);

    /// Fills are pie slices: the outline runs through the centre.
    fn draw_arc(&mut self, arc: ArcPath, mode: PaintMode);
}

/// A backend that also supports transforms, text and images.
///
/// Every renderer has exactly one of these; it handles whatever the raw pixel
/// path cannot.
pub trait VectorBackend: Backend {
    fn set_font(&mut self, font: &FontSpec);

    /// Ink extents of `text` in the current font, `None` if no font resolves.
    fn text_extents(&mut self, text: &str) -> Option<TextExtents>;

    fn font_extents(&mut self) -> Option<FontExtents>;

    /// Pushes the current transform.
    fn save(&mut self);

    /// Pops the transform pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Rotates subsequent glyphs and images. Radians, y-down convention:
    /// positive turns clockwise on screen.
    fn rotate(&mut self, radians: f64);

    /// Draws `text` with its baseline origin at `origin`; the current
    /// transform orients the glyphs around that point.
    fn show_text(&mut self, origin: Point2D, text: &str);

    fn draw_image(&mut self, image: &RasterImage, top_left: Point2D);

    fn as_backend(&mut self) -> &mut dyn Backend;
}

/// Scoped transform: saves on creation, restores on drop.
///
/// Restoration happens on every exit path, early returns included.
pub struct TransformGuard<'g, 'b> {
    backend: &'g mut (dyn VectorBackend + 'b),
}

impl<'g, 'b> TransformGuard<'g, 'b> {
    pub fn new(backend: &'g mut (dyn VectorBackend + 'b)) -> Self {
        backend.save();
        Self { backend }
    }
}

impl<'b> Deref for TransformGuard<'_, 'b> {
    type Target = dyn VectorBackend + 'b;

    fn deref(&self) -> &Self::Target {
        &*self.backend
    }
}

impl DerefMut for TransformGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.backend
    }
}

impl Drop for TransformGuard<'_, '_> {
    fn drop(&mut self) {
        self.backend.restore();
    }
}
