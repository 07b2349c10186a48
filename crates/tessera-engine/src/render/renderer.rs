use std::path::Path;

use crate::camera::Camera;
use crate::coords::{Point2D, Rectangle};
use crate::device::Surface;
use crate::paint::{Color, FontSlant, FontSpec, FontWeight, LineCap, LineDash, LineStyle};
use crate::text::FontSystem;

use super::clip::{clip_line, clip_polygon};
use super::{
    ArcPath, Backend, PaintMode, PixelBackend, RasterImage, SkiaBackend, TransformGuard,
    VectorBackend,
};

/// Screen pixels kept around the camera's screen when clipping geometry.
/// Wider than any stroke, so clipped edges and caps stay off-screen.
const CLIP_MARGIN: f64 = 1024.0;

/// Which space drawing coordinates are interpreted in.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum CoordinateSystem {
    /// Camera world units, +Y up. Shapes outside the visible world are culled.
    #[default]
    World,
    /// Device pixels, +Y down. Nothing is culled.
    Screen,
}

/// Short-lived drawing context over one camera and one surface.
///
/// A renderer starts from default state (black, 1 px solid butt lines,
/// default font, no rotation, world coordinates); nothing carries over
/// between renderers.
///
/// Primitive calls go through one of two backends. Opaque lines,
/// rectangles, polygons and circular arcs take the raw pixel path when one is
/// present; translucent colors, text, images and stretched ellipses always
/// take the vector path.
pub struct Renderer<'a> {
    camera: &'a Camera,
    vector: Box<dyn VectorBackend + 'a>,
    raw: Option<Box<dyn Backend + 'a>>,

    coordinate_system: CoordinateSystem,
    color: Color,
    line_style: LineStyle,
    font: FontSpec,

    /// Text rotation in backend radians (clockwise positive on screen).
    rotation: f64,
}

impl<'a> Renderer<'a> {
    /// Renderer with both the vector and the raw pixel path over `surface`.
    pub fn new(camera: &'a Camera, surface: &'a Surface, fonts: &'a FontSystem) -> Self {
        Self::with_backends(
            camera,
            Box::new(SkiaBackend::new(surface, fonts)),
            Some(Box::new(PixelBackend::new(surface))),
        )
    }

    /// Renderer with only the anti-aliased vector path.
    ///
    /// Works over any surface, so snapshot and export code can render a scene
    /// at an arbitrary pixel size.
    pub fn vector_only(camera: &'a Camera, surface: &'a Surface, fonts: &'a FontSystem) -> Self {
        Self::with_backends(camera, Box::new(SkiaBackend::new(surface, fonts)), None)
    }

    pub fn with_backends(
        camera: &'a Camera,
        vector: Box<dyn VectorBackend + 'a>,
        raw: Option<Box<dyn Backend + 'a>>,
    ) -> Self {
        let mut renderer = Self {
            camera,
            vector,
            raw,
            coordinate_system: CoordinateSystem::default(),
            color: Color::default(),
            line_style: LineStyle::default(),
            font: FontSpec::default(),
            rotation: 0.0,
        };
        renderer.apply_color();
        renderer.apply_line_style();
        renderer.vector.set_font(&renderer.font);
        renderer
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        self.camera
    }

    // ── state ─────────────────────────────────────────────────────────────

    pub fn set_coordinate_system(&mut self, system: CoordinateSystem) {
        self.coordinate_system = system;
    }

    #[inline]
    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    /// The camera's world grown by the screen origin offset (in world units)
    /// on every side. World-mode shapes disjoint from it are culled.
    pub fn visible_world(&self) -> Rectangle {
        let world = self.camera.world();
        let margin = self.camera.screen().bottom_left() * self.camera.world_scale_factor();
        Rectangle::new(world.bottom_left() - margin, world.top_right() + margin)
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.apply_color();
    }

    pub fn set_color_with_alpha(&mut self, color: Color, alpha: u8) {
        self.set_color(color.with_alpha(alpha));
    }

    pub fn set_color_rgba(&mut self, red: u8, green: u8, blue: u8, alpha: u8) {
        self.set_color(Color::rgba(red, green, blue, alpha));
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_style.cap = cap;
        self.apply_line_style();
    }

    pub fn set_line_dash(&mut self, dash: LineDash) {
        self.line_style.dash = dash;
        self.apply_line_style();
    }

    /// Stroke width in device pixels. `0` draws the thinnest line the backend
    /// can produce.
    pub fn set_line_width(&mut self, width: f32) {
        self.line_style.width = width.max(0.0);
        self.apply_line_style();
    }

    #[inline]
    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    /// Font size in device pixels.
    pub fn set_font_size(&mut self, size: f32) {
        self.font.size = size;
        self.vector.set_font(&self.font);
    }

    pub fn format_font(&mut self, family: &str, slant: FontSlant, weight: FontWeight) {
        self.format_font_sized(family, slant, weight, self.font.size);
    }

    pub fn format_font_sized(
        &mut self,
        family: &str,
        slant: FontSlant,
        weight: FontWeight,
        size: f32,
    ) {
        self.font = FontSpec {
            family: family.to_string(),
            slant,
            weight,
            size,
        };
        self.vector.set_font(&self.font);
    }

    #[inline]
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Counter-clockwise text rotation in degrees.
    pub fn set_text_rotation(&mut self, degrees: f64) {
        self.rotation = -degrees.to_radians();
    }

    // ── lines and rectangles ──────────────────────────────────────────────

    pub fn draw_line(&mut self, start: Point2D, end: Point2D) {
        if self.rectangle_off_screen(&Rectangle::new(start, end)) {
            return;
        }
        let (start, end) = (self.to_screen(start), self.to_screen(end));
        let Some((start, end)) = self.clip_stroke(start, end) else {
            return;
        };
        self.primitive_backend().draw_line(start, end);
    }

    pub fn draw_rectangle(&mut self, start: Point2D, end: Point2D) {
        self.rectangle_path(start, end, PaintMode::Stroke);
    }

    pub fn draw_rectangle_size(&mut self, start: Point2D, width: f64, height: f64) {
        let end = Point2D::new(start.x + width, start.y + height);
        self.rectangle_path(start, end, PaintMode::Stroke);
    }

    pub fn draw_rect(&mut self, rect: Rectangle) {
        self.rectangle_path(rect.bottom_left(), rect.top_right(), PaintMode::Stroke);
    }

    pub fn fill_rectangle(&mut self, start: Point2D, end: Point2D) {
        self.rectangle_path(start, end, PaintMode::Fill);
    }

    pub fn fill_rectangle_size(&mut self, start: Point2D, width: f64, height: f64) {
        let end = Point2D::new(start.x + width, start.y + height);
        self.rectangle_path(start, end, PaintMode::Fill);
    }

    pub fn fill_rect(&mut self, rect: Rectangle) {
        self.rectangle_path(rect.bottom_left(), rect.top_right(), PaintMode::Fill);
    }

    fn rectangle_path(&mut self, start: Point2D, end: Point2D, mode: PaintMode) {
        if self.rectangle_off_screen(&Rectangle::new(start, end)) {
            return;
        }
        let bounds = self.device_bounds();
        let (start, end) = (self.to_screen(start), self.to_screen(end));
        if !bounds.intersects(&Rectangle::new(start, end)) {
            return;
        }

        let clamp = |p: Point2D| {
            Point2D::new(
                p.x.clamp(bounds.left(), bounds.right()),
                p.y.clamp(bounds.bottom(), bounds.top()),
            )
        };
        self.primitive_backend().draw_rectangle(clamp(start), clamp(end), mode);
    }

    // ── polygons ──────────────────────────────────────────────────────────

    /// Fills the polygon through `points` (closed implicitly).
    pub fn fill_poly(&mut self, points: &[Point2D]) {
        debug_assert!(
            points.len() >= 2,
            "fill_poly needs at least two points, got {}",
            points.len()
        );
        let Some((&first, _)) = points.split_first() else {
            return;
        };
        if points.len() < 2 {
            return;
        }

        let bounds = points.iter().fold(Rectangle::new(first, first), |acc, p| {
            Rectangle::new(
                Point2D::new(acc.left().min(p.x), acc.bottom().min(p.y)),
                Point2D::new(acc.right().max(p.x), acc.top().max(p.y)),
            )
        });
        if self.rectangle_off_screen(&bounds) {
            return;
        }

        let transformed: Vec<Point2D> = points.iter().map(|&p| self.to_screen(p)).collect();
        let clipped = clip_polygon(&transformed, &self.device_bounds());
        if clipped.len() < 2 {
            return;
        }
        self.primitive_backend().fill_polygon(&clipped);
    }

    // ── arcs ──────────────────────────────────────────────────────────────

    pub fn draw_arc(&mut self, center: Point2D, radius: f64, start_angle: f64, extent_angle: f64) {
        self.arc_path(center, radius, start_angle, extent_angle, 1.0, PaintMode::Stroke);
    }

    /// Pie slice from `center`.
    pub fn fill_arc(&mut self, center: Point2D, radius: f64, start_angle: f64, extent_angle: f64) {
        self.arc_path(center, radius, start_angle, extent_angle, 1.0, PaintMode::Fill);
    }

    pub fn draw_elliptic_arc(
        &mut self,
        center: Point2D,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        extent_angle: f64,
    ) {
        let stretch = radius_y / radius_x;
        self.arc_path(center, radius_x, start_angle, extent_angle, stretch, PaintMode::Stroke);
    }

    pub fn fill_elliptic_arc(
        &mut self,
        center: Point2D,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        extent_angle: f64,
    ) {
        let stretch = radius_y / radius_x;
        self.arc_path(center, radius_x, start_angle, extent_angle, stretch, PaintMode::Fill);
    }

    fn arc_path(
        &mut self,
        center: Point2D,
        radius: f64,
        start_angle: f64,
        extent_angle: f64,
        stretch: f64,
        mode: PaintMode,
    ) {
        debug_assert!(radius > 0.0, "arc radius must be positive, got {radius}");
        debug_assert!(stretch > 0.0, "arc stretch must be positive, got {stretch}");
        if !(radius > 0.0 && stretch > 0.0) {
            return;
        }

        let reach = Point2D::new(radius, radius * stretch);
        if self.rectangle_off_screen(&Rectangle::new(center - reach, center + reach)) {
            return;
        }

        let edge = self.to_screen(Point2D::new(center.x + radius, center.y));
        let center = self.to_screen(center);
        let arc = ArcPath {
            center,
            radius: edge.x - center.x,
            start_angle,
            extent_angle,
            stretch,
        };

        if arc.is_circular() {
            self.primitive_backend().draw_arc(arc, mode);
        } else {
            self.vector.draw_arc(arc, mode);
        }
    }

    // ── text ──────────────────────────────────────────────────────────────

    /// Draws `text` centred on `center` with no size limit.
    pub fn draw_text(&mut self, center: Point2D, text: &str) {
        self.draw_text_bounded(center, text, f64::MAX, f64::MAX);
    }

    /// Draws `text` centred on `center` unless it is wider than `bound_x` or
    /// taller than `bound_y`. Text is never clipped; it is drawn whole or not
    /// at all.
    pub fn draw_text_bounded(&mut self, center: Point2D, text: &str, bound_x: f64, bound_y: f64) {
        let corner = Point2D::new(center.x - bound_x / 2.0, center.y - bound_y / 2.0);
        if self.rectangle_off_screen(&Rectangle::from_size(corner, bound_x, bound_y)) {
            return;
        }

        let (Some(text_extents), Some(font_extents)) =
            (self.vector.text_extents(text), self.vector.font_extents())
        else {
            log::debug!("no font resolves for {:?}; skipping text {text:?}", self.font.family);
            return;
        };

        let (width, height) = (text_extents.width, text_extents.height);
        let (scaled_width, scaled_height) = match self.coordinate_system {
            CoordinateSystem::World => {
                let factor = self.camera.world_scale_factor();
                (width * factor.x, height * factor.y)
            }
            CoordinateSystem::Screen => (width, height),
        };
        // Rotation is not taken into account.
        if scaled_width > bound_x || scaled_height > bound_y {
            return;
        }

        let center = self.to_screen(center);
        let (sin, cos) = self.rotation.sin_cos();
        // Offsets from the ink centre to the baseline origin, before rotation.
        let along = text_extents.x_bearing + width / 2.0;
        let across_x = -font_extents.descent + height / 2.0;
        let across_y = text_extents.y_bearing + height / 2.0;
        let origin = Point2D::new(
            center.x - along * cos - across_x * sin,
            center.y - across_y * cos - along * sin,
        );

        let rotation = self.rotation;
        let mut guard = TransformGuard::new(&mut *self.vector);
        guard.rotate(rotation);
        guard.show_text(origin, text);
    }

    /// Draws `text` centred on `center`, limited to the largest box centred
    /// there that fits inside `bounds`.
    pub fn draw_text_in(&mut self, center: Point2D, text: &str, bounds: &Rectangle) {
        let below = center - bounds.bottom_left();
        let above = bounds.top_right() - center;
        let bound_x = below.x.min(above.x) * 2.0;
        let bound_y = below.y.min(above.y) * 2.0;
        self.draw_text_bounded(center, text, bound_x, bound_y);
    }

    // ── images ────────────────────────────────────────────────────────────

    /// Loads and draws a PNG, JPEG or BMP file. Unreadable files are skipped.
    pub fn draw_png(&mut self, path: impl AsRef<Path>, top_left: Point2D) {
        match RasterImage::load(path) {
            Ok(image) => self.draw_image(&image, top_left),
            Err(e) => log::debug!("skipping image: {e}"),
        }
    }

    /// Draws `image` at its native pixel size with its top-left corner at
    /// `top_left`.
    pub fn draw_image(&mut self, image: &RasterImage, top_left: Point2D) {
        let (mut width, mut height) = (image.width() as f64, image.height() as f64);
        if self.coordinate_system == CoordinateSystem::World {
            let factor = self.camera.world_scale_factor();
            width *= factor.x;
            height *= factor.y;
        }

        let bottom_left = Point2D::new(top_left.x, top_left.y - height);
        if self.rectangle_off_screen(&Rectangle::from_size(bottom_left, width, height)) {
            return;
        }

        let top_left = self.to_screen(top_left);
        self.vector.draw_image(image, top_left);
    }

    // ── dispatch ──────────────────────────────────────────────────────────

    fn rectangle_off_screen(&self, rect: &Rectangle) -> bool {
        if self.coordinate_system == CoordinateSystem::Screen {
            return false;
        }
        !self.visible_world().intersects(rect)
    }

    /// Screen-space box geometry is clipped to before it reaches a backend.
    fn device_bounds(&self) -> Rectangle {
        let screen = self.camera.screen();
        let margin = CLIP_MARGIN + self.line_style.width as f64;
        Rectangle::new(
            Point2D::new(screen.left().min(0.0) - margin, screen.bottom().min(0.0) - margin),
            Point2D::new(screen.right() + margin, screen.top() + margin),
        )
    }

    /// Clips a screen-space segment, moving a trimmed start back to a whole
    /// number of dash periods from the original one.
    fn clip_stroke(&self, start: Point2D, end: Point2D) -> Option<(Point2D, Point2D)> {
        let (clipped, end) = clip_line(start, end, &self.device_bounds())?;
        let Some([on, off]) = self.line_style.dash.pattern() else {
            return Some((clipped, end));
        };

        let trimmed = clipped - start;
        let length = trimmed.x.hypot(trimmed.y);
        if length == 0.0 {
            return Some((clipped, end));
        }
        let period = (on + off) as f64;
        let kept = (length / period).floor() * period;
        Some((start + trimmed * (kept / length), end))
    }

    fn to_screen(&self, point: Point2D) -> Point2D {
        match self.coordinate_system {
            CoordinateSystem::World => self.camera.world_to_screen(point),
            CoordinateSystem::Screen => point,
        }
    }

    /// Backend for a line, rectangle, polygon or circular arc in the current
    /// color.
    fn primitive_backend(&mut self) -> &mut dyn Backend {
        let opaque = self.color.is_opaque();
        if let Some(raw) = self.raw.as_deref_mut() {
            if opaque || raw.supports_alpha() {
                return raw;
            }
        }
        self.vector.as_backend()
    }

    fn apply_color(&mut self) {
        self.vector.set_color(self.color);
        if let Some(raw) = self.raw.as_deref_mut() {
            raw.set_color(self.color);
        }
    }

    fn apply_line_style(&mut self) {
        self.vector.set_line_style(self.line_style);
        if let Some(raw) = self.raw.as_deref_mut() {
            raw.set_line_style(self.line_style);
        }
    }
}
