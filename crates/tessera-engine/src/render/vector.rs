use std::f64::consts::FRAC_PI_2;

use tiny_skia::{
    FillRule, FilterQuality, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash,
    Transform,
};

use crate::coords::Point2D;
use crate::device::Surface;
use crate::paint::{Color, FontSpec, LineCap, LineStyle};
use crate::text::{FontExtents, FontId, FontSystem, TextExtents};

use super::{ArcPath, Backend, PaintMode, RasterImage, VectorBackend};

/// Anti-aliased, alpha-blending backend built on `tiny-skia`.
///
/// Handles every primitive, plus transforms, text and images.
pub struct SkiaBackend<'s> {
    surface: &'s Surface,
    fonts: &'s FontSystem,

    color: Color,
    paint: Paint<'static>,
    stroke: Stroke,

    font: FontSpec,
    font_id: Option<FontId>,

    transform: Transform,
    saved: Vec<Transform>,
}

impl<'s> SkiaBackend<'s> {
    pub fn new(surface: &'s Surface, fonts: &'s FontSystem) -> Self {
        let mut backend = Self {
            surface,
            fonts,
            color: Color::BLACK,
            paint: Paint::default(),
            stroke: Stroke::default(),
            font: FontSpec::default(),
            font_id: None,
            transform: Transform::identity(),
            saved: Vec::new(),
        };
        backend.set_color(Color::BLACK);
        backend.set_line_style(LineStyle::default());
        backend.font_id = fonts.resolve(&backend.font);
        backend
    }

    fn paint_path(&self, path: &Path, mode: PaintMode) {
        let (paint, transform) = (&self.paint, self.transform);
        self.surface.with_pixmap_mut(|pixmap| match mode {
            PaintMode::Fill => pixmap.fill_path(path, paint, FillRule::Winding, transform, None),
            PaintMode::Stroke => pixmap.stroke_path(path, paint, &self.stroke, transform, None),
        });
    }
}

impl Backend for SkiaBackend<'_> {
    fn supports_alpha(&self) -> bool {
        true
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
        self.paint.set_color(color.to_skia());
    }

    fn set_line_style(&mut self, style: LineStyle) {
        self.stroke.width = style.width;
        self.stroke.line_cap = match style.cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
        };
        self.stroke.dash = style.dash.pattern().and_then(|p| StrokeDash::new(p.to_vec(), 0.0));
    }

    fn draw_line(&mut self, start: Point2D, end: Point2D) {
        let mut pb = PathBuilder::new();
        pb.move_to(start.x as f32, start.y as f32);
        pb.line_to(end.x as f32, end.y as f32);
        if let Some(path) = pb.finish() {
            self.paint_path(&path, PaintMode::Stroke);
        }
    }

    fn draw_rectangle(&mut self, start: Point2D, end: Point2D, mode: PaintMode) {
        let corners = [start, Point2D::new(end.x, start.y), end, Point2D::new(start.x, end.y)];
        if let Some(path) = polygon_path(&corners) {
            self.paint_path(&path, mode);
        }
    }

    fn fill_polygon(&mut self, points: &[Point2D]) {
        if let Some(path) = polygon_path(points) {
            self.paint_path(&path, PaintMode::Fill);
        }
    }

    fn draw_arc(&mut self, arc: ArcPath, mode: PaintMode) {
        if let Some(path) = arc_path(&arc, mode) {
            self.paint_path(&path, mode);
        }
    }
}

impl VectorBackend for SkiaBackend<'_> {
    fn set_font(&mut self, font: &FontSpec) {
        self.font = font.clone();
        self.font_id = self.fonts.resolve(font);
        if self.font_id.is_none() {
            log::debug!("no font loaded for {:?}; text will be skipped", font.family);
        }
    }

    fn text_extents(&mut self, text: &str) -> Option<TextExtents> {
        let id = self.font_id?;
        Some(self.fonts.text_extents(text, id, self.font.size))
    }

    fn font_extents(&mut self) -> Option<FontExtents> {
        let id = self.font_id?;
        Some(self.fonts.font_extents(id, self.font.size))
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn restore(&mut self) {
        match self.saved.pop() {
            Some(transform) => self.transform = transform,
            None => log::warn!("SkiaBackend::restore without a matching save"),
        }
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.pre_rotate(radians.to_degrees() as f32);
    }

    fn show_text(&mut self, origin: Point2D, text: &str) {
        let Some(id) = self.font_id else {
            return;
        };
        let Some(font) = self.fonts.get(id) else {
            return;
        };

        let size = self.font.size;
        let t = self.transform;
        // Glyphs hang off the device-space origin; only the linear part of the
        // transform orients them.
        let base = Transform::from_translate(origin.x as f32, origin.y as f32)
            .pre_concat(Transform::from_row(t.sx, t.ky, t.kx, t.sy, 0.0, 0.0));
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        let glyphs = self.fonts.glyph_run(text, id, size);
        self.surface.with_pixmap_mut(|pixmap| {
            for glyph in glyphs.iter().filter(|g| g.metrics.width > 0 && g.metrics.height > 0) {
                let (metrics, coverage) = font.rasterize(glyph.ch, size);
                let Some(mask) = glyph_pixmap(&coverage, metrics.width, metrics.height, self.color)
                else {
                    continue;
                };
                let x = (glyph.pen_x + metrics.xmin as f32).round() as i32;
                let y = -(metrics.ymin + metrics.height as i32);
                pixmap.draw_pixmap(x, y, mask.as_ref(), &paint, base, None);
            }
        });
    }

    fn draw_image(&mut self, image: &RasterImage, top_left: Point2D) {
        let (x, y) = (top_left.x.round() as i32, top_left.y.round() as i32);
        self.surface.with_pixmap_mut(|pixmap| {
            let paint = PixmapPaint::default();
            pixmap.draw_pixmap(x, y, image.pixmap().as_ref(), &paint, self.transform, None);
        });
    }

    fn as_backend(&mut self) -> &mut dyn Backend {
        self
    }
}

fn polygon_path(points: &[Point2D]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

/// Builds the arc as a circle of radius `r * stretch` around
/// `(cx * stretch, cy)`, then squeezes x by `1 / stretch`.
fn arc_path(arc: &ArcPath, mode: PaintMode) -> Option<Path> {
    let s = arc.stretch;
    let (cx, cy) = (arc.center.x * s, arc.center.y);
    let r = arc.radius * s;

    // Screen y points down, so counter-clockwise angles are negated.
    let a0 = -arc.start_angle.to_radians();
    let sweep = -arc.extent_angle.to_radians();
    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let delta = sweep / segments as f64;
    let k = 4.0 / 3.0 * (delta / 4.0).tan();

    let at = |a: f64| (cx + r * a.cos(), cy + r * a.sin());
    let mut pb = PathBuilder::new();

    let (x0, y0) = at(a0);
    if mode == PaintMode::Fill {
        pb.move_to(cx as f32, cy as f32);
        pb.line_to(x0 as f32, y0 as f32);
    } else {
        pb.move_to(x0 as f32, y0 as f32);
    }

    let mut a = a0;
    for _ in 0..segments {
        let b = a + delta;
        let (ax, ay) = at(a);
        let (bx, by) = at(b);
        pb.cubic_to(
            (ax - k * r * a.sin()) as f32,
            (ay + k * r * a.cos()) as f32,
            (bx + k * r * b.sin()) as f32,
            (by - k * r * b.cos()) as f32,
            bx as f32,
            by as f32,
        );
        a = b;
    }

    if mode == PaintMode::Fill {
        pb.close();
    }

    pb.finish()?.transform(Transform::from_scale((1.0 / s) as f32, 1.0))
}

/// Colors a coverage mask into a premultiplied pixmap.
fn glyph_pixmap(coverage: &[u8], width: usize, height: usize, color: Color) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width as u32, height as u32)?;
    for (px, &c) in pixmap.data_mut().chunks_exact_mut(4).zip(coverage) {
        let alpha = (color.alpha as u16 * c as u16 + 127) / 255;
        px.copy_from_slice(&color.with_alpha(alpha as u8).premultiplied());
    }
    Some(pixmap)
}
