use crate::coords::{Point2D, Rectangle};
use crate::device::Surface;
use crate::paint::{Color, LineCap, LineStyle};

use super::clip::clip_line;
use super::{ArcPath, Backend, PaintMode};

/// Non-antialiased backend that writes opaque pixels straight into the
/// surface bytes.
///
/// Cheaper than [`SkiaBackend`](super::SkiaBackend) for large batches of
/// solid primitives. It ignores alpha; the renderer only routes opaque draws
/// here.
pub struct PixelBackend<'s> {
    surface: &'s Surface,
    color: [u8; 4],
    style: LineStyle,
}

impl<'s> PixelBackend<'s> {
    pub fn new(surface: &'s Surface) -> Self {
        Self {
            surface,
            color: Color::BLACK.premultiplied(),
            style: LineStyle::default(),
        }
    }

    fn with_raster<R>(&self, f: impl FnOnce(&mut Raster<'_>) -> R) -> R {
        let color = self.color;
        self.surface.with_pixmap_mut(|pixmap| {
            let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
            f(&mut Raster {
                data: pixmap.data_mut(),
                width,
                height,
                color,
            })
        })
    }
}

impl Backend for PixelBackend<'_> {
    fn supports_alpha(&self) -> bool {
        false
    }

    fn set_color(&mut self, color: Color) {
        self.color = color.with_alpha(u8::MAX).premultiplied();
    }

    fn set_line_style(&mut self, style: LineStyle) {
        self.style = style;
    }

    fn draw_line(&mut self, start: Point2D, end: Point2D) {
        let style = self.style;
        self.with_raster(|r| r.stroke_path(&[start, end], false, &style));
    }

    fn draw_rectangle(&mut self, start: Point2D, end: Point2D, mode: PaintMode) {
        let style = self.style;
        self.with_raster(|r| match mode {
            PaintMode::Fill => {
                let origin = Point2D::new(start.x.min(end.x), start.y.min(end.y));
                r.fill_rect(origin, (end.x - start.x).abs(), (end.y - start.y).abs());
            }
            PaintMode::Stroke => {
                let corners = [
                    start,
                    Point2D::new(end.x, start.y),
                    end,
                    Point2D::new(start.x, end.y),
                ];
                r.stroke_path(&corners, true, &style);
            }
        });
    }

    fn fill_polygon(&mut self, points: &[Point2D]) {
        self.with_raster(|r| r.fill_polygon(points));
    }

    fn draw_arc(&mut self, arc: ArcPath, mode: PaintMode) {
        let style = self.style;
        let points = arc.points();
        self.with_raster(|r| match mode {
            PaintMode::Stroke => r.stroke_path(&points, false, &style),
            PaintMode::Fill => {
                let mut slice = Vec::with_capacity(points.len() + 1);
                slice.push(arc.center);
                slice.extend_from_slice(&points);
                r.fill_polygon(&slice);
            }
        });
    }
}

/// Joins sharper than this ratio of miter length to stroke width are
/// bevelled.
const MITER_LIMIT: f64 = 4.0;

/// Position along an on/off dash pattern, carried from segment to segment.
struct DashCursor {
    on: f64,
    period: f64,
    travelled: f64,
}

impl DashCursor {
    fn new(style: &LineStyle) -> Option<Self> {
        let [on, off] = style.dash.pattern()?;
        Some(Self {
            on: on as f64,
            period: (on + off) as f64,
            travelled: 0.0,
        })
    }

    fn is_down(&self) -> bool {
        self.travelled.rem_euclid(self.period) < self.on
    }

    /// Splits `[0, length)` into the intervals where the pen is down and
    /// advances past them.
    fn pieces(&mut self, length: f64) -> Vec<(f64, f64)> {
        let mut pieces = Vec::new();
        let mut t = 0.0;
        while t < length {
            let phase = self.travelled.rem_euclid(self.period);
            let down = self.is_down();
            let step = if down { self.on - phase } else { self.period - phase };
            let end = (t + step).min(length);
            if down {
                pieces.push((t, end));
            }
            self.travelled += end - t;
            t = end;
        }
        pieces
    }
}

/// Mutable view of premultiplied RGBA8 pixels with a fixed write color.
///
/// Pixel `(x, y)` covers `[x, x + 1) × [y, y + 1)`; sampling happens at pixel
/// centres.
struct Raster<'p> {
    data: &'p mut [u8],
    width: i32,
    height: i32,
    color: [u8; 4],
}

impl Raster<'_> {
    #[inline]
    fn put(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&self.color);
    }

    /// Writes `[x0, x1)` on row `y`.
    fn span(&mut self, x0: i32, x1: i32, y: i32) {
        if y < 0 || y >= self.height {
            return;
        }
        let (x0, x1) = (x0.max(0), x1.min(self.width));
        if x0 >= x1 {
            return;
        }
        let row = y as usize * self.width as usize;
        for px in self.data[(row + x0 as usize) * 4..(row + x1 as usize) * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&self.color);
        }
    }

    /// Integer rectangle fill: origin and extent truncate independently.
    fn fill_rect(&mut self, origin: Point2D, width: f64, height: f64) {
        let (x0, y0) = (origin.x.trunc(), origin.y.trunc());
        let (x1, y1) = (x0 + width.trunc(), y0 + height.trunc());

        let column = |x: f64| x.clamp(0.0, self.width as f64) as i32;
        let row = |y: f64| y.clamp(0.0, self.height as f64) as i32;
        let (x0, x1) = (column(x0), column(x1));

        for y in row(y0)..row(y1) {
            self.span(x0, x1, y);
        }
    }

    /// Bresenham, both endpoints inclusive.
    fn line(&mut self, start: Point2D, end: Point2D) {
        let margin = Rectangle::new(
            Point2D::new(-1.0, -1.0),
            Point2D::new(self.width as f64 + 1.0, self.height as f64 + 1.0),
        );
        let Some((start, end)) = clip_line(start, end, &margin) else {
            return;
        };
        let (mut x0, mut y0) = (start.x.floor() as i32, start.y.floor() as i32);
        let (x1, y1) = (end.x.floor() as i32, end.y.floor() as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Even-odd scanline fill.
    fn fill_polygon(&mut self, points: &[Point2D]) {
        if points.len() < 3 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

        let first_row = ((min_y - 0.5).ceil() as i32).max(0);
        let end_row = ((max_y - 0.5).ceil() as i32).min(self.height);
        let mut crossings = Vec::new();

        for row in first_row..end_row {
            let sample = row as f64 + 0.5;
            crossings.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sample) != (b.y <= sample) {
                    crossings.push(a.x + (sample - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f64::total_cmp);

            for pair in crossings.chunks_exact(2) {
                let x0 = (pair[0] - 0.5).ceil() as i32;
                let x1 = (pair[1] - 0.5).ceil() as i32;
                self.span(x0, x1, row);
            }
        }
    }

    /// Strokes the polyline through `points`, back to the first point when
    /// `closed`.
    ///
    /// The dash pattern runs on across vertices. Wide strokes get miter
    /// joins wherever the pen stays down through a vertex and caps at every
    /// other end.
    fn stroke_path(&mut self, points: &[Point2D], closed: bool, style: &LineStyle) {
        let mut segments: Vec<(Point2D, Point2D)> =
            points.windows(2).map(|w| (w[0], w[1])).collect();
        if closed && points.len() > 2 {
            segments.push((points[points.len() - 1], points[0]));
        }
        segments.retain(|&(a, b)| a != b);

        let wide = style.width > 1.5;
        let half = style.width as f64 / 2.0;

        let Some(&(first, _)) = segments.first() else {
            // Zero-length stroke: a dot.
            if let Some(&p) = points.first() {
                if !wide {
                    self.line(p, p);
                } else if style.cap == LineCap::Round {
                    self.disc(p, half);
                }
            }
            return;
        };

        let mut dash = DashCursor::new(style);
        let count = segments.len();
        // Direction of the previous segment while the pen is down at its end.
        let mut pen_down: Option<Point2D> = None;
        // Whether the path's very first point still needs a cap.
        let mut open_start = false;

        for (i, &(a, b)) in segments.iter().enumerate() {
            let d = b - a;
            let length = d.x.hypot(d.y);
            let pieces = match dash.as_mut() {
                Some(dash) => dash.pieces(length),
                None => vec![(0.0, length)],
            };
            let last = i + 1 == count;
            let mut reaches_end = false;

            for &(t0, t1) in &pieces {
                let (p0, p1) = (a + d * (t0 / length), a + d * (t1 / length));
                if !wide {
                    self.line(p0, p1);
                    continue;
                }

                let n = Point2D::new(-d.y, d.x) * (half / length);
                self.fill_polygon(&[p0 + n, p1 + n, p1 - n, p0 - n]);

                if t0 == 0.0 {
                    match pen_down {
                        Some(incoming) => self.join(a, incoming, d, half),
                        None if i == 0 => open_start = true,
                        None => self.cap(p0, style),
                    }
                } else {
                    self.cap(p0, style);
                }

                if t1 < length {
                    self.cap(p1, style);
                } else {
                    reaches_end = true;
                }
            }

            if reaches_end && !dash.as_ref().is_none_or(DashCursor::is_down) {
                // The dash ends exactly on the vertex.
                self.cap(b, style);
                reaches_end = false;
            }
            pen_down = reaches_end.then_some(d);

            if last && reaches_end {
                if closed && open_start {
                    self.join(first, d, segments[0].1 - first, half);
                } else {
                    self.cap(b, style);
                }
            }
        }

        if open_start && !(closed && pen_down.is_some()) {
            self.cap(first, style);
        }
    }

    fn cap(&mut self, at: Point2D, style: &LineStyle) {
        if style.cap == LineCap::Round {
            self.disc(at, style.width as f64 / 2.0);
        }
    }

    /// Fills the outside wedge between two stroke bodies meeting at
    /// `vertex`.
    fn join(&mut self, vertex: Point2D, incoming: Point2D, outgoing: Point2D, half: f64) {
        let turn = incoming.x * outgoing.y - incoming.y * outgoing.x;
        if turn == 0.0 {
            return;
        }
        let side = if turn > 0.0 { -half } else { half };
        let o0 = Point2D::new(-incoming.y, incoming.x) * (side / incoming.x.hypot(incoming.y));
        let o1 = Point2D::new(-outgoing.y, outgoing.x) * (side / outgoing.x.hypot(outgoing.y));

        let bisector = o0 + o1;
        let spread = bisector.x.hypot(bisector.y);
        // cos of half the angle between the two offsets.
        let cos_half = spread / (2.0 * half);

        if cos_half * MITER_LIMIT < 1.0 {
            self.fill_polygon(&[vertex, vertex + o0, vertex + o1]);
        } else {
            let tip = vertex + bisector * (2.0 * half * half / (spread * spread));
            self.fill_polygon(&[vertex, vertex + o0, tip, vertex + o1]);
        }
    }

    fn disc(&mut self, centre: Point2D, radius: f64) {
        const SIDES: usize = 16;
        let outline: Vec<Point2D> = (0..SIDES)
            .map(|i| {
                let (sin, cos) = (i as f64 * std::f64::consts::TAU / SIDES as f64).sin_cos();
                centre + Point2D::new(cos, sin) * radius
            })
            .collect();
        self.fill_polygon(&outline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::LineDash;
    use crate::render::SkiaBackend;
    use crate::text::FontSystem;

    fn surface() -> Surface {
        let surface = Surface::new(40, 40).unwrap();
        surface.clear(Color::WHITE);
        surface
    }

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    fn black_pixels(surface: &Surface) -> usize {
        (0..surface.height())
            .flat_map(|y| (0..surface.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| surface.pixel(x, y) == Some(Color::BLACK))
            .count()
    }

    impl PixelBackend<'_> {
        /// Strokes an open polyline the way stroked arcs are drawn.
        fn draw_arc_points(&mut self, points: &[Point2D]) {
            let style = self.style;
            self.with_raster(|r| r.stroke_path(points, false, &style));
        }
    }

    #[test]
    fn ignores_alpha() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);
        assert!(!backend.supports_alpha());

        backend.set_color(Color::RED.with_alpha(10));
        backend.draw_rectangle(p(0.0, 0.0), p(5.0, 5.0), PaintMode::Fill);
        assert_eq!(surface.pixel(2, 2), Some(Color::RED));
    }

    #[test]
    fn fill_rectangle_truncates_like_integer_rects() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.draw_rectangle(p(12.0, 8.0), p(2.0, 3.0), PaintMode::Fill);

        assert_eq!(surface.pixel(2, 3), Some(Color::BLACK));
        assert_eq!(surface.pixel(11, 7), Some(Color::BLACK));
        assert_eq!(surface.pixel(12, 7), Some(Color::WHITE));
        assert_eq!(surface.pixel(11, 8), Some(Color::WHITE));
        assert_eq!(surface.pixel(1, 3), Some(Color::WHITE));
    }

    #[test]
    fn hairline_hits_both_endpoints() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.draw_line(p(1.0, 1.0), p(30.0, 10.0));

        assert_eq!(surface.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(surface.pixel(30, 10), Some(Color::BLACK));
        assert_eq!(surface.pixel(1, 10), Some(Color::WHITE));
    }

    #[test]
    fn lines_far_off_surface_are_clipped() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.draw_line(p(-1.0e9, 20.5), p(1.0e9, 20.5));

        assert_eq!(surface.pixel(0, 20), Some(Color::BLACK));
        assert_eq!(surface.pixel(39, 20), Some(Color::BLACK));
        assert_eq!(surface.pixel(20, 21), Some(Color::WHITE));
    }

    #[test]
    fn thick_line_covers_its_width() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.set_line_style(LineStyle {
            width: 6.0,
            ..LineStyle::default()
        });
        backend.draw_line(p(5.0, 20.0), p(35.0, 20.0));

        for y in 17..23 {
            assert_eq!(surface.pixel(20, y), Some(Color::BLACK), "row {y}");
        }
        assert_eq!(surface.pixel(20, 24), Some(Color::WHITE));
        // Butt caps stop at the endpoints.
        assert_eq!(surface.pixel(3, 20), Some(Color::WHITE));
    }

    #[test]
    fn dashed_line_has_gaps() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.set_line_style(LineStyle {
            dash: LineDash::Asymmetric5_3,
            ..LineStyle::default()
        });
        backend.draw_line(p(0.0, 5.0), p(39.0, 5.0));

        assert_eq!(surface.pixel(2, 5), Some(Color::BLACK));
        assert_eq!(surface.pixel(6, 5), Some(Color::WHITE));
        assert_eq!(surface.pixel(9, 5), Some(Color::BLACK));
    }

    #[test]
    fn dash_pattern_runs_on_across_vertices() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.set_line_style(LineStyle {
            dash: LineDash::Asymmetric5_3,
            ..LineStyle::default()
        });
        let steps: Vec<Point2D> = (0..20).map(|i| p(2.0 * i as f64, 5.0)).collect();
        backend.draw_arc_points(&steps);

        assert_eq!(surface.pixel(2, 5), Some(Color::BLACK));
        assert_eq!(surface.pixel(6, 5), Some(Color::WHITE));
        assert_eq!(surface.pixel(7, 5), Some(Color::WHITE));
        assert_eq!(surface.pixel(9, 5), Some(Color::BLACK));
    }

    #[test]
    fn dashed_arc_leaves_gaps() {
        let arc = ArcPath {
            center: p(20.5, 20.5),
            radius: 10.0,
            start_angle: 0.0,
            extent_angle: 360.0,
            stretch: 1.0,
        };
        let ink = |dash: LineDash| {
            let surface = surface();
            let mut backend = PixelBackend::new(&surface);
            backend.set_line_style(LineStyle {
                dash,
                ..LineStyle::default()
            });
            backend.draw_arc(arc, PaintMode::Stroke);
            black_pixels(&surface)
        };

        let solid = ink(LineDash::None);
        let dashed = ink(LineDash::Asymmetric5_3);
        assert!(dashed < solid, "dashed {dashed} vs solid {solid}");
        assert!(dashed > solid / 3, "dashed {dashed} vs solid {solid}");
    }

    #[test]
    fn wide_rectangle_has_mitred_corners() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.set_line_style(LineStyle {
            width: 6.0,
            ..LineStyle::default()
        });
        backend.draw_rectangle(p(10.0, 10.0), p(30.0, 30.0), PaintMode::Stroke);

        for (x, y) in [(8, 8), (7, 7), (31, 8), (31, 31), (8, 31)] {
            assert_eq!(surface.pixel(x, y), Some(Color::BLACK), "corner pixel ({x}, {y})");
        }
        assert_eq!(surface.pixel(6, 6), Some(Color::WHITE));
        assert_eq!(surface.pixel(20, 20), Some(Color::WHITE));
    }

    #[test]
    fn wide_rectangle_corners_match_vector_path() {
        let raw = surface();
        let vector = surface();
        let fonts = FontSystem::new();
        let style = LineStyle {
            width: 6.0,
            ..LineStyle::default()
        };

        let mut backend = PixelBackend::new(&raw);
        backend.set_line_style(style);
        backend.draw_rectangle(p(10.0, 10.0), p(30.0, 30.0), PaintMode::Stroke);

        let mut backend = SkiaBackend::new(&vector, &fonts);
        backend.set_line_style(style);
        backend.draw_rectangle(p(10.0, 10.0), p(30.0, 30.0), PaintMode::Stroke);

        for (x, y) in [(8, 8), (31, 8), (31, 31), (8, 31), (20, 20), (5, 5)] {
            assert_eq!(raw.pixel(x, y), vector.pixel(x, y), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn sharp_join_is_bevelled() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        // A near-reversal would mitre far past the vertex.
        backend.set_line_style(LineStyle {
            width: 4.0,
            ..LineStyle::default()
        });
        backend.draw_arc_points(&[p(5.0, 18.0), p(35.0, 20.0), p(5.0, 22.0)]);

        assert_eq!(surface.pixel(20, 20), Some(Color::BLACK));
        assert_eq!(surface.pixel(39, 20), Some(Color::WHITE));
    }

    #[test]
    fn enormous_fill_rectangle_covers_the_surface() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.draw_rectangle(p(-1.0e12, -1.0e12), p(1.0e12, 1.0e12), PaintMode::Fill);

        assert_eq!(black_pixels(&surface), 40 * 40);
    }

    #[test]
    fn polygon_fill_is_even_odd_inside_triangle() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        backend.fill_polygon(&[p(0.0, 0.0), p(30.0, 0.0), p(0.0, 30.0)]);

        assert_eq!(surface.pixel(5, 5), Some(Color::BLACK));
        assert_eq!(surface.pixel(25, 25), Some(Color::WHITE));
    }

    #[test]
    fn pie_fill_includes_centre_side() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        let arc = ArcPath {
            center: p(20.0, 20.0),
            radius: 15.0,
            start_angle: 0.0,
            extent_angle: 90.0,
            stretch: 1.0,
        };
        backend.draw_arc(arc, PaintMode::Fill);

        assert_eq!(surface.pixel(25, 15), Some(Color::BLACK));
        assert_eq!(surface.pixel(15, 15), Some(Color::WHITE));
        assert_eq!(surface.pixel(25, 25), Some(Color::WHITE));
    }

    #[test]
    fn stroked_arc_touches_its_ends() {
        let surface = surface();
        let mut backend = PixelBackend::new(&surface);

        let arc = ArcPath {
            center: p(20.5, 20.5),
            radius: 10.0,
            start_angle: 0.0,
            extent_angle: 180.0,
            stretch: 1.0,
        };
        backend.draw_arc(arc, PaintMode::Stroke);

        assert_eq!(surface.pixel(30, 20), Some(Color::BLACK));
        assert_eq!(surface.pixel(10, 20), Some(Color::BLACK));
        assert_eq!(surface.pixel(20, 10), Some(Color::BLACK));
        assert_eq!(surface.pixel(20, 30), Some(Color::WHITE));
    }
}
