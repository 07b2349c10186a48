//! Recording backend for dispatch tests, plus helpers for tests that
//! rasterize real text.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{Point2D, Rectangle};
use crate::device::Surface;
use crate::paint::{Color, FontSlant, FontSpec, FontWeight, LineStyle};
use crate::text::{FontExtents, FontSystem, TextExtents, TEST_FONT};

use super::{ArcPath, Backend, PaintMode, RasterImage, VectorBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Color(Color),
    LineStyle(LineStyle),
    Font(FontSpec),
    Line(Point2D, Point2D),
    Rectangle(Point2D, Point2D, PaintMode),
    Polygon(Vec<Point2D>),
    Arc(ArcPath, PaintMode),
    Save,
    Restore,
    Rotate(f64),
    Text(Point2D, String),
    Image(Point2D),
}

impl Call {
    fn is_state(&self) -> bool {
        matches!(self, Call::Color(_) | Call::LineStyle(_) | Call::Font(_))
    }
}

/// Shared, ordered log of calls from every recording backend of a renderer.
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<(&'static str, Call)>>>);

impl CallLog {
    fn push(&self, backend: &'static str, call: Call) {
        self.0.borrow_mut().push((backend, call));
    }

    /// Every call `backend` received, state changes included.
    pub fn calls(&self, backend: &str) -> Vec<Call> {
        self.0.borrow().iter().filter(|(b, _)| *b == backend).map(|(_, c)| c.clone()).collect()
    }

    /// Calls `backend` received, minus color/line/font state changes.
    pub fn draws(&self, backend: &str) -> Vec<Call> {
        self.calls(backend).into_iter().filter(|c| !c.is_state()).collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub struct RecordingBackend {
    name: &'static str,
    log: CallLog,
    alpha: bool,
    text: Option<TextExtents>,
    font: Option<FontExtents>,
}

impl RecordingBackend {
    /// Alpha-capable backend logged as `"vector"`. Has no font until
    /// [`with_text_extents`](Self::with_text_extents) is called.
    pub fn vector(log: &CallLog) -> Self {
        Self {
            name: "vector",
            log: log.clone(),
            alpha: true,
            text: None,
            font: None,
        }
    }

    /// Opaque-only backend logged as `"raw"`.
    pub fn raw(log: &CallLog) -> Self {
        Self {
            name: "raw",
            log: log.clone(),
            alpha: false,
            text: None,
            font: None,
        }
    }

    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    /// Every string measures as `text`; the font descends `descent` px.
    pub fn with_text_extents(mut self, text: TextExtents, descent: f64) -> Self {
        self.text = Some(text);
        self.font = Some(FontExtents {
            ascent: text.height - descent,
            descent,
            height: text.height,
        });
        self
    }

    fn record(&self, call: Call) {
        self.log.push(self.name, call);
    }
}

impl Backend for RecordingBackend {
    fn supports_alpha(&self) -> bool {
        self.alpha
    }

    fn set_color(&mut self, color: Color) {
        self.record(Call::Color(color));
    }

    fn set_line_style(&mut self, style: LineStyle) {
        self.record(Call::LineStyle(style));
    }

    fn draw_line(&mut self, start: Point2D, end: Point2D) {
        self.record(Call::Line(start, end));
    }

    fn draw_rectangle(&mut self, start: Point2D, end: Point2D, mode: PaintMode) {
        self.record(Call::Rectangle(start, end, mode));
    }

    fn fill_polygon(&mut self, points: &[Point2D]) {
        self.record(Call::Polygon(points.to_vec()));
    }

    fn draw_arc(&mut self, arc: ArcPath, mode: PaintMode) {
        self.record(Call::Arc(arc, mode));
    }
}

impl VectorBackend for RecordingBackend {
    fn set_font(&mut self, font: &FontSpec) {
        self.record(Call::Font(font.clone()));
    }

    fn text_extents(&mut self, _text: &str) -> Option<TextExtents> {
        self.text
    }

    fn font_extents(&mut self) -> Option<FontExtents> {
        self.font
    }

    fn save(&mut self) {
        self.record(Call::Save);
    }

    fn restore(&mut self) {
        self.record(Call::Restore);
    }

    fn rotate(&mut self, radians: f64) {
        self.record(Call::Rotate(radians));
    }

    fn show_text(&mut self, origin: Point2D, text: &str) {
        self.record(Call::Text(origin, text.to_string()));
    }

    fn draw_image(&mut self, _image: &RasterImage, top_left: Point2D) {
        self.record(Call::Image(top_left));
    }

    fn as_backend(&mut self) -> &mut dyn Backend {
        self
    }
}

/// Font system with the bundled test font loaded as "sans-serif".
pub fn test_fonts() -> FontSystem {
    let mut fonts = FontSystem::new();
    fonts
        .load_font("sans-serif", FontSlant::Normal, FontWeight::Normal, TEST_FONT)
        .unwrap();
    fonts
}

/// Bounding box of every pixel that differs from `background`, in pixel
/// coordinates with exclusive right/bottom edges.
pub fn ink_bounds(surface: &Surface, background: Color) -> Option<Rectangle> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if surface.pixel(x, y) == Some(background) {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds.map(|(x0, y0, x1, y1)| {
        Rectangle::new(
            Point2D::new(x0 as f64, y0 as f64),
            Point2D::new(x1 as f64 + 1.0, y1 as f64 + 1.0),
        )
    })
}
