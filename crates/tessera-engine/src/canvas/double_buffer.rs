use std::rc::Rc;

use crate::camera::Camera;
use crate::coords::{Point2D, Rectangle};
use crate::device::{Surface, SurfaceError};
use crate::host::{HostEvent, HostWidget};
use crate::paint::Color;
use crate::render::Renderer;
use crate::text::FontSystem;

use super::CanvasConfig;

/// Draw routine invoked on every redraw.
pub type DrawFn = Box<dyn FnMut(&mut Renderer<'_>)>;

/// Double-buffered drawing area bound to one host widget.
///
/// The canvas draws into an off-screen [`Surface`] it owns. A redraw always
/// runs the whole draw routine against the current surface before the widget
/// is asked to present it, so the widget never shows a half-drawn frame.
///
/// Lifecycle: created inert by a [`CanvasHost`](super::CanvasHost), bound to
/// a widget once the widget has a real size, then driven by [`HostEvent`]s.
/// A resize replaces the surface instead of mutating it.
pub struct Canvas {
    id: String,
    draw: DrawFn,
    camera: Camera,
    background: Color,
    raw_pixel_path: bool,

    fonts: Rc<FontSystem>,
    widget: Option<Rc<dyn HostWidget>>,

    surface: Option<Surface>,
    surface_generation: u64,
}

impl Canvas {
    pub(crate) fn new(config: CanvasConfig, draw: DrawFn, fonts: Rc<FontSystem>) -> Self {
        Self {
            id: config.id,
            draw,
            camera: Camera::new(config.world),
            background: config.background,
            raw_pixel_path: config.raw_pixel_path,
            fonts,
            widget: None,
            surface: None,
            surface_generation: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Surface width in pixels, `0` before initialization.
    pub fn width(&self) -> u32 {
        self.surface.as_ref().map_or(0, Surface::width)
    }

    /// Surface height in pixels, `0` before initialization.
    pub fn height(&self) -> u32 {
        self.surface.as_ref().map_or(0, Surface::height)
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access for panning and zooming. Changes show up on the
    /// next [`redraw`](Self::redraw).
    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// The current back buffer, `None` before initialization.
    #[inline]
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Number of surfaces allocated so far. Each resize bumps it by one.
    #[inline]
    pub fn surface_generation(&self) -> u64 {
        self.surface_generation
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// Binds the canvas to `widget`, allocates a surface of the widget's size
    /// and draws the first frame.
    ///
    /// A widget without area leaves the canvas without a surface until the
    /// first non-empty resize. Returns whether a surface was allocated.
    pub(crate) fn initialize(&mut self, widget: Rc<dyn HostWidget>) -> bool {
        let (width, height) = widget.pixel_size();
        self.widget = Some(widget);
        let allocated = self.resize(width, height);
        if allocated {
            log::info!("canvas {:?} initialized at {width}x{height}", self.id);
        } else {
            log::debug!("canvas {:?} bound to a widget without area; surface deferred", self.id);
        }
        allocated
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resized { width, height } => {
                self.resize(width, height);
            }
            HostEvent::RepaintRequested => self.present(),
        }
    }

    /// Clears the surface to the background and runs the draw routine.
    ///
    /// Does nothing before initialization.
    pub fn redraw(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            log::debug!("canvas {:?}: redraw before initialization ignored", self.id);
            return;
        };

        surface.clear(self.background);
        {
            let mut renderer = if self.raw_pixel_path {
                Renderer::new(&self.camera, surface, &self.fonts)
            } else {
                Renderer::vector_only(&self.camera, surface, &self.fonts)
            };
            (self.draw)(&mut renderer);
        }

        if let Some(widget) = &self.widget {
            widget.queue_draw();
        }
        log::debug!("canvas {:?} redrawn", self.id);
    }

    /// Renderer over the current surface, outside the redraw cycle.
    ///
    /// Meant for overlays drawn from an event handler. The renderer borrows
    /// the canvas, so it cannot outlive the surface it draws on. Call
    /// [`HostWidget::queue_draw`] (or redraw) afterwards to get the result on
    /// screen.
    pub fn create_temporary_renderer(&self) -> Option<Renderer<'_>> {
        let surface = self.surface.as_ref()?;
        Some(if self.raw_pixel_path {
            Renderer::new(&self.camera, surface, &self.fonts)
        } else {
            Renderer::vector_only(&self.camera, surface, &self.fonts)
        })
    }

    /// Replaces the surface and redraws. Returns `false`, keeping the old
    /// surface, when none can be allocated at this size.
    fn resize(&mut self, width: u32, height: u32) -> bool {
        let surface = match Surface::new(width, height) {
            Ok(surface) => surface,
            Err(SurfaceError::ZeroSize { .. }) => {
                log::debug!("canvas {:?}: ignoring {width}x{height} resize", self.id);
                return false;
            }
            Err(e) => {
                log::warn!("canvas {:?}: {e}", self.id);
                return false;
            }
        };

        // The previous surface is dropped here.
        self.surface = Some(surface);
        self.surface_generation += 1;
        self.camera.update_screen(Rectangle::new(
            Point2D::zero(),
            Point2D::new(width as f64, height as f64),
        ));
        log::info!("canvas {:?}: new {width}x{height} surface", self.id);

        self.redraw();
        true
    }

    fn present(&self) {
        match (&self.widget, &self.surface) {
            (Some(widget), Some(surface)) => widget.present(surface),
            _ => log::debug!("canvas {:?}: nothing to present", self.id),
        }
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("camera", &self.camera)
            .field("background", &self.background)
            .field("surface", &self.surface)
            .field("surface_generation", &self.surface_generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Default)]
    struct FakeWidget {
        size: Cell<(u32, u32)>,
        queued: Cell<u32>,
        presented: RefCell<Vec<(u32, u32)>>,
    }

    impl FakeWidget {
        fn sized(width: u32, height: u32) -> Rc<Self> {
            let widget = Self::default();
            widget.size.set((width, height));
            Rc::new(widget)
        }
    }

    impl HostWidget for FakeWidget {
        fn pixel_size(&self) -> (u32, u32) {
            self.size.get()
        }

        fn queue_draw(&self) {
            self.queued.set(self.queued.get() + 1);
        }

        fn present(&self, surface: &Surface) {
            self.presented.borrow_mut().push((surface.width(), surface.height()));
        }
    }

    fn counting_canvas(config: CanvasConfig) -> (Canvas, Rc<Cell<u32>>) {
        let redraws = Rc::new(Cell::new(0));
        let counter = redraws.clone();
        let draw: DrawFn = Box::new(move |_: &mut Renderer<'_>| counter.set(counter.get() + 1));
        (Canvas::new(config, draw, Rc::new(FontSystem::new())), redraws)
    }

    #[test]
    fn new_canvas_is_inert() {
        let (mut canvas, redraws) = counting_canvas(CanvasConfig::default());

        assert!(!canvas.is_initialized());
        assert_eq!((canvas.width(), canvas.height()), (0, 0));
        assert!(canvas.create_temporary_renderer().is_none());

        canvas.redraw();
        canvas.handle_event(HostEvent::RepaintRequested);
        assert_eq!(redraws.get(), 0);
    }

    #[test]
    fn initialize_sizes_surface_and_draws_once() {
        let (mut canvas, redraws) = counting_canvas(CanvasConfig::default());
        let widget = FakeWidget::sized(400, 400);

        canvas.initialize(widget.clone());

        assert_eq!((canvas.width(), canvas.height()), (400, 400));
        assert_eq!(
            canvas.camera().screen(),
            Rectangle::new(Point2D::zero(), Point2D::new(400.0, 400.0))
        );
        assert_eq!(canvas.surface_generation(), 1);
        assert_eq!(redraws.get(), 1);
        assert_eq!(widget.queued.get(), 1);
    }

    #[test]
    fn resize_replaces_surface_and_redraws_once() {
        let (mut canvas, redraws) = counting_canvas(CanvasConfig::default());
        let widget = FakeWidget::sized(400, 400);
        canvas.initialize(widget.clone());
        let generation = canvas.surface_generation();
        let before = redraws.get();

        canvas.handle_event(HostEvent::Resized {
            width: 800,
            height: 600,
        });

        assert_eq!(
            canvas.camera().screen(),
            Rectangle::new(Point2D::zero(), Point2D::new(800.0, 600.0))
        );
        assert_eq!(canvas.surface_generation(), generation + 1);
        assert_eq!(redraws.get(), before + 1);
        assert_eq!((canvas.width(), canvas.height()), (800, 600));
    }

    #[test]
    fn zero_size_resize_keeps_previous_surface() {
        let (mut canvas, redraws) = counting_canvas(CanvasConfig::default());
        assert!(canvas.initialize(FakeWidget::sized(400, 400)));

        canvas.handle_event(HostEvent::Resized {
            width: 0,
            height: 300,
        });

        assert_eq!(canvas.surface_generation(), 1);
        assert_eq!(redraws.get(), 1);
        assert_eq!(canvas.width(), 400);
    }

    #[test]
    fn hidden_widget_defers_first_surface() {
        let (mut canvas, redraws) = counting_canvas(CanvasConfig::default());
        assert!(!canvas.initialize(FakeWidget::sized(0, 0)));
        assert!(!canvas.is_initialized());
        assert_eq!(redraws.get(), 0);

        canvas.handle_event(HostEvent::Resized {
            width: 64,
            height: 48,
        });
        assert!(canvas.is_initialized());
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn repaint_presents_current_surface() {
        let (mut canvas, _) = counting_canvas(CanvasConfig::default());
        let widget = FakeWidget::sized(32, 16);
        canvas.initialize(widget.clone());

        canvas.handle_event(HostEvent::RepaintRequested);

        assert_eq!(*widget.presented.borrow(), vec![(32, 16)]);
    }

    #[test]
    fn redraw_clears_to_background_then_draws() {
        let config = CanvasConfig::default().with_background(Color::KHAKI);
        let draw: DrawFn = Box::new(|renderer: &mut Renderer<'_>| {
            renderer.set_coordinate_system(crate::render::CoordinateSystem::Screen);
            renderer.set_color(Color::BLACK);
            renderer.fill_rectangle(Point2D::new(0.0, 0.0), Point2D::new(4.0, 4.0));
        });
        let mut canvas = Canvas::new(config, draw, Rc::new(FontSystem::new()));
        canvas.initialize(FakeWidget::sized(10, 10));

        let surface = canvas.surface().unwrap();
        assert_eq!(surface.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(surface.pixel(8, 8), Some(Color::KHAKI));
    }

    #[test]
    fn draw_routine_sees_world_camera() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let world = Rectangle::new(Point2D::new(-10.0, -10.0), Point2D::new(10.0, 10.0));
        let draw: DrawFn = Box::new(move |renderer: &mut Renderer<'_>| {
            *sink.borrow_mut() = Some(renderer.camera().scale());
        });
        let config = CanvasConfig::new("scaled", world);
        let mut canvas = Canvas::new(config, draw, Rc::new(FontSystem::new()));

        canvas.initialize(FakeWidget::sized(200, 100));

        assert_eq!(*seen.borrow(), Some(Point2D::new(10.0, 5.0)));
    }

    #[test]
    fn temporary_renderer_draws_on_current_surface() {
        let (mut canvas, _) = counting_canvas(CanvasConfig::default().with_raw_pixel_path(false));
        canvas.initialize(FakeWidget::sized(20, 20));

        if let Some(mut overlay) = canvas.create_temporary_renderer() {
            overlay.set_coordinate_system(crate::render::CoordinateSystem::Screen);
            overlay.set_color(Color::RED);
            overlay.fill_rectangle(Point2D::new(0.0, 0.0), Point2D::new(20.0, 20.0));
        }

        assert_eq!(canvas.surface().unwrap().pixel(10, 10), Some(Color::RED));
    }

    #[test]
    fn camera_changes_apply_on_next_redraw() {
        let (mut canvas, redraws) = counting_canvas(CanvasConfig::default());
        canvas.initialize(FakeWidget::sized(100, 100));

        canvas.camera_mut().zoom(Point2D::new(500.0, 500.0), 2.0);
        canvas.redraw();

        assert_eq!(canvas.camera().scale(), Point2D::new(0.2, 0.2));
        assert_eq!(redraws.get(), 2);
        canvas.camera_mut().reset_world();
        assert_eq!(canvas.camera().world(), canvas.camera().initial_world());
    }
}
