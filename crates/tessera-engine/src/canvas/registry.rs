use std::fmt;
use std::rc::Rc;

use crate::host::{HostEvent, HostWidget};
use crate::render::Renderer;
use crate::text::FontSystem;

use super::{Canvas, CanvasConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// No canvas with this id exists.
    UnknownCanvas(String),
    /// A canvas with this id already exists.
    DuplicateCanvas(String),
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::UnknownCanvas(id) => write!(f, "no canvas named {id:?}"),
            CanvasError::DuplicateCanvas(id) => write!(f, "a canvas named {id:?} already exists"),
        }
    }
}

impl std::error::Error for CanvasError {}

/// Owns every canvas of an application and the fonts they share.
///
/// Canvases can only be created here. The host binds each one to a widget
/// with [`initialize_canvas`](Self::initialize_canvas) once the widget is
/// shown, then routes widget events with [`dispatch`](Self::dispatch).
pub struct CanvasHost {
    fonts: Rc<FontSystem>,
    canvases: Vec<Canvas>,
}

impl CanvasHost {
    /// Host over an already-populated font system.
    pub fn new(fonts: FontSystem) -> Self {
        Self {
            fonts: Rc::new(fonts),
            canvases: Vec::new(),
        }
    }

    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    /// Creates an inert canvas that will call `draw` on every redraw.
    pub fn add_canvas<F>(
        &mut self,
        config: CanvasConfig,
        draw: F,
    ) -> Result<&mut Canvas, CanvasError>
    where
        F: FnMut(&mut Renderer<'_>) + 'static,
    {
        if self.canvas(&config.id).is_some() {
            return Err(CanvasError::DuplicateCanvas(config.id));
        }

        log::debug!("adding canvas {:?}", config.id);
        let index = self.canvases.len();
        self.canvases.push(Canvas::new(config, Box::new(draw), self.fonts.clone()));
        Ok(&mut self.canvases[index])
    }

    pub fn canvas(&self, id: &str) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.id() == id)
    }

    pub fn canvas_mut(&mut self, id: &str) -> Option<&mut Canvas> {
        self.canvases.iter_mut().find(|c| c.id() == id)
    }

    pub fn canvases(&self) -> impl Iterator<Item = &Canvas> {
        self.canvases.iter()
    }

    /// Binds canvas `id` to `widget` and draws its first frame.
    pub fn initialize_canvas(
        &mut self,
        id: &str,
        widget: Rc<dyn HostWidget>,
    ) -> Result<(), CanvasError> {
        self.require_mut(id)?.initialize(widget);
        Ok(())
    }

    /// Forwards a widget event to canvas `id`.
    pub fn dispatch(&mut self, id: &str, event: HostEvent) -> Result<(), CanvasError> {
        self.require_mut(id)?.handle_event(event);
        Ok(())
    }

    /// Redraws every initialized canvas.
    pub fn redraw_all(&mut self) {
        for canvas in self.canvases.iter_mut().filter(|c| c.is_initialized()) {
            canvas.redraw();
        }
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Canvas, CanvasError> {
        self.canvas_mut(id).ok_or_else(|| CanvasError::UnknownCanvas(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::device::Surface;

    struct StaticWidget((u32, u32));

    impl HostWidget for StaticWidget {
        fn pixel_size(&self) -> (u32, u32) {
            self.0
        }

        fn queue_draw(&self) {}

        fn present(&self, _surface: &Surface) {}
    }

    #[test]
    fn canvases_are_found_by_id() {
        let mut host = CanvasHost::new(FontSystem::new());
        host.add_canvas(CanvasConfig::default(), |_| {}).unwrap();
        let overview = CanvasConfig {
            id: "overview".into(),
            ..CanvasConfig::default()
        };
        host.add_canvas(overview, |_| {}).unwrap();

        assert!(host.canvas("MainCanvas").is_some());
        assert_eq!(host.canvas("overview").map(Canvas::id), Some("overview"));
        assert!(host.canvas("missing").is_none());
        assert_eq!(host.canvases().count(), 2);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut host = CanvasHost::new(FontSystem::new());
        host.add_canvas(CanvasConfig::default(), |_| {}).unwrap();

        let err = host.add_canvas(CanvasConfig::default(), |_| {}).unwrap_err();
        assert_eq!(err, CanvasError::DuplicateCanvas("MainCanvas".into()));
    }

    #[test]
    fn unknown_canvas_is_an_error() {
        let mut host = CanvasHost::new(FontSystem::new());

        let err = host.dispatch("nope", HostEvent::RepaintRequested).unwrap_err();
        assert_eq!(err.to_string(), "no canvas named \"nope\"");
        assert!(host.initialize_canvas("nope", Rc::new(StaticWidget((1, 1)))).is_err());
    }

    #[test]
    fn dispatch_drives_the_named_canvas() {
        let redraws = Rc::new(Cell::new(0));
        let counter = redraws.clone();
        let mut host = CanvasHost::new(FontSystem::new());
        host.add_canvas(CanvasConfig::default(), move |_| counter.set(counter.get() + 1)).unwrap();

        host.initialize_canvas("MainCanvas", Rc::new(StaticWidget((400, 400)))).unwrap();
        let resized = HostEvent::Resized {
            width: 800,
            height: 600,
        };
        host.dispatch("MainCanvas", resized).unwrap();
        host.redraw_all();

        let canvas = host.canvas("MainCanvas").unwrap();
        assert_eq!((canvas.width(), canvas.height()), (800, 600));
        assert_eq!(canvas.surface_generation(), 2);
        assert_eq!(redraws.get(), 3);
    }
}
