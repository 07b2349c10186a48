use std::sync::Arc;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::device::Surface;

use super::{HostEvent, HostWidget};

/// Translates a winit `WindowEvent` into a canvas [`HostEvent`].
///
/// Returns `None` for events a canvas does not react to.
pub fn translate_window_event(event: &WindowEvent) -> Option<HostEvent> {
    match event {
        WindowEvent::Resized(size) => Some(HostEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::RedrawRequested => Some(HostEvent::RepaintRequested),
        _ => None,
    }
}

type Presenter = Box<dyn Fn(&Window, &Surface)>;

/// [`HostWidget`] over a winit window.
///
/// Blitting is delegated to `presenter`, so the caller picks how pixels reach
/// the window (a software buffer, a texture upload, ...).
pub struct WinitWidget {
    window: Arc<Window>,
    presenter: Presenter,
}

impl WinitWidget {
    pub fn new(window: Arc<Window>, presenter: impl Fn(&Window, &Surface) + 'static) -> Self {
        Self {
            window,
            presenter: Box::new(presenter),
        }
    }

    #[inline]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl HostWidget for WinitWidget {
    fn pixel_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn queue_draw(&self) {
        self.window.request_redraw();
    }

    fn present(&self, surface: &Surface) {
        self.window.pre_present_notify();
        (self.presenter)(&self.window, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn resize_and_redraw_are_translated() {
        assert_eq!(
            translate_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 600))),
            Some(HostEvent::Resized {
                width: 800,
                height: 600,
            })
        );
        assert_eq!(
            translate_window_event(&WindowEvent::RedrawRequested),
            Some(HostEvent::RepaintRequested)
        );
    }

    #[test]
    fn unrelated_events_are_ignored() {
        assert_eq!(translate_window_event(&WindowEvent::Focused(true)), None);
        assert_eq!(translate_window_event(&WindowEvent::CloseRequested), None);
    }
}
