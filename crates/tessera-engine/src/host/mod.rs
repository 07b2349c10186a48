//! Host toolkit boundary.
//!
//! A canvas never talks to a windowing toolkit directly. The host wraps its
//! widget in a [`HostWidget`] and forwards the few events a canvas reacts to
//! as [`HostEvent`]s. The public API here does not expose toolkit types; the
//! `winit` adapter lives in [`winit`].

pub mod winit;

use crate::device::Surface;

/// Display widget a canvas is bound to.
pub trait HostWidget {
    /// Current drawable size in device pixels. May be `(0, 0)` while the
    /// widget is hidden.
    fn pixel_size(&self) -> (u32, u32);

    /// Schedules a repaint. The host answers with
    /// [`HostEvent::RepaintRequested`] on its next paint cycle.
    fn queue_draw(&self);

    /// Copies the finished off-screen surface onto the widget.
    fn present(&self, surface: &Surface);
}

/// Events a canvas consumes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostEvent {
    /// The widget's drawable area changed size (device pixels).
    Resized { width: u32, height: u32 },
    /// The widget needs its content painted.
    RepaintRequested,
}
