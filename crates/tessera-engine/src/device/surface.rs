use std::cell::{Ref, RefCell};
use std::path::Path;

use anyhow::{Context, Result};
use tiny_skia::Pixmap;

use crate::paint::Color;

use super::SurfaceError;

/// Off-screen RGBA8 pixel buffer (premultiplied alpha, row-major, no padding).
///
/// A surface has fixed dimensions; resizing means allocating a new one.
///
/// Both backends of a renderer write into the same pixels. They hold shared
/// `&Surface` borrows and take the interior `RefCell` only for the duration of
/// a single primitive, so the borrow is never held across a call boundary.
pub struct Surface {
    pixmap: RefCell<Pixmap>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSize { width, height });
        }
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::Allocation { width, height })?;
        Ok(Self { pixmap: RefCell::new(pixmap) })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.borrow().width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.borrow().height()
    }

    /// Fills every pixel with `color`.
    pub fn clear(&self, color: Color) {
        self.pixmap.borrow_mut().fill(color.to_skia());
    }

    /// Straight-alpha color of one pixel, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.borrow().pixel(x, y)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Premultiplied RGBA bytes, for presenting the surface on a host widget.
    pub fn data(&self) -> Ref<'_, [u8]> {
        Ref::map(self.pixmap.borrow(), |p| p.data())
    }

    /// Encodes the current contents as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap.borrow().encode_png().context("failed to encode surface as PNG")
    }

    /// Writes the current contents to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.pixmap
            .borrow()
            .save_png(path)
            .with_context(|| format!("failed to write PNG snapshot to {}", path.display()))
    }

    pub(crate) fn with_pixmap_mut<R>(&self, f: impl FnOnce(&mut Pixmap) -> R) -> R {
        f(&mut self.pixmap.borrow_mut())
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
