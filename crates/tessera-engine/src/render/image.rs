use std::fmt;
use std::path::{Path, PathBuf};

use tiny_skia::Pixmap;

use crate::paint::Color;

#[derive(Debug)]
pub enum ImageLoadError {
    /// The file could not be opened or decoded.
    Decode { path: PathBuf, source: image::ImageError },
    /// Pixel buffer length does not match `width * height * 4`.
    BufferSize { width: u32, height: u32, len: usize },
    /// Zero width or height.
    Empty,
}

impl fmt::Display for ImageLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageLoadError::Decode { path, source } => {
                write!(f, "failed to decode image {}: {source}", path.display())
            }
            ImageLoadError::BufferSize { width, height, len } => {
                let expected = *width as usize * *height as usize * 4;
                write!(
                    f,
                    "expected {expected} bytes for a {width}x{height} RGBA image, got {len}"
                )
            }
            ImageLoadError::Empty => write!(f, "image has zero area"),
        }
    }
}

impl std::error::Error for ImageLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageLoadError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Decoded raster image, stored premultiplied and ready to composite.
#[derive(Clone)]
pub struct RasterImage {
    pixmap: Pixmap,
}

impl RasterImage {
    /// Decodes a PNG, JPEG or BMP file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageLoadError> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .map_err(|source| ImageLoadError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (width, height) = decoded.dimensions();
        Self::from_rgba8(width, height, decoded.as_raw())
    }

    /// Builds an image from straight-alpha RGBA8 rows.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, ImageLoadError> {
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(ImageLoadError::BufferSize {
                width,
                height,
                len: rgba.len(),
            });
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(ImageLoadError::Empty)?;

        for (dst, src) in pixmap.data_mut().chunks_exact_mut(4).zip(rgba.chunks_exact(4)) {
            let color = Color::rgba(src[0], src[1], src[2], src[3]);
            dst.copy_from_slice(&color.premultiplied());
        }

        Ok(Self { pixmap })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[inline]
    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
