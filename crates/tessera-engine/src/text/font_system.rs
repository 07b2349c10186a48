use std::fmt;

use crate::paint::{FontSlant, FontSpec, FontWeight};

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Ink extents of a string, relative to the pen origin on the baseline.
///
/// Device pixels, +Y down: `y_bearing` is negative for glyphs that rise above
/// the baseline.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TextExtents {
    pub x_bearing: f64,
    pub y_bearing: f64,
    pub width: f64,
    pub height: f64,
    pub x_advance: f64,
}

/// Vertical metrics of a font at a given size. Both values are positive.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FontExtents {
    pub ascent: f64,
    pub descent: f64,
    pub height: f64,
}

/// A glyph positioned along the baseline of a laid-out run.
pub(crate) struct PlacedGlyph {
    pub ch: char,
    /// Pen position (baseline origin) of this glyph.
    pub pen_x: f32,
    pub metrics: fontdue::Metrics,
}

struct Face {
    family: String,
    slant: FontSlant,
    weight: FontWeight,
    font: fontdue::Font,
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The system is shared by every canvas of
/// a [`CanvasHost`](crate::canvas::CanvasHost) and handed to each renderer, so
/// load fonts before creating canvases.
pub struct FontSystem {
    faces: Vec<Face>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { faces: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes under the
    /// given family/slant/weight key.
    pub fn load_font(
        &mut self,
        family: &str,
        slant: FontSlant,
        weight: FontWeight,
        bytes: &[u8],
    ) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.faces.len());
        self.faces.push(Face {
            family: family.to_string(),
            slant,
            weight,
            font,
        });
        log::debug!("loaded font {family:?} ({slant:?}, {weight:?}) as {id:?}");
        Ok(id)
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Picks a font for `spec`.
    ///
    /// Preference order: exact family/slant/weight, any face of the family,
    /// then the first loaded font. `None` only when nothing is loaded.
    pub fn resolve(&self, spec: &FontSpec) -> Option<FontId> {
        let same_family = |face: &Face| face.family.eq_ignore_ascii_case(&spec.family);

        self.faces
            .iter()
            .position(|f| same_family(f) && f.slant == spec.slant && f.weight == spec.weight)
            .or_else(|| self.faces.iter().position(same_family))
            .or_else(|| (!self.faces.is_empty()).then_some(0))
            .map(FontId)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.faces.get(id.0).map(|f| &f.font)
    }

    /// Lays `text` out on a single baseline, applying pair kerning.
    pub(crate) fn glyph_run(&self, text: &str, id: FontId, size: f32) -> Vec<PlacedGlyph> {
        let Some(font) = self.get(id) else {
            return Vec::new();
        };

        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen_x = 0.0f32;
        let mut prev: Option<char> = None;

        for ch in text.chars() {
            if let Some(left) = prev {
                pen_x += font.horizontal_kern(left, ch, size).unwrap_or(0.0);
            }
            let metrics = font.metrics(ch, size);
            glyphs.push(PlacedGlyph { ch, pen_x, metrics });
            pen_x += metrics.advance_width;
            prev = Some(ch);
        }

        glyphs
    }

    /// Ink extents of `text` at `size` device pixels.
    #[must_use]
    pub fn text_extents(&self, text: &str, id: FontId, size: f32) -> TextExtents {
        let glyphs = self.glyph_run(text, id, size);
        let x_advance = glyphs
            .last()
            .map(|g| g.pen_x + g.metrics.advance_width)
            .unwrap_or(0.0) as f64;

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for g in glyphs.iter().filter(|g| g.metrics.width > 0 && g.metrics.height > 0) {
            let m = &g.metrics;
            let left = (g.pen_x + m.xmin as f32) as f64;
            let bottom = -(m.ymin as f64);
            min_x = min_x.min(left);
            max_x = max_x.max(left + m.width as f64);
            min_y = min_y.min(bottom - m.height as f64);
            max_y = max_y.max(bottom);
        }

        if min_x > max_x {
            // Only whitespace.
            return TextExtents {
                x_advance,
                ..TextExtents::default()
            };
        }

        TextExtents {
            x_bearing: min_x,
            y_bearing: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
            x_advance,
        }
    }

    /// Ascent/descent of the font at `size` device pixels.
    #[must_use]
    pub fn font_extents(&self, id: FontId, size: f32) -> FontExtents {
        let Some(lm) = self.get(id).and_then(|f| f.horizontal_line_metrics(size)) else {
            return FontExtents {
                ascent: size as f64,
                descent: 0.0,
                height: size as f64 * 1.2,
            };
        };

        FontExtents {
            ascent: lm.ascent as f64,
            descent: -(lm.descent as f64),
            height: lm.new_line_size as f64,
        }
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}
