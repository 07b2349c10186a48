/// End-cap shape for stroked lines.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Dash pattern for stroked lines.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineDash {
    #[default]
    None,
    /// 5 px on, 3 px off.
    Asymmetric5_3,
}

impl LineDash {
    /// On/off lengths in device pixels, or `None` for solid strokes.
    pub fn pattern(self) -> Option<[f32; 2]> {
        match self {
            LineDash::None => None,
            LineDash::Asymmetric5_3 => Some([5.0, 3.0]),
        }
    }
}

/// Stroke parameters. Width is in device pixels and does not scale with zoom.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub cap: LineCap,
    pub dash: LineDash,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            dash: LineDash::None,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Font selection. `size` is in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub slant: FontSlant,
    pub weight: FontWeight,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            slant: FontSlant::Normal,
            weight: FontWeight::Normal,
            size: 10.0,
        }
    }
}
