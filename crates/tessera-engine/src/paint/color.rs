/// Straight-alpha sRGB color, one byte per channel.
///
/// `alpha == 255` is fully opaque. Backends premultiply when they write
/// pixels; this type never does.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    #[inline]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    #[inline]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Same color with a replaced alpha channel.
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.alpha == u8::MAX
    }

    /// Premultiplied RGBA bytes, the layout surfaces store.
    #[inline]
    pub fn premultiplied(self) -> [u8; 4] {
        let a = self.alpha as u16;
        let mul = |c: u8| ((c as u16 * a + 127) / 255) as u8;
        [mul(self.red), mul(self.green), mul(self.blue), self.alpha]
    }

    #[inline]
    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.red, self.green, self.blue, self.alpha)
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GREY_55: Color = Color::rgb(140, 140, 140);
    pub const GREY_75: Color = Color::rgb(191, 191, 191);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const PURPLE: Color = Color::rgb(160, 32, 240);
    pub const PINK: Color = Color::rgb(255, 192, 203);
    pub const LIGHT_PINK: Color = Color::rgb(255, 182, 193);
    pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const BISQUE: Color = Color::rgb(255, 228, 196);
    pub const LIGHT_SKY_BLUE: Color = Color::rgb(135, 206, 250);
    pub const THISTLE: Color = Color::rgb(216, 191, 216);
    pub const PLUM: Color = Color::rgb(221, 160, 221);
    pub const KHAKI: Color = Color::rgb(240, 230, 140);
    pub const CORAL: Color = Color::rgb(255, 127, 80);
    pub const TURQUOISE: Color = Color::rgb(64, 224, 208);
    pub const MEDIUM_PURPLE: Color = Color::rgb(147, 112, 219);
    pub const DARK_SLATE_BLUE: Color = Color::rgb(72, 61, 139);
    pub const DARK_KHAKI: Color = Color::rgb(189, 183, 107);
    pub const LIGHT_MEDIUM_BLUE: Color = Color::rgb(44, 44, 180);
    pub const SADDLE_BROWN: Color = Color::rgb(139, 69, 19);
    pub const FIRE_BRICK: Color = Color::rgb(178, 34, 34);
    pub const LIME_GREEN: Color = Color::rgb(50, 205, 50);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
