/// Straight-alpha RGBA color with 8-bit channels.
///
/// This is the layout written into `VertexPCT::color`, so it must stay four
/// tightly packed bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parses `0xRRGGBBAA`.
    #[inline]
    pub const fn from_hex(rgba: u32) -> Self {
        Self::rgba(
            (rgba >> 24) as u8,
            (rgba >> 16) as u8,
            (rgba >> 8) as u8,
            rgba as u8,
        )
    }

    /// Returns a copy whose alpha is scaled by `opacity` (clamped to `[0, 1]`).
    ///
    /// Truncates toward zero, so `opacity = 1.0` keeps alpha intact and
    /// `opacity = 0.5` on `a = 255` yields `127`.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            a: (opacity * f32::from(self.a)) as u8,
            ..self
        }
    }

    #[inline]
    pub fn r_f32(self) -> f32 {
        f32::from(self.r) / 255.0
    }

    #[inline]
    pub fn g_f32(self) -> f32 {
        f32::from(self.g) / 255.0
    }

    #[inline]
    pub fn b_f32(self) -> f32 {
        f32::from(self.b) / 255.0
    }

    #[inline]
    pub fn a_f32(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Normalized `[r, g, b, a]`, the layout uploaded as a shader constant.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r_f32(), self.g_f32(), self.b_f32(), self.a_f32()]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
