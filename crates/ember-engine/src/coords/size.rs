/// Width/height pair in pixels or world units.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Size2 {
    pub width: f32,
    pub height: f32,
}

impl Size2 {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Component-wise maximum, used to accumulate the overall size of a sprite sheet.
    #[inline]
    pub fn max(self, other: Size2) -> Size2 {
        Size2::new(self.width.max(other.width), self.height.max(other.height))
    }
}
