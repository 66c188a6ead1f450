use super::{Size2, Vec2};

/// Axis-aligned rectangle: `origin` is the minimum corner.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Size2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Size2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Size2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.width, self.origin.y + self.size.height)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.height
    }

    /// Returns the same rectangle moved by `delta`.
    #[inline]
    pub fn translated(self, delta: Vec2) -> Rect {
        Rect::from_origin_size(self.origin + delta, self.size)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.width;
        let mut h = self.size.height;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Closed containment: `[min, max]`.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x <= max.x && p.y <= max.y
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let lo = a.min().max(b.min());
        let hi = a.max().min(b.max());

        let w = hi.x - lo.x;
        let h = hi.y - lo.y;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Rect::new(lo.x, lo.y, w, h))
        }
    }
}
