use super::{Rect, Vec2};

/// Axis-aligned bounding box grown by inserting points.
///
/// An empty box contains nothing; the first inserted point collapses it onto
/// that point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    min: Vec2,
    max: Vec2,
}

impl BoundingBox {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min: Vec2::new(f32::INFINITY, f32::INFINITY),
            max: Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    #[inline]
    pub fn insert_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.max
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        !self.is_empty() && p.x >= self.min.x && p.y >= self.min.y && p.x <= self.max.x && p.y <= self.max.y
    }

    /// Returns the box as a rectangle, or `None` while nothing has been inserted.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        Some(Rect::new(
            self.min.x,
            self.min.y,
            self.max.x - self.min.x,
            self.max.y - self.min.y,
        ))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_no_rect() {
        let b = BoundingBox::empty();
        assert!(b.is_empty());
        assert!(b.to_rect().is_none());
        assert!(!b.contains_point(Vec2::zero()));
    }

    #[test]
    fn inserting_points_grows_the_box() {
        let mut b = BoundingBox::empty();
        b.insert_point(Vec2::new(1.0, 2.0));
        b.insert_point(Vec2::new(-3.0, 5.0));
        assert_eq!(b.to_rect(), Some(Rect::new(-3.0, 2.0, 4.0, 3.0)));
        assert!(b.contains_point(Vec2::new(0.0, 3.0)));
    }

    #[test]
    fn reset_empties_the_box() {
        let mut b = BoundingBox::empty();
        b.insert_point(Vec2::new(1.0, 1.0));
        b.reset();
        assert!(b.is_empty());
    }
}
