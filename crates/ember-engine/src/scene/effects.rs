use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::coords::Vec2;

use super::{Animation, Easing, Sprite};

/// Fades a sprite's opacity from `from` to `to`.
///
/// Holds the sprite weakly; once it is dropped the effect does nothing.
pub struct Fade {
    target: Weak<RefCell<Sprite>>,
    from: f32,
    to: f32,
    easing: Easing,
}

impl Fade {
    pub fn new(target: &Rc<RefCell<Sprite>>, from: f32, to: f32, easing: Easing) -> Self {
        Self { target: Rc::downgrade(target), from, to, easing }
    }
}

impl Animation for Fade {
    fn apply(&mut self, progress: f32) {
        let Some(sprite) = self.target.upgrade() else { return };
        let t = self.easing.apply(progress);
        sprite.borrow_mut().set_opacity(self.from + (self.to - self.from) * t);
    }
}

/// Moves a sprite's offset from `from` to `to`.
pub struct Slide {
    target: Weak<RefCell<Sprite>>,
    from: Vec2,
    to: Vec2,
    easing: Easing,
}

impl Slide {
    pub fn new(target: &Rc<RefCell<Sprite>>, from: Vec2, to: Vec2, easing: Easing) -> Self {
        Self { target: Rc::downgrade(target), from, to, easing }
    }
}

impl Animation for Slide {
    fn apply(&mut self, progress: f32) {
        let Some(sprite) = self.target.upgrade() else { return };
        sprite.borrow_mut().set_offset(self.from.lerp(self.to, self.easing.apply(progress)));
    }
}
