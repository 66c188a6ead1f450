//! Scene objects.
//!
//! Responsibilities:
//! - `Sprite`: animated textured quads built from sprite sheets or single images
//! - `Animator`: time-based progress driving an `Animation` effect
//! - effects (`Fade`, `Slide`) shaped by an `Easing` curve
//!
//! Everything here lives on the logic thread as `Rc<RefCell<_>>` and is
//! advanced through a shared `TickScheduler`.

mod animator;
mod easing;
mod effects;
mod sprite;

pub use animator::{Animation, Animator};
pub use easing::Easing;
pub use effects::{Fade, Slide};
pub use sprite::{
    frame_local_rect, frame_tex_coords, FrameSource, Sprite, SpriteDeps, SpriteFrame, QUAD_INDICES,
};
