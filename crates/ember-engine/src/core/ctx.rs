use std::rc::Rc;

use crate::assets::Cache;
use crate::graphics::Renderer;
use crate::input::{InputFrame, InputState};
use crate::scene::SpriteDeps;
use crate::time::{FrameTime, TickScheduler};

/// Per-frame context passed to `core::App` callbacks.
pub struct FrameCtx<'a> {
    pub renderer: &'a mut Renderer,
    pub cache: &'a Cache,
    pub scheduler: &'a Rc<TickScheduler>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl FrameCtx<'_> {
    /// Collaborators for `Sprite` constructors.
    pub fn sprite_deps(&self) -> SpriteDeps<'_> {
        SpriteDeps {
            renderer: &*self.renderer,
            cache: self.cache,
            scheduler: self.scheduler,
        }
    }
}
