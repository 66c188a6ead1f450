//! Asset loading: named resource cache and the sprite-sheet format.

mod cache;
mod error;
mod sprite_sheet;

pub use cache::{
    Cache, ResourceCache, BLEND_ADD, BLEND_ALPHA, BLEND_NO_BLEND, SHADER_COLOR, SHADER_TEXTURE,
};
pub use error::LoadError;
pub use sprite_sheet::{SheetFrame, SheetMeta, SheetOffset, SheetPivot, SheetRect, SheetSize, SpriteSheet};
