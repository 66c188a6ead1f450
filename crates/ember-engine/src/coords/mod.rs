//! Coordinate and geometry types shared across the renderer and scene code.
//!
//! Canonical CPU space for sprites:
//! - World units (pixels at scale 1)
//! - Origin at the node position
//! - +X right, +Y up
//!
//! Renderers receive a projection matrix; nothing here knows about NDC except
//! the conversion helpers on `graphics::Renderer`.

mod bounds;
mod rect;
mod size;
mod vec2;

pub use bounds::BoundingBox;
pub use rect::Rect;
pub use size::Size2;
pub use vec2::Vec2;
