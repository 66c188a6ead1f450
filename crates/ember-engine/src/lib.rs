//! Ember engine crate.
//!
//! 2D sprite runtime: sprite-sheet loading, frame animation, a double-buffered
//! draw command queue, deduplicated resource uploads, and a headless graphics
//! backend. GPU API bindings plug in behind `graphics::GraphicsDevice`.

pub mod assets;
pub mod coords;
pub mod core;
pub mod graphics;
pub mod input;
pub mod logging;
pub mod paint;
pub mod scene;
pub mod time;

pub use glam::{Mat4, Vec3};
