//! Paint primitives.
//!
//! Sprites store straight-alpha 8-bit colors in their vertices; the opacity of a
//! sprite is folded into the alpha channel when vertices are rewritten.

mod color;

pub use color::Color;
