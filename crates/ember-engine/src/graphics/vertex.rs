use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

/// Attribute semantics of a vertex layout, in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexAttribute {
    /// `[f32; 3]`
    Position,
    /// `[u8; 4]`, normalized
    Color,
    /// `[f32; 2]`
    TexCoord0,
}

/// Position + color + texture coordinate vertex used by sprites.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexPCT {
    pub position: [f32; 3],
    pub color: Color,
    pub tex_coord: [f32; 2],
}

impl VertexPCT {
    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute::Position,
        VertexAttribute::Color,
        VertexAttribute::TexCoord0,
    ];

    #[inline]
    pub const fn new(position: [f32; 3], color: Color, tex_coord: [f32; 2]) -> Self {
        Self { position, color, tex_coord }
    }

    /// Size of one vertex in bytes.
    #[inline]
    pub const fn stride() -> usize {
        std::mem::size_of::<VertexPCT>()
    }
}
