use std::path::Path;
use std::sync::Arc;

use crate::coords::Size2;
use crate::paint::Color;

use super::draw::DrawCommand;
use super::error::GraphicsError;
use super::resource::{BlendMode, BlendState, MeshBuffer, RenderTarget, Shader, Texture};
use super::update_queue::UpdateQueue;

/// Parameters for creating a texture.
#[derive(Debug, Clone, Copy)]
pub struct TextureDesc<'a> {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels, or `None` for an uninitialized texture.
    pub pixels: Option<&'a [u8]>,
    pub mipmaps: bool,
}

/// Parameters for creating a mesh buffer.
#[derive(Debug, Clone, Copy)]
pub struct MeshBufferDesc<'a> {
    pub indices: &'a [u16],
    /// Raw vertex bytes (`vertex_count * stride`).
    pub vertices: &'a [u8],
    pub vertex_count: u32,
    pub dynamic_indices: bool,
    pub dynamic_vertices: bool,
}

/// Per-frame statistics reported by a backend after consuming a draw queue.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub indices: u64,
    pub texture_binds: u32,
    pub scissored: u32,
}

/// Backend contract: resource factory plus the consumer side of the frame.
///
/// Resource creation may happen on any thread; `execute` and
/// `save_screenshot` are called by the frame loop after `Renderer::present`.
pub trait GraphicsDevice: Send + Sync {
    fn create_texture(&self, desc: TextureDesc<'_>) -> Result<Arc<dyn Texture>, GraphicsError>;

    fn create_shader(&self, name: &str) -> Result<Arc<dyn Shader>, GraphicsError>;

    fn create_blend_state(&self, mode: BlendMode) -> Result<Arc<dyn BlendState>, GraphicsError>;

    /// Creates a mesh buffer. Dynamic buffers schedule re-uploads on `updates`.
    fn create_mesh_buffer(
        &self,
        desc: MeshBufferDesc<'_>,
        updates: &Arc<UpdateQueue>,
    ) -> Result<Arc<dyn MeshBuffer>, GraphicsError>;

    fn create_render_target(&self, size: Size2) -> Result<Arc<dyn RenderTarget>, GraphicsError>;

    /// Display modes the backend can switch to. Empty when unknown.
    fn supported_resolutions(&self) -> Vec<Size2> {
        Vec::new()
    }

    /// Consumes a presented draw queue.
    fn execute(&self, commands: &[DrawCommand], clear_color: Color) -> FrameStats;

    /// Writes the current frame to `path`.
    fn save_screenshot(&self, path: &Path, size: Size2, clear_color: Color) -> Result<(), GraphicsError>;
}
