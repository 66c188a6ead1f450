use std::sync::Arc;

use crate::coords::Rect;

use super::resource::{BlendState, MeshBuffer, RenderTarget, Resource, Shader, Texture};

/// Primitive topology for a draw.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DrawMode {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
}

/// One queued draw call.
///
/// Holds shared handles to every resource it touches; the queue never owns
/// resource lifetime beyond those references. Commands are not modified after
/// they are handed to `Renderer::add_draw_command`.
#[derive(Clone)]
pub struct DrawCommand {
    pub textures: Vec<Arc<dyn Texture>>,
    pub shader: Arc<dyn Shader>,
    /// One entry per constant slot.
    pub pixel_shader_constants: Vec<Vec<f32>>,
    /// One entry per constant slot.
    pub vertex_shader_constants: Vec<Vec<f32>>,
    pub blend_state: Arc<dyn BlendState>,
    pub mesh_buffer: Arc<dyn MeshBuffer>,
    /// `0` means "all indices of `mesh_buffer`"; resolved when queued.
    pub index_count: u32,
    pub draw_mode: DrawMode,
    pub start_index: u32,
    /// `None` draws into the back buffer.
    pub render_target: Option<Arc<dyn RenderTarget>>,
    /// Scissor rect in pixels; `None` disables the scissor test.
    pub scissor: Option<Rect>,
}

impl DrawCommand {
    /// Triangle-list draw of the whole mesh with no textures or constants.
    pub fn new(
        shader: Arc<dyn Shader>,
        blend_state: Arc<dyn BlendState>,
        mesh_buffer: Arc<dyn MeshBuffer>,
    ) -> Self {
        Self {
            textures: Vec::new(),
            shader,
            pixel_shader_constants: Vec::new(),
            vertex_shader_constants: Vec::new(),
            blend_state,
            mesh_buffer,
            index_count: 0,
            draw_mode: DrawMode::TriangleList,
            start_index: 0,
            render_target: None,
            scissor: None,
        }
    }

    pub fn with_texture(mut self, texture: Arc<dyn Texture>) -> Self {
        self.textures.push(texture);
        self
    }

    pub fn with_pixel_constant(mut self, values: Vec<f32>) -> Self {
        self.pixel_shader_constants.push(values);
        self
    }

    pub fn with_vertex_constant(mut self, values: Vec<f32>) -> Self {
        self.vertex_shader_constants.push(values);
        self
    }

    pub fn with_range(mut self, start_index: u32, index_count: u32) -> Self {
        self.start_index = start_index;
        self.index_count = index_count;
        self
    }

    pub fn with_draw_mode(mut self, draw_mode: DrawMode) -> Self {
        self.draw_mode = draw_mode;
        self
    }

    pub fn with_render_target(mut self, target: Arc<dyn RenderTarget>) -> Self {
        self.render_target = Some(target);
        self
    }

    pub fn with_scissor(mut self, scissor: Rect) -> Self {
        self.scissor = Some(scissor);
        self
    }

    #[inline]
    pub fn scissor_test_enabled(&self) -> bool {
        self.scissor.is_some()
    }
}

impl std::fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawCommand")
            .field("textures", &self.textures.iter().map(|t| t.id()).collect::<Vec<_>>())
            .field("shader", &self.shader.name())
            .field("blend", &self.blend_state.mode())
            .field("mesh_buffer", &self.mesh_buffer.id())
            .field("index_count", &self.index_count)
            .field("draw_mode", &self.draw_mode)
            .field("start_index", &self.start_index)
            .field("scissor", &self.scissor)
            .finish()
    }
}
