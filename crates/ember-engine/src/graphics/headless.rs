//! CPU-only graphics backend.
//!
//! Stores every resource in memory and "executes" draw queues by validating
//! and counting them. Used by the demo runtime and as the test GPU.

use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::coords::Size2;
use crate::paint::Color;

use super::device::{FrameStats, GraphicsDevice, MeshBufferDesc, TextureDesc};
use super::draw::DrawCommand;
use super::error::GraphicsError;
use super::resource::{
    BlendMode, BlendState, MeshBuffer, RenderTarget, Resource, ResourceId, Shader, Texture,
};
use super::update_queue::UpdateQueue;
use super::vertex::VertexPCT;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── resources ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct HeadlessTexture {
    id: ResourceId,
    width: u32,
    height: u32,
    mipmaps: bool,
    pixels: Vec<u8>,
}

impl HeadlessTexture {
    /// RGBA8 pixels (empty for uninitialized textures).
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl Resource for HeadlessTexture {
    fn id(&self) -> ResourceId {
        self.id
    }
}

impl Texture for HeadlessTexture {
    fn size(&self) -> Size2 {
        Size2::new(self.width as f32, self.height as f32)
    }

    fn mipmaps(&self) -> bool {
        self.mipmaps
    }
}

#[derive(Debug)]
pub struct HeadlessShader {
    id: ResourceId,
    name: String,
}

impl Resource for HeadlessShader {
    fn id(&self) -> ResourceId {
        self.id
    }
}

impl Shader for HeadlessShader {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
pub struct HeadlessBlendState {
    id: ResourceId,
    mode: BlendMode,
}

impl Resource for HeadlessBlendState {
    fn id(&self) -> ResourceId {
        self.id
    }
}

impl BlendState for HeadlessBlendState {
    fn mode(&self) -> BlendMode {
        self.mode
    }
}

#[derive(Debug)]
pub struct HeadlessRenderTarget {
    id: ResourceId,
    size: Size2,
}

impl Resource for HeadlessRenderTarget {
    fn id(&self) -> ResourceId {
        self.id
    }
}

impl RenderTarget for HeadlessRenderTarget {
    fn size(&self) -> Size2 {
        self.size
    }
}

/// Mesh buffer with staged and uploaded vertex storage.
///
/// `upload_vertices` only stages data and schedules the buffer; the data
/// becomes visible through `vertices()` after `Resource::upload` runs.
pub struct HeadlessMeshBuffer {
    id: ResourceId,
    this: Weak<HeadlessMeshBuffer>,
    updates: Weak<UpdateQueue>,
    dynamic_vertices: bool,
    indices: Vec<u16>,
    staged: Mutex<Option<(Vec<u8>, u32)>>,
    uploaded: Mutex<Vec<u8>>,
    vertex_count: AtomicU32,
    upload_count: AtomicU32,
}

impl HeadlessMeshBuffer {
    fn new(desc: MeshBufferDesc<'_>, updates: &Arc<UpdateQueue>) -> Arc<Self> {
        Arc::new_cyclic(|this| HeadlessMeshBuffer {
            id: ResourceId::next(),
            this: this.clone(),
            updates: Arc::downgrade(updates),
            dynamic_vertices: desc.dynamic_vertices,
            indices: desc.indices.to_vec(),
            staged: Mutex::new(None),
            uploaded: Mutex::new(desc.vertices.to_vec()),
            vertex_count: AtomicU32::new(desc.vertex_count),
            upload_count: AtomicU32::new(0),
        })
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Uploaded vertices decoded as `VertexPCT`.
    pub fn vertices(&self) -> Vec<VertexPCT> {
        lock(&self.uploaded)
            .chunks_exact(VertexPCT::stride())
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }

    /// Number of completed re-uploads (creation data excluded).
    pub fn upload_count(&self) -> u32 {
        self.upload_count.load(Ordering::Relaxed)
    }

    pub fn has_staged_data(&self) -> bool {
        lock(&self.staged).is_some()
    }
}

impl Resource for HeadlessMeshBuffer {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn upload(&self) {
        let Some((data, count)) = lock(&self.staged).take() else { return };
        *lock(&self.uploaded) = data;
        self.vertex_count.store(count, Ordering::Relaxed);
        self.upload_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl MeshBuffer for HeadlessMeshBuffer {
    fn index_count(&self) -> u32 {
        u32::try_from(self.indices.len()).unwrap_or(u32::MAX)
    }

    fn vertex_count(&self) -> u32 {
        self.vertex_count.load(Ordering::Relaxed)
    }

    fn upload_vertices(&self, data: &[u8], count: u32) {
        if !self.dynamic_vertices {
            log::warn!("upload_vertices on static mesh buffer {:?} ignored", self.id);
            return;
        }

        *lock(&self.staged) = Some((data.to_vec(), count));

        if let (Some(me), Some(updates)) = (self.this.upgrade(), self.updates.upgrade()) {
            updates.schedule(me);
        }
    }
}

// ── device ────────────────────────────────────────────────────────────────

/// In-memory `GraphicsDevice`.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    frames_executed: AtomicU64,
    resolutions: Vec<Size2>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device reporting `resolutions` from `supported_resolutions`.
    pub fn with_resolutions(resolutions: Vec<Size2>) -> Self {
        Self {
            frames_executed: AtomicU64::new(0),
            resolutions,
        }
    }

    pub fn frames_executed(&self) -> u64 {
        self.frames_executed.load(Ordering::Relaxed)
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_texture(&self, desc: TextureDesc<'_>) -> Result<Arc<dyn Texture>, GraphicsError> {
        if desc.width == 0 || desc.height == 0 {
            return Err(GraphicsError::InvalidResource(format!(
                "texture size {}x{}",
                desc.width, desc.height
            )));
        }

        let pixels = match desc.pixels {
            Some(pixels) => {
                let expected = desc.width as usize * desc.height as usize * 4;
                if pixels.len() != expected {
                    return Err(GraphicsError::PixelDataMismatch { expected, actual: pixels.len() });
                }
                pixels.to_vec()
            }
            None => Vec::new(),
        };

        Ok(Arc::new(HeadlessTexture {
            id: ResourceId::next(),
            width: desc.width,
            height: desc.height,
            mipmaps: desc.mipmaps,
            pixels,
        }))
    }

    fn create_shader(&self, name: &str) -> Result<Arc<dyn Shader>, GraphicsError> {
        Ok(Arc::new(HeadlessShader {
            id: ResourceId::next(),
            name: name.to_string(),
        }))
    }

    fn create_blend_state(&self, mode: BlendMode) -> Result<Arc<dyn BlendState>, GraphicsError> {
        Ok(Arc::new(HeadlessBlendState { id: ResourceId::next(), mode }))
    }

    fn create_mesh_buffer(
        &self,
        desc: MeshBufferDesc<'_>,
        updates: &Arc<UpdateQueue>,
    ) -> Result<Arc<dyn MeshBuffer>, GraphicsError> {
        let expected = desc.vertex_count as usize * VertexPCT::stride();
        if desc.vertices.len() != expected {
            return Err(GraphicsError::InvalidResource(format!(
                "mesh buffer has {} vertex bytes, expected {expected}",
                desc.vertices.len()
            )));
        }

        Ok(HeadlessMeshBuffer::new(desc, updates))
    }

    fn create_render_target(&self, size: Size2) -> Result<Arc<dyn RenderTarget>, GraphicsError> {
        if !size.is_valid() {
            return Err(GraphicsError::InvalidResource(format!(
                "render target size {}x{}",
                size.width, size.height
            )));
        }
        Ok(Arc::new(HeadlessRenderTarget { id: ResourceId::next(), size }))
    }

    fn supported_resolutions(&self) -> Vec<Size2> {
        self.resolutions.clone()
    }

    fn execute(&self, commands: &[DrawCommand], _clear_color: Color) -> FrameStats {
        let mut stats = FrameStats::default();

        for cmd in commands {
            let available = cmd.mesh_buffer.index_count();
            let end = cmd.start_index.saturating_add(cmd.index_count);
            if end > available {
                log::warn!(
                    "draw command reads indices {}..{} of a {}-index buffer; skipped",
                    cmd.start_index,
                    end,
                    available
                );
                continue;
            }

            stats.draw_calls += 1;
            stats.indices += u64::from(cmd.index_count);
            stats.texture_binds += u32::try_from(cmd.textures.len()).unwrap_or(u32::MAX);
            if cmd.scissor_test_enabled() {
                stats.scissored += 1;
            }
        }

        self.frames_executed.fetch_add(1, Ordering::Relaxed);
        stats
    }

    fn save_screenshot(&self, path: &Path, size: Size2, clear_color: Color) -> Result<(), GraphicsError> {
        let width = size.width.max(1.0) as u32;
        let height = size.height.max(1.0) as u32;
        let pixel = image::Rgba([clear_color.r, clear_color.g, clear_color.b, clear_color.a]);

        image::RgbaImage::from_pixel(width, height, pixel)
            .save(path)
            .map_err(|source| GraphicsError::Screenshot { path: path.to_path_buf(), source })?;

        log::info!("screenshot saved to {}", path.display());
        Ok(())
    }
}
