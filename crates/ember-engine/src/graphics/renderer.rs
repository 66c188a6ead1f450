use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::coords::{Size2, Vec2};
use crate::paint::Color;

use super::device::{GraphicsDevice, MeshBufferDesc, TextureDesc};
use super::draw::DrawCommand;
use super::error::GraphicsError;
use super::resource::{BlendMode, BlendState, MeshBuffer, RenderTarget, Resource, Shader, Texture};
use super::update_queue::UpdateQueue;

/// Texture sampling policy requested from the backend.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextureFiltering {
    #[default]
    Point,
    Linear,
    Bilinear,
    Trilinear,
}

/// Initialization parameters for the renderer.
///
/// Mirrors what a window backend negotiates at startup. Fields are applied by
/// `Renderer::init` and can be changed later through the setters.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Drawable size in pixels.
    pub size: Size2,
    pub fullscreen: bool,
    /// MSAA sample count; `1` disables multisampling.
    pub sample_count: u32,
    pub texture_filtering: TextureFiltering,
    pub vertical_sync: bool,
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            size: Size2::new(1280.0, 720.0),
            fullscreen: false,
            sample_count: 1,
            texture_filtering: TextureFiltering::Point,
            vertical_sync: true,
            clear_color: Color::BLACK,
        }
    }
}

/// Result of `Renderer::present`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentStatus {
    /// The flushed queue became the new consumption snapshot.
    Swapped,
    /// Nothing was flushed since the last swap; the previous snapshot stays.
    Reused,
}

/// Engine-side renderer: draw-command double buffer, resource update queue,
/// screenshot requests, and the resource factories of the active backend.
///
/// Frame contract (single call site, typically `core::Runtime`):
/// 1. producers call `add_draw_command` while `refill_draw_queue()` is true
/// 2. `flush_draw_commands` closes the active queue
/// 3. `present` moves the closed queue into the consumption slot
/// 4. the backend reads `draw_queue()` until the next `present`
///
/// `flush_draw_commands` and `present` must not race each other; `&mut self`
/// enforces that for safe callers.
pub struct Renderer {
    device: Arc<dyn GraphicsDevice>,

    size: Size2,
    fullscreen: bool,
    sample_count: u32,
    texture_filtering: TextureFiltering,
    vertical_sync: bool,
    clear_color: Color,
    ready: bool,

    /// Producer-side queue for the frame being built.
    active_draw_queue: Vec<DrawCommand>,
    /// Snapshot read by the backend.
    draw_queue: Vec<DrawCommand>,
    active_draw_queue_finished: bool,
    refill_draw_queue: bool,

    draw_call_count: u32,
    skipped_presents: u64,

    screenshot_queue: Mutex<VecDeque<PathBuf>>,
    updates: Arc<UpdateQueue>,
}

impl Renderer {
    /// Creates a renderer bound to `device` and applies `config`.
    pub fn new(device: Arc<dyn GraphicsDevice>, config: RendererConfig) -> Self {
        let mut renderer = Self {
            device,
            size: Size2::default(),
            fullscreen: false,
            sample_count: 1,
            texture_filtering: TextureFiltering::default(),
            vertical_sync: true,
            clear_color: Color::BLACK,
            ready: false,
            active_draw_queue: Vec::new(),
            draw_queue: Vec::new(),
            active_draw_queue_finished: false,
            refill_draw_queue: true,
            draw_call_count: 0,
            skipped_presents: 0,
            screenshot_queue: Mutex::new(VecDeque::new()),
            updates: Arc::new(UpdateQueue::new()),
        };
        renderer.init(config);
        renderer
    }

    /// (Re)applies startup parameters and marks the renderer ready.
    pub fn init(&mut self, config: RendererConfig) {
        self.size = config.size;
        self.fullscreen = config.fullscreen;
        self.sample_count = config.sample_count.max(1);
        self.texture_filtering = config.texture_filtering;
        self.vertical_sync = config.vertical_sync;
        self.clear_color = config.clear_color;
        self.ready = true;

        log::debug!(
            "renderer initialized: {}x{} samples={} filtering={:?} vsync={}",
            self.size.width,
            self.size.height,
            self.sample_count,
            self.texture_filtering,
            self.vertical_sync
        );
    }

    /// Drops pending commands and marks the renderer not ready.
    pub fn free(&mut self) {
        self.active_draw_queue.clear();
        self.ready = false;
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    // ── draw queue ────────────────────────────────────────────────────────

    /// Appends a command to the frame being built.
    ///
    /// An `index_count` of `0` is resolved to the mesh buffer's index count.
    pub fn add_draw_command(&mut self, mut command: DrawCommand) {
        if command.index_count == 0 {
            command.index_count = command.mesh_buffer.index_count();
        }
        self.active_draw_queue.push(command);
    }

    /// Closes the frame being built. Producers should stop drawing until the
    /// next `present` re-enables refilling.
    pub fn flush_draw_commands(&mut self) {
        self.refill_draw_queue = false;
        self.active_draw_queue_finished = true;
    }

    /// Hands the flushed queue to the consumer.
    ///
    /// Without a flush since the last swap this is a no-op and the consumer keeps
    /// reading the previous snapshot. Never blocks.
    pub fn present(&mut self) -> PresentStatus {
        if !self.active_draw_queue_finished {
            self.skipped_presents += 1;
            log::trace!("present skipped; active draw queue not flushed");
            return PresentStatus::Reused;
        }

        self.draw_queue = std::mem::take(&mut self.active_draw_queue);
        self.draw_call_count = u32::try_from(self.draw_queue.len()).unwrap_or(u32::MAX);
        self.active_draw_queue_finished = false;
        self.refill_draw_queue = true;

        log::trace!("present swapped {} draw commands", self.draw_call_count);
        PresentStatus::Swapped
    }

    /// Whether producers may fill the active queue this frame.
    #[inline]
    pub fn refill_draw_queue(&self) -> bool {
        self.refill_draw_queue
    }

    /// Commands of the frame being built.
    #[inline]
    pub fn active_draw_queue(&self) -> &[DrawCommand] {
        &self.active_draw_queue
    }

    /// Snapshot for the consumer.
    #[inline]
    pub fn draw_queue(&self) -> &[DrawCommand] {
        &self.draw_queue
    }

    /// Number of draw calls in the current snapshot.
    #[inline]
    pub fn draw_call_count(&self) -> u32 {
        self.draw_call_count
    }

    /// Presents that found nothing to swap.
    #[inline]
    pub fn skipped_presents(&self) -> u64 {
        self.skipped_presents
    }

    // ── resource updates ─────────────────────────────────────────────────

    /// Queues `resource` for a backend upload; duplicates are ignored until drained.
    pub fn schedule_update(&self, resource: Arc<dyn Resource>) -> bool {
        self.updates.schedule(resource)
    }

    /// Shared update queue handed to dynamic resources at creation.
    #[inline]
    pub fn update_queue(&self) -> &Arc<UpdateQueue> {
        &self.updates
    }

    /// Drains the update queue and uploads each resource in order.
    ///
    /// Returns the number of uploaded resources.
    pub fn process_updates(&self) -> usize {
        let pending = self.updates.drain();
        for resource in &pending {
            resource.upload();
        }
        pending.len()
    }

    // ── screenshots ──────────────────────────────────────────────────────

    fn screenshots(&self) -> MutexGuard<'_, VecDeque<PathBuf>> {
        self.screenshot_queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests a screenshot of a future frame. Serviced by the backend.
    pub fn save_screenshot(&self, path: impl AsRef<Path>) {
        self.screenshots().push_back(path.as_ref().to_path_buf());
    }

    /// Takes all pending screenshot requests in request order.
    pub fn take_screenshot_requests(&self) -> Vec<PathBuf> {
        self.screenshots().drain(..).collect()
    }

    // ── factories ────────────────────────────────────────────────────────

    pub fn create_texture(&self, desc: TextureDesc<'_>) -> Result<Arc<dyn Texture>, GraphicsError> {
        self.device.create_texture(desc)
    }

    pub fn create_shader(&self, name: &str) -> Result<Arc<dyn Shader>, GraphicsError> {
        self.device.create_shader(name)
    }

    pub fn create_blend_state(&self, mode: BlendMode) -> Result<Arc<dyn BlendState>, GraphicsError> {
        self.device.create_blend_state(mode)
    }

    pub fn create_render_target(&self, size: Size2) -> Result<Arc<dyn RenderTarget>, GraphicsError> {
        self.device.create_render_target(size)
    }

    /// Creates a mesh buffer whose vertex re-uploads go through this renderer's update queue.
    pub fn create_mesh_buffer(&self, desc: MeshBufferDesc<'_>) -> Result<Arc<dyn MeshBuffer>, GraphicsError> {
        self.device.create_mesh_buffer(desc, &self.updates)
    }

    // ── surface state ────────────────────────────────────────────────────

    #[inline]
    pub fn size(&self) -> Size2 {
        self.size
    }

    pub fn set_size(&mut self, size: Size2) {
        self.size = size;
    }

    #[inline]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    #[inline]
    pub fn texture_filtering(&self) -> TextureFiltering {
        self.texture_filtering
    }

    #[inline]
    pub fn vertical_sync(&self) -> bool {
        self.vertical_sync
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn supported_resolutions(&self) -> Vec<Size2> {
        self.device.supported_resolutions()
    }

    // ── coordinate conversion ────────────────────────────────────────────

    /// View pixels (top-left origin, +Y down) to normalized screen coordinates.
    pub fn view_to_screen_location(&self, position: Vec2) -> Vec2 {
        let x = 2.0 * position.x / self.size.width - 1.0;
        let y = 2.0 * (self.size.height - position.y) / self.size.height - 1.0;
        Vec2::new(x, y)
    }

    /// View-space delta to a normalized screen-space delta.
    pub fn view_to_screen_relative_location(&self, position: Vec2) -> Vec2 {
        let x = 2.0 * position.x / self.size.width;
        let y = -2.0 * position.y / self.size.height;
        Vec2::new(x, y)
    }

    /// Inverse of `view_to_screen_location`.
    pub fn screen_to_view_location(&self, position: Vec2) -> Vec2 {
        let x = (position.x + 1.0) / 2.0 * self.size.width;
        let y = self.size.height - (position.y + 1.0) / 2.0 * self.size.height;
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::headless::HeadlessDevice;
    use crate::graphics::vertex::VertexPCT;

    fn renderer() -> Renderer {
        Renderer::new(Arc::new(HeadlessDevice::new()), RendererConfig::default())
    }

    fn command(renderer: &Renderer, index_count: u32) -> DrawCommand {
        let vertices = [VertexPCT::new([0.0; 3], Color::WHITE, [0.0; 2]); 4];
        let mesh = renderer
            .create_mesh_buffer(MeshBufferDesc {
                indices: &[0, 1, 2, 1, 3, 2],
                vertices: bytemuck::cast_slice(&vertices),
                vertex_count: 4,
                dynamic_indices: false,
                dynamic_vertices: true,
            })
            .unwrap();
        let shader = renderer.create_shader("test").unwrap();
        let blend = renderer.create_blend_state(BlendMode::Alpha).unwrap();
        DrawCommand::new(shader, blend, mesh).with_range(0, index_count)
    }

    #[test]
    fn flush_then_present_transfers_commands_in_order() {
        let mut r = renderer();
        let cmds: Vec<_> = (1..=3).map(|n| command(&r, n)).collect();
        let ids: Vec<_> = cmds.iter().map(|c| c.mesh_buffer.id()).collect();
        for c in cmds {
            r.add_draw_command(c);
        }

        r.flush_draw_commands();
        assert!(!r.refill_draw_queue());
        assert_eq!(r.present(), PresentStatus::Swapped);

        let queued: Vec<_> = r.draw_queue().iter().map(|c| c.mesh_buffer.id()).collect();
        assert_eq!(queued, ids);
        assert_eq!(r.draw_call_count(), 3);
        assert!(r.active_draw_queue().is_empty());
        assert!(r.refill_draw_queue());
    }

    #[test]
    fn second_present_without_flush_keeps_snapshot() {
        let mut r = renderer();
        let c = command(&r, 3);
        r.add_draw_command(c);
        r.flush_draw_commands();
        r.present();

        let c = command(&r, 6);
        r.add_draw_command(c);
        assert_eq!(r.present(), PresentStatus::Reused);
        assert_eq!(r.draw_queue().len(), 1);
        assert_eq!(r.draw_queue()[0].index_count, 3);
        assert_eq!(r.active_draw_queue().len(), 1);
        assert_eq!(r.skipped_presents(), 1);
    }

    #[test]
    fn present_before_any_flush_is_noop() {
        let mut r = renderer();
        assert_eq!(r.present(), PresentStatus::Reused);
        assert!(r.draw_queue().is_empty());
        assert!(r.refill_draw_queue());
    }

    #[test]
    fn empty_flush_clears_the_snapshot() {
        let mut r = renderer();
        let c = command(&r, 3);
        r.add_draw_command(c);
        r.flush_draw_commands();
        r.present();
        r.flush_draw_commands();
        assert_eq!(r.present(), PresentStatus::Swapped);
        assert!(r.draw_queue().is_empty());
        assert_eq!(r.draw_call_count(), 0);
    }

    #[test]
    fn zero_index_count_defaults_to_mesh_indices() {
        let mut r = renderer();
        let c = command(&r, 0);
        r.add_draw_command(c);
        assert_eq!(r.active_draw_queue()[0].index_count, 6);
    }

    #[test]
    fn free_drops_pending_commands() {
        let mut r = renderer();
        let c = command(&r, 0);
        r.add_draw_command(c);
        r.free();
        assert!(!r.is_ready());
        assert!(r.active_draw_queue().is_empty());
    }

    #[test]
    fn screenshot_requests_are_fifo() {
        let r = renderer();
        r.save_screenshot("a.png");
        r.save_screenshot("b.png");
        assert_eq!(
            r.take_screenshot_requests(),
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
        assert!(r.take_screenshot_requests().is_empty());
    }

    #[test]
    fn view_screen_conversions_round_trip() {
        let mut r = renderer();
        r.set_size(Size2::new(200.0, 100.0));

        assert_eq!(r.view_to_screen_location(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(r.view_to_screen_location(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -1.0));
        assert_eq!(r.view_to_screen_relative_location(Vec2::new(100.0, 50.0)), Vec2::new(1.0, -1.0));

        let p = Vec2::new(50.0, 25.0);
        assert_eq!(r.screen_to_view_location(r.view_to_screen_location(p)), p);
    }

    #[test]
    fn init_clamps_sample_count() {
        let mut r = renderer();
        r.init(RendererConfig { sample_count: 0, ..RendererConfig::default() });
        assert_eq!(r.sample_count(), 1);
        assert!(r.is_ready());
    }
}
