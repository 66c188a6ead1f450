use std::cell::RefCell;
use std::ffi::OsStr;
use std::path::Path;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use glam::Mat4;

use crate::assets::{LoadError, ResourceCache, SpriteSheet, BLEND_ALPHA, SHADER_TEXTURE};
use crate::coords::{BoundingBox, Rect, Size2, Vec2};
use crate::graphics::{
    BlendState, DrawCommand, MeshBuffer, MeshBufferDesc, Renderer, Shader, Texture, VertexPCT,
};
use crate::paint::Color;
use crate::time::{TickId, TickScheduler, Tickable};

/// Two triangles over the quad corners `[bottom-left, bottom-right, top-left, top-right]`.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 3, 2];

/// Collaborators a sprite is built against.
#[derive(Clone, Copy)]
pub struct SpriteDeps<'a> {
    /// Creates the per-frame mesh buffers.
    pub renderer: &'a Renderer,
    pub cache: &'a dyn ResourceCache,
    /// Receives the playback tick registration.
    pub scheduler: &'a Rc<TickScheduler>,
}

/// Placement of one atlas region, as read from a sprite sheet.
#[derive(Clone)]
pub struct FrameSource {
    /// Pixel rectangle in the atlas (unrotated sprite dimensions).
    pub rect: Rect,
    pub texture: Arc<dyn Texture>,
    /// The region is stored rotated by 90° in the atlas.
    pub rotated: bool,
    /// Untrimmed size of the original image.
    pub source_size: Size2,
    /// Position of the trimmed pixels inside the original image.
    pub source_offset: Vec2,
    /// Normalized anchor inside the original image.
    pub pivot: Vec2,
}

/// One animation frame: a textured quad with its own mesh buffer.
pub struct SpriteFrame {
    /// Quad in sprite space, before the sprite offset.
    rect: Rect,
    texture: Arc<dyn Texture>,
    rotated: bool,
    vertices: [VertexPCT; 4],
    mesh_buffer: Arc<dyn MeshBuffer>,
}

impl SpriteFrame {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }

    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    pub fn vertices(&self) -> &[VertexPCT; 4] {
        &self.vertices
    }

    pub fn mesh_buffer(&self) -> &Arc<dyn MeshBuffer> {
        &self.mesh_buffer
    }

    fn upload(&self) {
        self.mesh_buffer
            .upload_vertices(bytemuck::cast_slice(&self.vertices), self.vertices.len() as u32);
    }

    fn place(&mut self, offset: Vec2) {
        let world = self.rect.translated(offset);
        let (min, max) = (world.min(), world.max());
        self.vertices[0].position = [min.x, min.y, 0.0];
        self.vertices[1].position = [max.x, min.y, 0.0];
        self.vertices[2].position = [min.x, max.y, 0.0];
        self.vertices[3].position = [max.x, max.y, 0.0];
    }
}

/// Normalized texture coordinates for the quad corners of an atlas region.
///
/// Corner order matches `QUAD_INDICES`. A rotated region occupies `h × w`
/// pixels in the atlas and its corners are the unrotated mapping turned by 90°.
pub fn frame_tex_coords(rect: Rect, rotated: bool, texture_size: Size2) -> [[f32; 2]; 4] {
    let left = rect.origin.x / texture_size.width;
    let top = rect.origin.y / texture_size.height;

    if !rotated {
        let right = (rect.origin.x + rect.width()) / texture_size.width;
        let bottom = (rect.origin.y + rect.height()) / texture_size.height;
        [[left, bottom], [right, bottom], [left, top], [right, top]]
    } else {
        let right = (rect.origin.x + rect.height()) / texture_size.width;
        let bottom = (rect.origin.y + rect.width()) / texture_size.height;
        [[left, top], [left, bottom], [right, top], [right, bottom]]
    }
}

/// Sprite-space rectangle of a frame: pivot-relative, trim-corrected, +Y up.
pub fn frame_local_rect(rect: Rect, source_size: Size2, source_offset: Vec2, pivot: Vec2) -> Rect {
    let origin = Vec2::new(
        -source_size.width * pivot.x + source_offset.x,
        -source_size.height * pivot.y + (source_size.height - rect.height() - source_offset.y),
    );
    Rect::from_origin_size(origin, rect.size)
}

/// Animated, textured quad.
///
/// Owns its frames and their mesh buffers; textures, shader and blend state
/// are shared handles from the resource cache. Playback is driven by the
/// `TickScheduler` the sprite was created with, registered only while playing.
pub struct Sprite {
    this: Weak<RefCell<Sprite>>,
    scheduler: Rc<TickScheduler>,
    tick_id: Option<TickId>,

    frames: Vec<SpriteFrame>,
    bounding_box: BoundingBox,
    size: Size2,
    offset: Vec2,

    blend_state: Arc<dyn BlendState>,
    shader: Arc<dyn Shader>,
    color: Color,
    opacity: f32,

    current_frame: usize,
    time_since_last_frame: f32,
    frame_interval: f32,
    repeat: bool,
    playing: bool,
}

impl Sprite {
    /// Creates a sprite without frames, using the default textured shader and
    /// alpha blending.
    pub fn empty(deps: SpriteDeps<'_>) -> Result<Rc<RefCell<Sprite>>, LoadError> {
        let blend_state = deps
            .cache
            .blend_state(BLEND_ALPHA)
            .ok_or_else(|| LoadError::MissingBlendState(BLEND_ALPHA.to_string()))?;
        let shader = deps
            .cache
            .shader(SHADER_TEXTURE)
            .ok_or_else(|| LoadError::MissingShader(SHADER_TEXTURE.to_string()))?;

        Ok(Rc::new_cyclic(|this| {
            RefCell::new(Sprite {
                this: this.clone(),
                scheduler: Rc::clone(deps.scheduler),
                tick_id: None,
                frames: Vec::new(),
                bounding_box: BoundingBox::empty(),
                size: Size2::default(),
                offset: Vec2::zero(),
                blend_state,
                shader,
                color: Color::WHITE,
                opacity: 1.0,
                current_frame: 0,
                time_since_last_frame: 0.0,
                frame_interval: 0.0,
                repeat: false,
                playing: false,
            })
        }))
    }

    /// Loads a sprite sheet (`.json`) or a single image (any other extension).
    pub fn from_file(
        path: impl AsRef<Path>,
        mipmaps: bool,
        deps: SpriteDeps<'_>,
    ) -> Result<Rc<RefCell<Sprite>>, LoadError> {
        let path = path.as_ref();
        let is_sheet = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let result = if is_sheet {
            SpriteSheet::load(path).and_then(|sheet| Self::from_sheet(&sheet, mipmaps, deps))
        } else {
            deps.cache
                .texture(&path.to_string_lossy(), mipmaps)
                .and_then(|texture| Self::from_texture(texture, deps))
        };

        if let Err(err) = &result {
            log::warn!("failed to load sprite {}: {err}", path.display());
        }
        result
    }

    /// One frame covering the whole texture, centered on the origin.
    pub fn from_texture(
        texture: Arc<dyn Texture>,
        deps: SpriteDeps<'_>,
    ) -> Result<Rc<RefCell<Sprite>>, LoadError> {
        let sprite = Self::empty(deps)?;
        {
            let mut s = sprite.borrow_mut();
            let size = texture.size();
            s.size = size;
            s.add_frame(
                deps.renderer,
                FrameSource {
                    rect: Rect::from_origin_size(Vec2::zero(), size),
                    texture,
                    rotated: false,
                    source_size: size,
                    source_offset: Vec2::zero(),
                    pivot: Vec2::new(0.5, 0.5),
                },
            )?;
        }
        Ok(sprite)
    }

    /// Builds every frame of `sheet`. The atlas image is resolved by name
    /// through the cache; the sprite size is the largest untrimmed frame size.
    pub fn from_sheet(
        sheet: &SpriteSheet,
        mipmaps: bool,
        deps: SpriteDeps<'_>,
    ) -> Result<Rc<RefCell<Sprite>>, LoadError> {
        let texture = deps.cache.texture(&sheet.meta.image, mipmaps)?;
        let sprite = Self::empty(deps)?;
        {
            let mut s = sprite.borrow_mut();
            s.frames.reserve(sheet.frames.len());

            for frame in &sheet.frames {
                let source_size = frame.source_size();
                s.size = s.size.max(source_size);
                s.add_frame(
                    deps.renderer,
                    FrameSource {
                        rect: frame.rect(),
                        texture: Arc::clone(&texture),
                        rotated: frame.rotated,
                        source_size,
                        source_offset: frame.source_offset(),
                        pivot: frame.pivot(),
                    },
                )?;
            }
        }

        log::debug!(
            "sprite sheet {} loaded: {} frames",
            sheet.meta.image,
            sheet.frames.len()
        );
        Ok(sprite)
    }

    /// Appends a frame and grows the bounding box with its corners.
    pub fn add_frame(&mut self, renderer: &Renderer, source: FrameSource) -> Result<(), LoadError> {
        let rect = frame_local_rect(source.rect, source.source_size, source.source_offset, source.pivot);
        let tex_coords = frame_tex_coords(source.rect, source.rotated, source.texture.size());
        let color = self.vertex_color();

        let mut vertices = [VertexPCT::new([0.0; 3], color, [0.0; 2]); 4];
        for (vertex, uv) in vertices.iter_mut().zip(tex_coords) {
            vertex.tex_coord = uv;
        }

        let mesh_buffer = renderer.create_mesh_buffer(MeshBufferDesc {
            indices: &QUAD_INDICES,
            vertices: bytemuck::cast_slice(&vertices),
            vertex_count: 4,
            dynamic_indices: false,
            dynamic_vertices: true,
        })?;

        let mut frame = SpriteFrame {
            rect,
            texture: source.texture,
            rotated: source.rotated,
            vertices,
            mesh_buffer,
        };
        frame.place(self.offset);
        frame.upload();

        let world = rect.translated(self.offset);
        self.bounding_box.insert_point(world.min());
        self.bounding_box.insert_point(world.max());
        self.frames.push(frame);
        Ok(())
    }

    // ── geometry & color ─────────────────────────────────────────────────

    /// Moves every frame by `offset` (relative to the frame layout) and
    /// rebuilds the bounding box.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.bounding_box.reset();

        for frame in &mut self.frames {
            frame.place(offset);
            frame.upload();

            let world = frame.rect.translated(offset);
            self.bounding_box.insert_point(world.min());
            self.bounding_box.insert_point(world.max());
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.update_vertex_color();
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.update_vertex_color();
    }

    fn vertex_color(&self) -> Color {
        self.color.with_opacity(self.opacity)
    }

    fn update_vertex_color(&mut self) {
        let color = self.vertex_color();
        for frame in &mut self.frames {
            for vertex in &mut frame.vertices {
                vertex.color = color;
            }
            frame.upload();
        }
    }

    // ── playback ─────────────────────────────────────────────────────────

    /// Starts frame animation with `frame_interval` seconds per frame.
    ///
    /// A non-positive interval stops playback instead. Restarts from the first
    /// frame when the previous run ended on the last one.
    pub fn play(&mut self, repeat: bool, frame_interval: f32) {
        if !(frame_interval.is_finite() && frame_interval > 0.0) {
            self.playing = false;
            self.unschedule();
            return;
        }

        self.repeat = repeat;
        self.frame_interval = frame_interval;

        if !self.playing && self.frames.len() > 1 {
            self.playing = true;

            if self.current_frame >= self.frames.len() - 1 {
                self.current_frame = 0;
                self.time_since_last_frame = 0.0;
            }

            self.schedule();
        }
    }

    pub fn stop(&mut self, reset_animation: bool) {
        if self.playing {
            self.playing = false;
            self.unschedule();
        }

        if reset_animation {
            self.reset();
        }
    }

    /// Stops playback and rewinds to the first frame.
    pub fn reset(&mut self) {
        self.playing = false;
        self.unschedule();
        self.current_frame = 0;
        self.time_since_last_frame = 0.0;
    }

    fn schedule(&mut self) {
        if self.tick_id.is_none() {
            let target: Weak<RefCell<dyn Tickable>> = self.this.clone();
            self.tick_id = Some(self.scheduler.schedule(target));
        }
    }

    fn unschedule(&mut self) {
        if let Some(id) = self.tick_id.take() {
            self.scheduler.unschedule(id);
        }
    }

    // ── drawing ──────────────────────────────────────────────────────────

    /// Queues the current frame. Nothing is queued for a sprite without frames.
    pub fn draw(&self, renderer: &mut Renderer, projection: &Mat4, transform: &Mat4, draw_color: Color) {
        let Some(frame) = self.frames.get(self.current_frame) else { return };

        let model_view_proj = *projection * *transform;

        renderer.add_draw_command(
            DrawCommand::new(
                Arc::clone(&self.shader),
                Arc::clone(&self.blend_state),
                Arc::clone(&frame.mesh_buffer),
            )
            .with_texture(Arc::clone(&frame.texture))
            .with_vertex_constant(model_view_proj.to_cols_array().to_vec())
            .with_pixel_constant(draw_color.to_array().to_vec()),
        );
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    /// Largest untrimmed frame size.
    pub fn size(&self) -> Size2 {
        self.size
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Union of every frame's quad, including the offset.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn shader(&self) -> &Arc<dyn Shader> {
        &self.shader
    }

    pub fn set_shader(&mut self, shader: Arc<dyn Shader>) {
        self.shader = shader;
    }

    pub fn blend_state(&self) -> &Arc<dyn BlendState> {
        &self.blend_state
    }

    pub fn set_blend_state(&mut self, blend_state: Arc<dyn BlendState>) {
        self.blend_state = blend_state;
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn time_since_last_frame(&self) -> f32 {
        self.time_since_last_frame
    }

    pub fn frame_interval(&self) -> f32 {
        self.frame_interval
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the sprite currently holds a tick registration.
    pub fn is_scheduled(&self) -> bool {
        self.tick_id.is_some()
    }
}

impl Tickable for Sprite {
    /// Catch-up: advances as many frames as the accumulated time covers.
    fn tick(&mut self, dt: f32) {
        if !self.playing || !dt.is_finite() {
            return;
        }

        self.time_since_last_frame += dt;
        if self.time_since_last_frame < self.frame_interval {
            return;
        }

        let steps = (self.time_since_last_frame / self.frame_interval).floor();
        let len = self.frames.len();
        let last = len.saturating_sub(1);

        if self.repeat {
            let advance = steps.rem_euclid(len as f32) as usize;
            self.current_frame = (self.current_frame + advance) % len;
            self.time_since_last_frame = self.time_since_last_frame.rem_euclid(self.frame_interval);
        } else if steps >= last.saturating_sub(self.current_frame) as f32 {
            self.current_frame = last;
            self.time_since_last_frame = 0.0;
            self.playing = false;
            self.unschedule();
        } else {
            self.current_frame += steps as usize;
            self.time_since_last_frame = self.time_since_last_frame.rem_euclid(self.frame_interval);
        }
    }
}

impl Drop for Sprite {
    fn drop(&mut self) {
        self.unschedule();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Cache;
    use crate::graphics::headless::HeadlessDevice;
    use crate::graphics::{PresentStatus, RendererConfig, Resource};

    struct Harness {
        renderer: Renderer,
        cache: Cache,
        scheduler: Rc<TickScheduler>,
    }

    impl Harness {
        fn new() -> Self {
            let device = Arc::new(HeadlessDevice::new());
            let renderer = Renderer::new(device.clone(), RendererConfig::default());
            let cache = Cache::new(device, ".").unwrap();
            cache.insert_image("atlas.png", &image::RgbaImage::new(64, 32), false).unwrap();
            Self { renderer, cache, scheduler: Rc::new(TickScheduler::new()) }
        }

        fn deps(&self) -> SpriteDeps<'_> {
            SpriteDeps { renderer: &self.renderer, cache: &self.cache, scheduler: &self.scheduler }
        }

        fn atlas(&self) -> Arc<dyn Texture> {
            self.cache.texture("atlas.png", false).unwrap()
        }

        /// Sprite with `n` untrimmed 8x8 frames laid out left to right.
        fn strip(&self, n: usize) -> Rc<RefCell<Sprite>> {
            let sprite = Sprite::empty(self.deps()).unwrap();
            for i in 0..n {
                sprite
                    .borrow_mut()
                    .add_frame(
                        &self.renderer,
                        FrameSource {
                            rect: Rect::new(i as f32 * 8.0, 0.0, 8.0, 8.0),
                            texture: self.atlas(),
                            rotated: false,
                            source_size: Size2::new(8.0, 8.0),
                            source_offset: Vec2::zero(),
                            pivot: Vec2::new(0.5, 0.5),
                        },
                    )
                    .unwrap();
            }
            sprite
        }
    }

    const SHEET: &str = r#"{
        "frames": [
            { "frame": {"x":0,"y":0,"w":16,"h":16}, "rotated": false,
              "sourceSize": {"w":20,"h":16}, "spriteSourceSize": {"x":2,"y":0}, "pivot": {"x":0.5,"y":0.5} },
            { "frame": {"x":16,"y":0,"w":8,"h":24}, "rotated": true,
              "sourceSize": {"w":8,"h":30}, "spriteSourceSize": {"x":0,"y":3}, "pivot": {"x":0.0,"y":0.0} },
            { "frame": {"x":40,"y":0,"w":12,"h":12}, "rotated": false,
              "sourceSize": {"w":12,"h":12}, "spriteSourceSize": {"x":0,"y":0}, "pivot": {"x":1.0,"y":1.0} }
        ],
        "meta": { "image": "atlas.png", "size": {"w":64,"h":32} }
    }"#;

    // ── loading ───────────────────────────────────────────────────────────

    #[test]
    fn sheet_size_is_max_source_size() {
        let h = Harness::new();
        let sheet = SpriteSheet::parse(SHEET).unwrap();
        let sprite = Sprite::from_sheet(&sheet, false, h.deps()).unwrap();
        let s = sprite.borrow();
        assert_eq!(s.frames().len(), 3);
        assert_eq!(s.size(), Size2::new(20.0, 30.0));
    }

    #[test]
    fn from_file_dispatches_on_extension() {
        let h = Harness::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.JSON");
        std::fs::write(&path, SHEET).unwrap();

        let sprite = Sprite::from_file(&path, false, h.deps()).unwrap();
        assert_eq!(sprite.borrow().frames().len(), 3);
    }

    #[test]
    fn from_file_fails_on_malformed_sheet() {
        let h = Harness::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "frames": [ { "rotated": false } ], "meta": {} }"#).unwrap();

        assert!(matches!(Sprite::from_file(&path, false, h.deps()), Err(LoadError::Parse { .. })));
        assert!(matches!(
            Sprite::from_file(dir.path().join("absent.json"), false, h.deps()),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn sheet_with_unknown_atlas_fails() {
        let h = Harness::new();
        let sheet = SpriteSheet::parse(&SHEET.replace("atlas.png", "nowhere.png")).unwrap();
        assert!(Sprite::from_sheet(&sheet, false, h.deps()).is_err());
    }

    #[test]
    fn missing_shader_fails_the_load() {
        struct NoShaders<'a>(&'a Cache);

        impl ResourceCache for NoShaders<'_> {
            fn texture(&self, name: &str, mipmaps: bool) -> Result<Arc<dyn Texture>, LoadError> {
                self.0.texture(name, mipmaps)
            }
            fn shader(&self, _name: &str) -> Option<Arc<dyn Shader>> {
                None
            }
            fn blend_state(&self, name: &str) -> Option<Arc<dyn BlendState>> {
                self.0.blend_state(name)
            }
        }

        let h = Harness::new();
        let cache = NoShaders(&h.cache);
        let deps = SpriteDeps { renderer: &h.renderer, cache: &cache, scheduler: &h.scheduler };
        assert!(matches!(
            Sprite::from_texture(h.atlas(), deps),
            Err(LoadError::MissingShader(_))
        ));
    }

    #[test]
    fn single_image_is_one_centered_frame() {
        let h = Harness::new();
        let sprite = Sprite::from_texture(h.atlas(), h.deps()).unwrap();
        let s = sprite.borrow();
        assert_eq!(s.size(), Size2::new(64.0, 32.0));
        assert_eq!(s.frames().len(), 1);
        assert_eq!(s.frames()[0].rect(), Rect::new(-32.0, -16.0, 64.0, 32.0));
        assert_eq!(
            s.frames()[0].vertices().map(|v| v.tex_coord),
            [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]]
        );
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn local_rect_applies_pivot_and_trim() {
        let r = frame_local_rect(
            Rect::new(0.0, 0.0, 16.0, 16.0),
            Size2::new(20.0, 16.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(0.5, 0.5),
        );
        assert_eq!(r, Rect::new(-8.0, -8.0, 16.0, 16.0));

        // Trim at the top of the source image moves the quad down (+Y is up).
        let r = frame_local_rect(
            Rect::new(0.0, 0.0, 8.0, 24.0),
            Size2::new(8.0, 30.0),
            Vec2::new(0.0, 3.0),
            Vec2::zero(),
        );
        assert_eq!(r, Rect::new(0.0, 3.0, 8.0, 24.0));
    }

    #[test]
    fn rotated_uvs_are_the_unrotated_mapping_turned_90_degrees() {
        let tex = Size2::new(64.0, 32.0);
        // A 16x8 region stored rotated occupies 8x16 pixels at (16, 0).
        let rotated = frame_tex_coords(Rect::new(16.0, 0.0, 16.0, 8.0), true, tex);
        assert_eq!(rotated, [[0.25, 0.0], [0.25, 0.5], [0.375, 0.0], [0.375, 0.5]]);

        // The same pixels addressed as an unrotated 8x16 region.
        let plain = frame_tex_coords(Rect::new(16.0, 0.0, 8.0, 16.0), false, tex);
        assert_eq!(plain, [[0.25, 0.5], [0.375, 0.5], [0.25, 0.0], [0.375, 0.0]]);

        // Each rotated corner takes the UV of its neighbour in the unrotated
        // quad, walking bottom-left -> bottom-right -> top-right -> top-left.
        assert_eq!(rotated[0], plain[2]);
        assert_eq!(rotated[1], plain[0]);
        assert_eq!(rotated[3], plain[1]);
        assert_eq!(rotated[2], plain[3]);
    }

    #[test]
    fn vertices_use_quad_winding() {
        let h = Harness::new();
        let sprite = h.strip(1);
        let s = sprite.borrow();
        let v = s.frames()[0].vertices();
        assert_eq!(v[0].position, [-4.0, -4.0, 0.0]);
        assert_eq!(v[1].position, [4.0, -4.0, 0.0]);
        assert_eq!(v[2].position, [-4.0, 4.0, 0.0]);
        assert_eq!(v[3].position, [4.0, 4.0, 0.0]);
        assert_eq!(s.frames()[0].mesh_buffer().index_count(), 6);
    }

    #[test]
    fn bounding_box_contains_every_added_frame_and_never_shrinks() {
        let h = Harness::new();
        let sheet = SpriteSheet::parse(SHEET).unwrap();
        let texture = h.atlas();
        let sprite = Sprite::empty(h.deps()).unwrap();
        let mut previous: Option<Rect> = None;

        for frame in &sheet.frames {
            let mut s = sprite.borrow_mut();
            s.add_frame(
                &h.renderer,
                FrameSource {
                    rect: frame.rect(),
                    texture: Arc::clone(&texture),
                    rotated: frame.rotated,
                    source_size: frame.source_size(),
                    source_offset: frame.source_offset(),
                    pivot: frame.pivot(),
                },
            )
            .unwrap();

            let added = s.frames().last().unwrap().rect();
            let bb = s.bounding_box();
            assert!(bb.contains_point(added.min()));
            assert!(bb.contains_point(added.max()));

            if let Some(prev) = previous {
                assert!(bb.contains_point(prev.min()));
                assert!(bb.contains_point(prev.max()));
            }
            previous = bb.to_rect();
        }
    }

    #[test]
    fn set_offset_moves_vertices_and_recomputes_bounds() {
        let h = Harness::new();
        let sprite = h.strip(2);
        let mut s = sprite.borrow_mut();
        s.set_offset(Vec2::new(10.0, 20.0));

        assert_eq!(s.frames()[0].vertices()[0].position, [6.0, 16.0, 0.0]);
        assert_eq!(s.frames()[1].vertices()[3].position, [14.0, 24.0, 0.0]);
        assert_eq!(s.bounding_box().to_rect(), Some(Rect::new(6.0, 16.0, 8.0, 8.0)));
        assert_eq!(h.renderer.update_queue().len(), 2);

        s.set_offset(Vec2::zero());
        assert_eq!(s.bounding_box().to_rect(), Some(Rect::new(-4.0, -4.0, 8.0, 8.0)));
    }

    #[test]
    fn frames_added_after_offset_are_placed_with_it() {
        let h = Harness::new();
        let sprite = h.strip(1);
        sprite.borrow_mut().set_offset(Vec2::new(100.0, 0.0));
        let mut s = sprite.borrow_mut();
        s.add_frame(
            &h.renderer,
            FrameSource {
                rect: Rect::new(0.0, 0.0, 8.0, 8.0),
                texture: h.atlas(),
                rotated: false,
                source_size: Size2::new(8.0, 8.0),
                source_offset: Vec2::zero(),
                pivot: Vec2::new(0.5, 0.5),
            },
        )
        .unwrap();
        assert_eq!(s.frames()[1].vertices()[0].position, [96.0, -4.0, 0.0]);
    }

    #[test]
    fn color_and_opacity_rewrite_every_vertex() {
        let h = Harness::new();
        let sprite = h.strip(3);
        let mut s = sprite.borrow_mut();
        h.renderer.process_updates();

        s.set_color(Color::rgba(10, 20, 30, 200));
        s.set_opacity(0.5);

        for frame in s.frames() {
            for v in frame.vertices() {
                assert_eq!(v.color, Color::rgba(10, 20, 30, 100));
            }
        }
        // Both calls re-staged the same three buffers; each is queued once.
        assert_eq!(h.renderer.process_updates(), 3);
    }

    // ── playback ──────────────────────────────────────────────────────────

    #[test]
    fn play_once_stops_on_last_frame() {
        let h = Harness::new();
        let sprite = h.strip(4);
        sprite.borrow_mut().play(false, 0.25);
        assert!(sprite.borrow().is_scheduled());

        h.scheduler.update(0.75);
        let s = sprite.borrow();
        assert_eq!(s.current_frame(), 3);
        assert!(!s.is_playing());
        assert!(!s.is_scheduled());
        assert!(h.scheduler.is_empty());
    }

    #[test]
    fn play_once_with_large_delta_clamps() {
        let h = Harness::new();
        let sprite = h.strip(4);
        sprite.borrow_mut().play(false, 0.25);
        h.scheduler.update(10.0);
        assert_eq!(sprite.borrow().current_frame(), 3);
        assert!(!sprite.borrow().is_playing());
    }

    #[test]
    fn repeat_wraps_after_full_cycle() {
        let h = Harness::new();
        let sprite = h.strip(4);
        sprite.borrow_mut().play(true, 0.25);
        h.scheduler.update(1.0);
        let s = sprite.borrow();
        assert_eq!(s.current_frame(), 0);
        assert!(s.is_playing());
        assert_eq!(s.time_since_last_frame(), 0.0);
    }

    #[test]
    fn split_ticks_match_one_tick() {
        for repeat in [true, false] {
            let h = Harness::new();
            let whole = h.strip(5);
            let split = h.strip(5);
            whole.borrow_mut().play(repeat, 0.125);
            split.borrow_mut().play(repeat, 0.125);

            whole.borrow_mut().tick(1.375);
            for dt in [0.0625, 0.5, 0.3125, 0.125, 0.25, 0.125] {
                split.borrow_mut().tick(dt);
            }

            let (w, s) = (whole.borrow(), split.borrow());
            assert_eq!(w.current_frame(), s.current_frame(), "repeat = {repeat}");
            assert_eq!(w.time_since_last_frame(), s.time_since_last_frame(), "repeat = {repeat}");
        }
    }

    #[test]
    fn large_step_relative_to_interval_finishes() {
        let h = Harness::new();
        let sprite = h.strip(2);
        sprite.borrow_mut().play(true, 0.01);
        sprite.borrow_mut().tick(1.0e6);
        {
            let s = sprite.borrow();
            assert!(s.is_playing());
            assert!(s.current_frame() < 2);
            assert!(s.time_since_last_frame() < 0.01);
        }

        sprite.borrow_mut().play(true, 1.0e-9);
        sprite.borrow_mut().tick(0.25);
        assert!(sprite.borrow().time_since_last_frame() < 1.0e-9);

        let once = h.strip(3);
        once.borrow_mut().play(false, 0.01);
        once.borrow_mut().tick(1.0e6);
        assert_eq!(once.borrow().current_frame(), 2);
        assert!(!once.borrow().is_playing());
    }

    #[test]
    fn non_finite_dt_is_ignored() {
        let h = Harness::new();
        let sprite = h.strip(3);
        sprite.borrow_mut().play(true, 0.5);
        sprite.borrow_mut().tick(f32::NAN);
        sprite.borrow_mut().tick(f32::INFINITY);
        assert_eq!(sprite.borrow().time_since_last_frame(), 0.0);

        sprite.borrow_mut().tick(0.5);
        assert_eq!(sprite.borrow().current_frame(), 1);
        assert!(sprite.borrow().is_playing());
    }

    #[test]
    fn zero_or_negative_interval_stops() {
        let h = Harness::new();
        let sprite = h.strip(3);
        sprite.borrow_mut().play(true, 0.5);
        sprite.borrow_mut().play(true, 0.0);
        assert!(!sprite.borrow().is_playing());
        assert!(h.scheduler.is_empty());

        sprite.borrow_mut().play(true, -1.0);
        assert!(!sprite.borrow().is_playing());
    }

    #[test]
    fn single_frame_sprite_never_plays() {
        let h = Harness::new();
        let sprite = h.strip(1);
        sprite.borrow_mut().play(true, 0.1);
        assert!(!sprite.borrow().is_playing());
        assert!(h.scheduler.is_empty());
    }

    #[test]
    fn replay_after_finishing_restarts_from_first_frame() {
        let h = Harness::new();
        let sprite = h.strip(3);
        sprite.borrow_mut().play(false, 0.5);
        h.scheduler.update(5.0);
        assert_eq!(sprite.borrow().current_frame(), 2);

        sprite.borrow_mut().play(false, 0.5);
        assert_eq!(sprite.borrow().current_frame(), 0);
        assert!(sprite.borrow().is_playing());
    }

    #[test]
    fn stop_with_reset_rewinds() {
        let h = Harness::new();
        let sprite = h.strip(4);
        sprite.borrow_mut().play(true, 0.5);
        h.scheduler.update(1.25);
        assert_eq!(sprite.borrow().current_frame(), 2);

        sprite.borrow_mut().stop(false);
        assert_eq!(sprite.borrow().current_frame(), 2);
        assert!(h.scheduler.is_empty());

        sprite.borrow_mut().stop(true);
        assert_eq!(sprite.borrow().current_frame(), 0);
        assert_eq!(sprite.borrow().time_since_last_frame(), 0.0);
    }

    #[test]
    fn dropping_a_playing_sprite_deregisters_it() {
        let h = Harness::new();
        let sprite = h.strip(2);
        sprite.borrow_mut().play(true, 0.1);
        assert_eq!(h.scheduler.len(), 1);
        drop(sprite);
        assert!(h.scheduler.is_empty());
    }

    // ── drawing ───────────────────────────────────────────────────────────

    #[test]
    fn draw_queues_the_current_frame() {
        let mut h = Harness::new();
        let sprite = h.strip(3);
        sprite.borrow_mut().play(true, 1.0);
        h.scheduler.update(1.0);

        let projection = Mat4::orthographic_rh(0.0, 100.0, 0.0, 100.0, -1.0, 1.0);
        let transform = Mat4::from_translation(glam::Vec3::new(5.0, 5.0, 0.0));
        sprite.borrow().draw(&mut h.renderer, &projection, &transform, Color::WHITE);
        h.renderer.flush_draw_commands();
        assert_eq!(h.renderer.present(), PresentStatus::Swapped);

        let queue = h.renderer.draw_queue();
        assert_eq!(queue.len(), 1);
        let cmd = &queue[0];
        assert_eq!(cmd.mesh_buffer.id(), sprite.borrow().frames()[1].mesh_buffer().id());
        assert_eq!(cmd.index_count, 6);
        assert_eq!(cmd.textures.len(), 1);
        assert_eq!(cmd.vertex_shader_constants[0], (projection * transform).to_cols_array().to_vec());
        assert_eq!(cmd.pixel_shader_constants[0], vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_sprite_draws_nothing() {
        let mut h = Harness::new();
        let sprite = Sprite::empty(h.deps()).unwrap();
        sprite.borrow().draw(&mut h.renderer, &Mat4::IDENTITY, &Mat4::IDENTITY, Color::WHITE);
        assert!(h.renderer.active_draw_queue().is_empty());
    }
}
