use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::graphics::{BlendMode, BlendState, GraphicsDevice, Shader, Texture, TextureDesc};

use super::LoadError;

/// Built-in shader for textured, vertex-colored geometry.
pub const SHADER_TEXTURE: &str = "shader_texture";
/// Built-in shader for untextured, vertex-colored geometry.
pub const SHADER_COLOR: &str = "shader_color";

pub const BLEND_NO_BLEND: &str = "blend_no_blend";
pub const BLEND_ADD: &str = "blend_add";
pub const BLEND_ALPHA: &str = "blend_alpha";

/// Named lookup of shared GPU resources.
///
/// Sprites resolve every texture, shader and blend state through this trait,
/// so tests and tools can substitute their own resolver.
pub trait ResourceCache {
    /// Returns the texture registered as `name`, loading it on first use.
    fn texture(&self, name: &str, mipmaps: bool) -> Result<Arc<dyn Texture>, LoadError>;

    fn shader(&self, name: &str) -> Option<Arc<dyn Shader>>;

    fn blend_state(&self, name: &str) -> Option<Arc<dyn BlendState>>;
}

/// Default `ResourceCache`: name maps backed by a `GraphicsDevice`.
///
/// Unknown texture names are treated as image paths relative to the asset
/// root, decoded once, and kept for later lookups.
pub struct Cache {
    device: Arc<dyn GraphicsDevice>,
    root: PathBuf,
    textures: RefCell<HashMap<String, Arc<dyn Texture>>>,
    shaders: RefCell<HashMap<String, Arc<dyn Shader>>>,
    blend_states: RefCell<HashMap<String, Arc<dyn BlendState>>>,
}

impl Cache {
    /// Creates a cache with the built-in shaders and blend states registered.
    pub fn new(device: Arc<dyn GraphicsDevice>, root: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let cache = Self {
            device,
            root: root.into(),
            textures: RefCell::new(HashMap::new()),
            shaders: RefCell::new(HashMap::new()),
            blend_states: RefCell::new(HashMap::new()),
        };

        for name in [SHADER_TEXTURE, SHADER_COLOR] {
            let shader = cache.device.create_shader(name)?;
            cache.insert_shader(name, shader);
        }

        for (name, mode) in [
            (BLEND_NO_BLEND, BlendMode::Opaque),
            (BLEND_ADD, BlendMode::Additive),
            (BLEND_ALPHA, BlendMode::Alpha),
        ] {
            let blend = cache.device.create_blend_state(mode)?;
            cache.insert_blend_state(name, blend);
        }

        log::debug!("resource cache ready (root: {})", cache.root.display());
        Ok(cache)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn insert_texture(&self, name: &str, texture: Arc<dyn Texture>) {
        self.textures.borrow_mut().insert(name.to_string(), texture);
    }

    /// Uploads `image` as a texture registered under `name`.
    pub fn insert_image(
        &self,
        name: &str,
        image: &image::RgbaImage,
        mipmaps: bool,
    ) -> Result<Arc<dyn Texture>, LoadError> {
        let texture = self.device.create_texture(TextureDesc {
            width: image.width(),
            height: image.height(),
            pixels: Some(image.as_raw()),
            mipmaps,
        })?;
        self.insert_texture(name, Arc::clone(&texture));
        Ok(texture)
    }

    pub fn insert_shader(&self, name: &str, shader: Arc<dyn Shader>) {
        self.shaders.borrow_mut().insert(name.to_string(), shader);
    }

    pub fn insert_blend_state(&self, name: &str, blend_state: Arc<dyn BlendState>) {
        self.blend_states.borrow_mut().insert(name.to_string(), blend_state);
    }

    /// Forgets every cached texture. Holders keep their handles alive.
    pub fn release_textures(&self) {
        self.textures.borrow_mut().clear();
    }

    pub fn texture_count(&self) -> usize {
        self.textures.borrow().len()
    }

    fn load_texture(&self, name: &str, mipmaps: bool) -> Result<Arc<dyn Texture>, LoadError> {
        let path = self.root.join(name);
        let image = image::open(&path)
            .map_err(|source| match source {
                image::ImageError::IoError(source) => LoadError::Io { path: path.clone(), source },
                source => LoadError::Image { path: path.clone(), source },
            })?
            .to_rgba8();

        log::debug!("loaded texture {} ({}x{})", path.display(), image.width(), image.height());
        self.insert_image(name, &image, mipmaps)
    }
}

impl ResourceCache for Cache {
    fn texture(&self, name: &str, mipmaps: bool) -> Result<Arc<dyn Texture>, LoadError> {
        if let Some(texture) = self.textures.borrow().get(name) {
            return Ok(Arc::clone(texture));
        }
        self.load_texture(name, mipmaps)
    }

    fn shader(&self, name: &str) -> Option<Arc<dyn Shader>> {
        self.shaders.borrow().get(name).cloned()
    }

    fn blend_state(&self, name: &str) -> Option<Arc<dyn BlendState>> {
        self.blend_states.borrow().get(name).cloned()
    }
}
