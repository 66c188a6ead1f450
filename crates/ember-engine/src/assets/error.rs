use std::fmt;
use std::path::PathBuf;

use crate::graphics::GraphicsError;

/// Load-time failure of a sprite, sprite sheet, or cached resource.
///
/// Nothing partially loaded is handed back when one of these is returned.
#[derive(Debug)]
pub enum LoadError {
    /// A file could not be opened or read.
    Io { path: PathBuf, source: std::io::Error },

    /// A sprite sheet is not valid JSON or misses a required field.
    Parse { path: PathBuf, source: serde_json::Error },

    /// An image file could not be decoded.
    Image { path: PathBuf, source: image::ImageError },

    /// The backend refused to create a resource.
    Graphics(GraphicsError),

    MissingShader(String),
    MissingBlendState(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, .. } => write!(f, "failed to open {}", path.display()),
            LoadError::Parse { path, .. } => write!(f, "failed to parse {}", path.display()),
            LoadError::Image { path, .. } => write!(f, "failed to decode image {}", path.display()),
            LoadError::Graphics(err) => write!(f, "graphics backend error: {err}"),
            LoadError::MissingShader(name) => write!(f, "shader not found: {name}"),
            LoadError::MissingBlendState(name) => write!(f, "blend state not found: {name}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
            LoadError::Image { source, .. } => Some(source),
            LoadError::Graphics(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GraphicsError> for LoadError {
    fn from(err: GraphicsError) -> Self {
        LoadError::Graphics(err)
    }
}
