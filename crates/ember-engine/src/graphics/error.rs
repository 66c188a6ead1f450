use std::fmt;
use std::path::PathBuf;

/// Error raised by a graphics backend while creating resources or writing
/// backend-side artifacts.
#[derive(Debug)]
pub enum GraphicsError {
    /// The backend rejected a resource description.
    InvalidResource(String),

    /// Texture pixel data does not match the declared size.
    PixelDataMismatch { expected: usize, actual: usize },

    /// Writing a screenshot failed.
    Screenshot { path: PathBuf, source: image::ImageError },
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::InvalidResource(msg) => write!(f, "invalid resource: {msg}"),
            GraphicsError::PixelDataMismatch { expected, actual } => {
                write!(f, "pixel data has {actual} bytes, expected {expected}")
            }
            GraphicsError::Screenshot { path, .. } => {
                write!(f, "failed to write screenshot {}", path.display())
            }
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::Screenshot { source, .. } => Some(source),
            _ => None,
        }
    }
}
