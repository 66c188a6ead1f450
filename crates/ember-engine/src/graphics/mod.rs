//! Graphics subsystem (engine side).
//!
//! Scene code records `DrawCommand`s into the `Renderer`; the renderer
//! double-buffers them and hands a stable snapshot to a `GraphicsDevice`
//! backend once per frame. GPU API bindings live behind `GraphicsDevice`;
//! `headless` is the in-memory implementation shipped with the engine.

mod device;
mod draw;
mod error;
pub mod headless;
mod renderer;
mod resource;
mod update_queue;
mod vertex;

pub use device::{FrameStats, GraphicsDevice, MeshBufferDesc, TextureDesc};
pub use draw::{DrawCommand, DrawMode};
pub use error::GraphicsError;
pub use renderer::{PresentStatus, Renderer, RendererConfig, TextureFiltering};
pub use resource::{
    BlendMode, BlendState, MeshBuffer, RenderTarget, Resource, ResourceId, Shader, Texture,
};
pub use update_queue::UpdateQueue;
pub use vertex::{VertexAttribute, VertexPCT};
