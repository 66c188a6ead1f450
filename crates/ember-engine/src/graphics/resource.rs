//! Opaque GPU resource handles.
//!
//! Backends implement these traits; the engine only passes `Arc<dyn _>`
//! handles around. Draw commands and sprite frames share the same handles, so
//! a resource lives as long as its longest holder.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Size2;

/// Process-unique resource identity used to deduplicate upload requests.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ResourceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Base contract for every backend resource.
pub trait Resource: Send + Sync {
    fn id(&self) -> ResourceId;

    /// Moves staged CPU-side data into backend storage.
    ///
    /// Called by `Renderer::process_updates` for every resource drained from the
    /// update queue. Resources without staged data do nothing.
    fn upload(&self) {}
}

pub trait Texture: Resource {
    /// Size in pixels.
    fn size(&self) -> Size2;

    fn mipmaps(&self) -> bool;
}

pub trait Shader: Resource {
    fn name(&self) -> &str;
}

/// How a draw is composited into the target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Blending disabled.
    Opaque,
    /// `src * a + dst * (1 - a)`.
    Alpha,
    /// `src * a + dst`.
    Additive,
}

pub trait BlendState: Resource {
    fn mode(&self) -> BlendMode;
}

/// Index + vertex storage for one mesh.
///
/// Indices are fixed at creation. Vertex data can be re-uploaded; the new data
/// is staged and the buffer schedules itself for upload with the renderer.
pub trait MeshBuffer: Resource {
    fn index_count(&self) -> u32;

    fn vertex_count(&self) -> u32;

    /// Stages `count` vertices (raw bytes in the mesh vertex layout).
    fn upload_vertices(&self, data: &[u8], count: u32);
}

pub trait RenderTarget: Resource {
    fn size(&self) -> Size2;
}
