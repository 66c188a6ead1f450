//! Core engine-facing contracts.
//!
//! Defines the interface between the frame loop and applications: the `App`
//! trait, the per-frame context and the headless `Runtime` that owns the
//! renderer, resource cache and tick scheduler.

mod app;
mod ctx;
mod runtime;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use runtime::{Runtime, RuntimeConfig};
