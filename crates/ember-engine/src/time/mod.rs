//! Time subsystem.
//!
//! - `FrameClock` turns wall-clock time into clamped per-frame deltas
//! - `TickScheduler` fans each delta out to registered `Tickable`s
//!   (sprite playback, animators)

mod frame_clock;
mod scheduler;

pub use frame_clock::{FrameClock, FrameTime};
pub use scheduler::{TickId, TickScheduler, Tickable};
