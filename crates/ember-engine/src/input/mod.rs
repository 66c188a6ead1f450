//! Input subsystem.
//!
//! Public API is backend-agnostic. Backends translate their native events into
//! `InputEvent`s and feed them through `core::Runtime::push_input`.

mod frame;
mod gamepad;
mod state;
mod types;

pub use frame::InputFrame;
pub use gamepad::{ButtonState, Gamepad, GamepadButton, GamepadButtonEvent, GamepadId, Motor};
pub use state::InputState;
pub use types::{ButtonAction, InputEvent, Key, Modifiers, MouseButton, MouseWheelDelta};
