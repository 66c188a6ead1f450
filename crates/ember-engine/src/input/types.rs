use std::fmt;

use crate::coords::Vec2;

use super::gamepad::{GamepadButton, GamepadId};

/// Keyboard key identifier.
///
/// Backends map their key codes onto these variants; anything else arrives
/// as `Key::Unknown` carrying the backend's code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Unknown(u32),
}

/// Press/release transition shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonAction {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta: whole lines or high-precision pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line(Vec2),
    Pixel(Vec2),
}

/// Platform-agnostic input event fed into `InputState::apply_event`.
///
/// Pointer positions are in view pixels (top-left origin, +Y down), the space
/// `Renderer::view_to_screen_location` converts from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        action: ButtonAction,
        modifiers: Modifiers,
        /// True for auto-repeat presses.
        repeat: bool,
    },

    PointerMoved(Vec2),
    PointerButton {
        button: MouseButton,
        action: ButtonAction,
        position: Vec2,
        modifiers: Modifiers,
    },
    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },
    /// Pointer left the render surface.
    PointerLeft,

    /// Committed text (not IME composition).
    Text(String),

    Focused(bool),

    GamepadConnected(GamepadId),
    GamepadDisconnected(GamepadId),
    /// Raw button report from the backend. Previous values are filled in by
    /// the tracked `Gamepad` state.
    GamepadButton {
        gamepad: GamepadId,
        button: GamepadButton,
        pressed: bool,
        value: f32,
    },
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
