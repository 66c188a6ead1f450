use std::collections::{BTreeMap, HashSet};

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::gamepad::{Gamepad, GamepadId};
use super::types::{ButtonAction, InputEvent, Key, Modifiers, MouseButton};

/// Current input state: held keys and buttons, pointer position, connected gamepads.
///
/// Transitions observed while applying events are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in view pixels; `None` while outside the surface.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,

    gamepads: BTreeMap<GamepadId, Gamepad>,
}

impl InputState {
    /// Applies `ev` to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(focused) => {
                self.focused = *focused;
                if !*focused {
                    // Releases are not delivered while unfocused.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(position) => {
                self.pointer_pos = Some(*position);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, action, modifiers, .. } => {
                self.modifiers = *modifiers;
                match action {
                    ButtonAction::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    ButtonAction::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton { button, action, position, modifiers } => {
                self.pointer_pos = Some(*position);
                self.modifiers = *modifiers;
                match action {
                    ButtonAction::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    ButtonAction::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }

            InputEvent::Text(text) => frame.text.push_str(text),

            InputEvent::GamepadConnected(id) => {
                log::info!("gamepad {} connected", id.0);
                self.gamepads.entry(*id).or_insert_with(|| Gamepad::new(*id));
            }

            InputEvent::GamepadDisconnected(id) => {
                log::info!("gamepad {} disconnected", id.0);
                self.gamepads.remove(id);
            }

            InputEvent::GamepadButton { gamepad, button, pressed, value } => {
                let pad = self.gamepads.entry(*gamepad).or_insert_with(|| Gamepad::new(*gamepad));
                frame
                    .gamepad_buttons
                    .push(pad.handle_button_value_change(*button, *pressed, *value));
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    pub fn gamepad(&self, id: GamepadId) -> Option<&Gamepad> {
        self.gamepads.get(&id)
    }

    /// Mutable access for player index and vibration settings.
    pub fn gamepad_mut(&mut self, id: GamepadId) -> Option<&mut Gamepad> {
        self.gamepads.get_mut(&id)
    }

    /// Connected gamepads ordered by id.
    pub fn gamepads(&self) -> impl Iterator<Item = &Gamepad> {
        self.gamepads.values()
    }
}
