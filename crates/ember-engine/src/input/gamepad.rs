/// Backend-assigned gamepad identifier, stable while the device stays connected.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GamepadId(pub u32);

/// Gamepad buttons, including thumbstick directions reported as buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GamepadButton {
    DpadLeft,
    DpadRight,
    DpadUp,
    DpadDown,
    FaceBottom,
    FaceRight,
    FaceLeft,
    FaceTop,
    LeftShoulder,
    LeftTrigger,
    RightShoulder,
    RightTrigger,
    LeftThumb,
    RightThumb,
    Start,
    Back,
    Pause,
    LeftThumbLeft,
    LeftThumbRight,
    LeftThumbUp,
    LeftThumbDown,
    RightThumbLeft,
    RightThumbRight,
    RightThumbUp,
    RightThumbDown,
}

impl GamepadButton {
    pub const COUNT: usize = 25;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Motor {
    All,
    Left,
    Right,
}

/// Last reported state of one button. `value` is the analog amount in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ButtonState {
    pub pressed: bool,
    pub value: f32,
}

/// Button change with the state it replaced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GamepadButtonEvent {
    pub gamepad: GamepadId,
    pub button: GamepadButton,
    pub pressed: bool,
    pub previous_pressed: bool,
    pub value: f32,
    pub previous_value: f32,
}

/// Tracked state of one connected gamepad.
#[derive(Debug, Clone)]
pub struct Gamepad {
    id: GamepadId,
    player_index: Option<u32>,
    absolute_dpad_values: bool,
    buttons: [ButtonState; GamepadButton::COUNT],
    vibration: [f32; 2],
}

impl Gamepad {
    pub fn new(id: GamepadId) -> Self {
        Self {
            id,
            player_index: None,
            absolute_dpad_values: false,
            buttons: [ButtonState::default(); GamepadButton::COUNT],
            vibration: [0.0; 2],
        }
    }

    pub fn id(&self) -> GamepadId {
        self.id
    }

    /// Player slot (controller LED), if one was assigned.
    pub fn player_index(&self) -> Option<u32> {
        self.player_index
    }

    pub fn set_player_index(&mut self, index: Option<u32>) {
        self.player_index = index;
    }

    /// Whether the D-pad reports absolute directions regardless of device orientation.
    pub fn absolute_dpad_values(&self) -> bool {
        self.absolute_dpad_values
    }

    pub fn set_absolute_dpad_values(&mut self, absolute: bool) {
        self.absolute_dpad_values = absolute;
    }

    pub fn button_state(&self, button: GamepadButton) -> ButtonState {
        self.buttons[button.index()]
    }

    pub fn is_pressed(&self, button: GamepadButton) -> bool {
        self.buttons[button.index()].pressed
    }

    /// Records a new button report and returns it paired with the previous state.
    pub fn handle_button_value_change(
        &mut self,
        button: GamepadButton,
        pressed: bool,
        value: f32,
    ) -> GamepadButtonEvent {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let slot = &mut self.buttons[button.index()];

        let event = GamepadButtonEvent {
            gamepad: self.id,
            button,
            pressed,
            previous_pressed: slot.pressed,
            value,
            previous_value: slot.value,
        };

        *slot = ButtonState { pressed, value };
        event
    }

    /// Sets motor speed, clamped to `[0, 1]`. `Motor::All` drives both motors.
    pub fn set_vibration(&mut self, motor: Motor, speed: f32) {
        let speed = if speed.is_nan() { 0.0 } else { speed.clamp(0.0, 1.0) };
        match motor {
            Motor::All => self.vibration = [speed; 2],
            Motor::Left => self.vibration[0] = speed,
            Motor::Right => self.vibration[1] = speed,
        }
    }

    /// Current motor speed; `Motor::All` reports the stronger of the two.
    pub fn vibration(&self, motor: Motor) -> f32 {
        match motor {
            Motor::All => self.vibration[0].max(self.vibration[1]),
            Motor::Left => self.vibration[0],
            Motor::Right => self.vibration[1],
        }
    }
}
