//! Driver gamepad input.
//!
//! The driver loop polls a [`Gamepad`] once per update and acts on the
//! returned [`GamepadState`] snapshot. Button edges are part of the
//! snapshot, so toggle logic never misses a press between reads.

use snafu::Snafu;

/// The state of a button across the last two snapshots.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    prev_is_pressed: bool,
    is_pressed: bool,
}

impl ButtonState {
    /// Returns `true` if this button is currently being pressed.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// Returns `true` if this button is currently released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        !self.is_pressed
    }

    /// Returns `true` if the button was released in the previous call to
    /// [`Gamepad::state`], but is now pressed.
    #[must_use]
    pub const fn is_now_pressed(&self) -> bool {
        !self.prev_is_pressed && self.is_pressed
    }

    /// Returns `true` if the button was pressed in the previous call to
    /// [`Gamepad::state`], but is now released.
    #[must_use]
    pub const fn is_now_released(&self) -> bool {
        self.prev_is_pressed && !self.is_pressed
    }
}

/// How far a joystick sits from its center, from -1 to 1 on both axes.
///
/// On the x axis left is negative and right is positive. On the y axis down
/// is negative and up is positive.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct JoystickState {
    x: f64,
    y: f64,
}

impl JoystickState {
    /// Creates a stick position, clamping both axes into `[-1, 1]`.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    /// The joystick position on its x-axis.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The joystick position on its y-axis.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
}

/// The "pressed" level of every button in one sample.
///
/// Two consecutive samples build the edge-aware [`ButtonState`]s in a
/// [`GamepadState`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ButtonLevels {
    /// Button A level.
    pub a: bool,
    /// Button B level.
    pub b: bool,
    /// Button X level.
    pub x: bool,
    /// Button Y level.
    pub y: bool,
    /// D-pad up level.
    pub up: bool,
    /// D-pad down level.
    pub down: bool,
    /// D-pad left level.
    pub left: bool,
    /// D-pad right level.
    pub right: bool,
}

/// Holds a snapshot of the state of the gamepad.
///
/// Returned by [`Gamepad::state`].
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct GamepadState {
    /// Left joystick.
    pub left_stick: JoystickState,
    /// Right joystick.
    pub right_stick: JoystickState,

    /// Button A.
    pub button_a: ButtonState,
    /// Button B.
    pub button_b: ButtonState,
    /// Button X.
    pub button_x: ButtonState,
    /// Button Y.
    pub button_y: ButtonState,

    /// D-pad up.
    pub button_up: ButtonState,
    /// D-pad down.
    pub button_down: ButtonState,
    /// D-pad left.
    pub button_left: ButtonState,
    /// D-pad right.
    pub button_right: ButtonState,
}

impl GamepadState {
    /// Builds a snapshot from consecutive button samples and the current
    /// stick positions.
    #[must_use]
    pub fn from_levels(
        prev: ButtonLevels,
        now: ButtonLevels,
        left_stick: JoystickState,
        right_stick: JoystickState,
    ) -> Self {
        let button = |prev: bool, now: bool| ButtonState {
            prev_is_pressed: prev,
            is_pressed: now,
        };

        Self {
            left_stick,
            right_stick,
            button_a: button(prev.a, now.a),
            button_b: button(prev.b, now.b),
            button_x: button(prev.x, now.x),
            button_y: button(prev.y, now.y),
            button_up: button(prev.up, now.up),
            button_down: button(prev.down, now.down),
            button_left: button(prev.left, now.left),
            button_right: button(prev.right, now.right),
        }
    }
}

/// Errors reading the gamepad.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum GamepadError {
    /// The gamepad is not connected.
    #[snafu(display("gamepad is not connected"))]
    Offline,
}

/// Source of driver input.
pub trait Gamepad {
    /// Reads the current state of the sticks and buttons.
    ///
    /// Edge detection compares against the previous call, so the driver loop
    /// should call this exactly once per update.
    ///
    /// # Errors
    ///
    /// Returns [`GamepadError::Offline`] if the gamepad is disconnected.
    fn state(&mut self) -> Result<GamepadState, GamepadError>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edges_need_a_level_change() {
        let held = ButtonLevels {
            b: true,
            ..ButtonLevels::default()
        };
        let released = ButtonLevels::default();

        let rising = GamepadState::from_levels(
            released,
            held,
            JoystickState::default(),
            JoystickState::default(),
        );
        assert!(rising.button_b.is_now_pressed());
        assert!(rising.button_b.is_pressed());

        let holding = GamepadState::from_levels(
            held,
            held,
            JoystickState::default(),
            JoystickState::default(),
        );
        assert!(!holding.button_b.is_now_pressed());
        assert!(holding.button_b.is_pressed());

        let falling = GamepadState::from_levels(
            held,
            released,
            JoystickState::default(),
            JoystickState::default(),
        );
        assert!(falling.button_b.is_now_released());
        assert!(falling.button_b.is_released());
    }

    #[test]
    fn sticks_clamp_to_unit_range() {
        let stick = JoystickState::new(1.8, -0.25);
        assert_eq!(stick.x(), 1.0);
        assert_eq!(stick.y(), -0.25);
    }
}
