//! A gamepad that replays canned input.

use std::collections::VecDeque;

use talos_core::gamepad::{ButtonLevels, Gamepad, GamepadError, GamepadState, JoystickState};

/// One scripted poll result: everything a single [`Gamepad::state`] call
/// observes.
#[derive(Debug, Default, Clone, Copy)]
pub struct GamepadFrame {
    /// Button levels for this sample.
    pub buttons: ButtonLevels,
    /// Left stick position for this sample.
    pub left_stick: JoystickState,
    /// Right stick position for this sample.
    pub right_stick: JoystickState,
    /// Whether the gamepad reads as unplugged for this sample.
    pub offline: bool,
}

impl GamepadFrame {
    /// A frame with everything released and both sticks centered.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// A frame holding `buttons` with both sticks centered.
    #[must_use]
    pub fn holding(buttons: ButtonLevels) -> Self {
        Self {
            buttons,
            ..Self::default()
        }
    }

    /// A frame on which the gamepad reads as disconnected.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// This frame with the stick positions replaced.
    #[must_use]
    pub fn with_sticks(self, left: JoystickState, right: JoystickState) -> Self {
        Self {
            left_stick: left,
            right_stick: right,
            ..self
        }
    }
}

/// A [`Gamepad`] that yields one scripted frame per poll.
///
/// Once the script runs out the final frame repeats forever, so a loop
/// polling every update keeps seeing a held controller rather than one
/// flickering back to neutral.
#[derive(Debug, Default)]
pub struct ScriptedGamepad {
    frames: VecDeque<GamepadFrame>,
    last: GamepadFrame,
    previous: ButtonLevels,
}

impl ScriptedGamepad {
    /// Creates a gamepad that reads neutral forever.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gamepad that replays `frames` in order.
    pub fn from_frames(frames: impl IntoIterator<Item = GamepadFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Appends a frame to the script.
    pub fn push(&mut self, frame: GamepadFrame) {
        self.frames.push_back(frame);
    }
}

impl Gamepad for ScriptedGamepad {
    fn state(&mut self) -> Result<GamepadState, GamepadError> {
        let frame = self.frames.pop_front().unwrap_or(self.last);
        self.last = frame;

        if frame.offline {
            // A failed read observes nothing; edges still compare against
            // the last successful poll.
            return Err(GamepadError::Offline);
        }

        let state = GamepadState::from_levels(
            self.previous,
            frame.buttons,
            frame.left_stick,
            frame.right_stick,
        );
        self.previous = frame.buttons;
        Ok(state)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn replays_frames_then_holds_the_last() {
        let held = ButtonLevels {
            b: true,
            ..ButtonLevels::default()
        };
        let mut gamepad =
            ScriptedGamepad::from_frames([GamepadFrame::neutral(), GamepadFrame::holding(held)]);

        let first = gamepad.state().unwrap();
        assert!(first.button_b.is_released());

        let second = gamepad.state().unwrap();
        assert!(second.button_b.is_now_pressed());

        // Script exhausted: the held frame repeats, no new edge.
        let third = gamepad.state().unwrap();
        assert!(third.button_b.is_pressed());
        assert!(!third.button_b.is_now_pressed());
    }

    #[test]
    fn offline_frames_do_not_disturb_edges() {
        let held = ButtonLevels {
            y: true,
            ..ButtonLevels::default()
        };
        let mut gamepad = ScriptedGamepad::from_frames([
            GamepadFrame::neutral(),
            GamepadFrame::offline(),
            GamepadFrame::holding(held),
        ]);

        assert!(gamepad.state().is_ok());
        assert_eq!(gamepad.state(), Err(GamepadError::Offline));

        // The press still reads as an edge against the last good poll.
        let state = gamepad.state().unwrap();
        assert!(state.button_y.is_now_pressed());
    }

    #[test]
    fn sticks_ride_along_with_frames() {
        let frame = GamepadFrame::neutral()
            .with_sticks(JoystickState::new(0.0, 0.8), JoystickState::new(-0.4, 0.0));
        let mut gamepad = ScriptedGamepad::from_frames([frame]);

        let state = gamepad.state().unwrap();
        assert_eq!(state.left_stick.y(), 0.8);
        assert_eq!(state.right_stick.x(), -0.4);
    }
}
