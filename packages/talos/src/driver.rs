//! Driver control.
//!
//! One loop owns the driver period: poll the gamepad, feed the sticks to
//! the drivetrain, and flip pneumatic latches on button press edges. The
//! loop never returns on its own; competition control cancels it when the
//! period ends.

use core::time::Duration;

use log::{debug, warn};
use talos_async::time::Timer;
use talos_core::{
    chassis::Chassis,
    gamepad::Gamepad,
    pneumatics::{ActuatorId, Pneumatics},
};

/// Tuning for the driver control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Time between gamepad polls.
    pub update_period: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            update_period: Duration::from_millis(10),
        }
    }
}

/// Latched actuator states for driver control.
///
/// Each actuator's button flips its latch on the press edge and writes the
/// new state out, so holding a button is the same as tapping it. The intake
/// latch starts set; its first flip commands a retract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverToggles {
    front_wings: bool,
    rear_wings: bool,
    intake: bool,
}

impl DriverToggles {
    /// Latch states at the start of driver control.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            front_wings: false,
            rear_wings: false,
            intake: true,
        }
    }

    /// The latched state for `id`.
    #[must_use]
    pub const fn get(&self, id: ActuatorId) -> bool {
        match id {
            ActuatorId::FrontWings => self.front_wings,
            ActuatorId::RearWings => self.rear_wings,
            ActuatorId::Intake => self.intake,
        }
    }

    /// Flips the latch for `id` and returns the new state.
    pub fn flip(&mut self, id: ActuatorId) -> bool {
        let latch = match id {
            ActuatorId::FrontWings => &mut self.front_wings,
            ActuatorId::RearWings => &mut self.rear_wings,
            ActuatorId::Intake => &mut self.intake,
        };

        *latch = !*latch;
        *latch
    }
}

impl Default for DriverToggles {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs driver control until cancelled.
///
/// Entry retracts every actuator, so the period starts from a known
/// pneumatic state no matter what autonomous left extended. Each update
/// maps the left stick's y axis to throttle and the right stick's x axis to
/// steering, then flips one latch per press edge: B for the front wings,
/// d-pad right for the rear wings, Y for the intake.
///
/// A failed gamepad read stops the drivetrain for that update and leaves
/// the latches alone.
pub async fn drive<C: Chassis, P: Pneumatics, G: Gamepad>(
    chassis: &C,
    pneumatics: &mut P,
    gamepad: &mut G,
    timer: &Timer,
    config: DriverConfig,
) {
    let mut toggles = DriverToggles::new();

    for id in ActuatorId::ALL {
        if let Err(error) = pneumatics.set(id, false) {
            warn!("{id} retract failed: {error}");
        }
    }

    loop {
        match gamepad.state() {
            Ok(state) => {
                chassis.arcade(state.left_stick.y(), state.right_stick.x());

                let bindings = [
                    (state.button_b, ActuatorId::FrontWings),
                    (state.button_right, ActuatorId::RearWings),
                    (state.button_y, ActuatorId::Intake),
                ];

                for (button, id) in bindings {
                    if button.is_now_pressed() {
                        let engaged = toggles.flip(id);
                        if let Err(error) = pneumatics.set(id, engaged) {
                            warn!("{id} write failed: {error}");
                        }
                    }
                }
            }
            Err(error) => {
                debug!("gamepad read failed: {error}; stopping drivetrain");
                chassis.arcade(0.0, 0.0);
            }
        }

        timer.sleep(config.update_period).await;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn latches_flip_on_each_press() {
        let mut toggles = DriverToggles::new();

        assert!(!toggles.get(ActuatorId::FrontWings));
        assert!(!toggles.get(ActuatorId::RearWings));
        assert!(toggles.get(ActuatorId::Intake));

        assert!(toggles.flip(ActuatorId::FrontWings));
        assert!(toggles.get(ActuatorId::FrontWings));
        assert!(!toggles.flip(ActuatorId::FrontWings));

        // Starts set, so the first flip retracts.
        assert!(!toggles.flip(ActuatorId::Intake));
        assert!(toggles.flip(ActuatorId::Intake));
    }

    #[cfg(feature = "sim")]
    #[test]
    fn presses_write_once_per_edge() {
        use std::rc::Rc;

        use futures_util::future::select;
        use talos_core::gamepad::ButtonLevels;

        use crate::{
            runtime::{Executor, SimClock},
            sim::{gamepad::GamepadFrame, ScriptedGamepad, SimChassis, SimPneumatics},
        };

        let executor = Executor::with_clock(Rc::new(SimClock::new()));
        let timer = executor.timer();

        let chassis = SimChassis::new(timer.clone());
        let mut pneumatics = SimPneumatics::new(timer.clone());

        let b_down = ButtonLevels {
            b: true,
            ..ButtonLevels::default()
        };
        let mut gamepad = ScriptedGamepad::from_frames([
            GamepadFrame::neutral(),
            GamepadFrame::holding(b_down),
            GamepadFrame::holding(b_down),
            GamepadFrame::neutral(),
        ]);

        executor.block_on(async {
            let control = drive(
                &chassis,
                &mut pneumatics,
                &mut gamepad,
                &timer,
                DriverConfig::default(),
            );
            let deadline = timer.sleep(Duration::from_millis(35));

            select(Box::pin(control), deadline).await;
        });

        let writes: Vec<_> = pneumatics
            .writes()
            .iter()
            .map(|write| (write.at, write.id, write.engaged))
            .collect();

        assert_eq!(
            writes,
            vec![
                (Duration::ZERO, ActuatorId::FrontWings, false),
                (Duration::ZERO, ActuatorId::RearWings, false),
                (Duration::ZERO, ActuatorId::Intake, false),
                (Duration::from_millis(10), ActuatorId::FrontWings, true),
            ],
        );
    }
}
