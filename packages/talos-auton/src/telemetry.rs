//! Periodic pose and actuator telemetry.

use core::time::Duration;
use std::{rc::Rc, sync::Arc};

use log::info;
use talos_async::time::Timer;
use talos_core::{chassis::Chassis, pneumatics::ActuatorStates};

/// Default reporting period.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(50);

/// Periodically logs the tracked pose, actuator states, and the hottest
/// drive motor.
///
/// Runs forever; spawn it as its own task and drop the handle to stop it.
/// It only reads shared state, so it observes the routine or driver loop
/// it runs beside without perturbing it.
pub async fn report<C: Chassis>(
    chassis: Rc<C>,
    actuators: Arc<ActuatorStates>,
    timer: Timer,
    period: Duration,
) {
    loop {
        let pose = chassis.pose();
        let hottest = chassis.drive_temperatures().into_iter().reduce(f64::max);

        match hottest {
            Some(temperature) => info!(
                target: "telemetry",
                "pose {pose} | {} | hottest drive motor {temperature:.1}°C",
                actuator_summary(&actuators),
            ),
            None => info!(target: "telemetry", "pose {pose} | {}", actuator_summary(&actuators)),
        }

        timer.sleep(period).await;
    }
}

fn actuator_summary(states: &ActuatorStates) -> String {
    states
        .snapshot()
        .iter()
        .map(|(id, engaged)| format!("{id}={}", if *engaged { "out" } else { "in" }))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use talos_core::pneumatics::ActuatorId;

    use super::*;

    #[test]
    fn summaries_name_every_actuator() {
        let states = ActuatorStates::new();
        states.set(ActuatorId::RearWings, true);

        assert_eq!(
            actuator_summary(&states),
            "front wings=in rear wings=out intake=in"
        );
    }
}
