//! Replays a full match against the simulation backends in virtual time.
//!
//! Competition control follows a real match schedule: a second of disabled
//! setup, a fifteen second autonomous period, then driver control until the
//! field disables the robot. Run with `RUST_LOG=info` to watch the phases,
//! or `RUST_LOG=telemetry` for the pose stream.

use core::time::Duration;
use std::rc::Rc;

use futures_util::future::select;
use talos::{
    auton::telemetry,
    gamepad::{ButtonLevels, JoystickState},
    prelude::*,
    setup,
    sim::gamepad::GamepadFrame,
};

fn main() {
    env_logger::init();

    println!(
        "{} | {} | {}",
        setup::TEAM_NUMBER,
        setup::TEAM_NAME,
        setup::TEAM_SCHOOL
    );

    let executor = Executor::with_clock(Rc::new(SimClock::new()));
    let timer = executor.timer();

    let robot = Robot::new(
        timer.clone(),
        SimChassis::with_config(timer.clone(), &setup::chassis_config()),
        SimPneumatics::new(timer.clone()),
        driver_script(),
        setup::route_table(),
        RouteSelector::new(setup::DEFAULT_ROUTE),
    );
    let chassis = robot.chassis();

    executor
        .spawn(telemetry::report(
            robot.chassis(),
            robot.actuator_states(),
            timer.clone(),
            telemetry::DEFAULT_PERIOD,
        ))
        .detach();

    let connected = CompetitionStatus::CONNECTED | CompetitionStatus::SYSTEM;
    let status = ScriptedStatus::new(
        timer.clone(),
        [
            (Duration::ZERO, connected | CompetitionStatus::DISABLED),
            (
                Duration::from_secs(1),
                connected | CompetitionStatus::AUTONOMOUS,
            ),
            (Duration::from_secs(16), connected),
            (Duration::from_secs(30), connected | CompetitionStatus::DISABLED),
        ],
    );

    executor.block_on(async {
        let match_play = Box::pin(robot.compete(status, timer.clone()));
        let horizon = timer.sleep(Duration::from_secs(31));

        select(match_play, horizon).await;
    });

    println!(
        "match over at t+{:.1}s, final pose {}",
        timer.now().since_start().as_secs_f64(),
        chassis.pose(),
    );
}

/// The driver: ease forward, pop the front wings, then hold course.
fn driver_script() -> ScriptedGamepad {
    let forward = JoystickState::new(0.0, 0.85);
    let b_down = ButtonLevels {
        b: true,
        ..ButtonLevels::default()
    };

    ScriptedGamepad::from_frames([
        GamepadFrame::neutral(),
        GamepadFrame::neutral().with_sticks(forward, JoystickState::default()),
        GamepadFrame::holding(b_down).with_sticks(forward, JoystickState::default()),
        GamepadFrame::neutral().with_sticks(forward, JoystickState::new(0.25, 0.0)),
    ])
}
