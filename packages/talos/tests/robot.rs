//! Whole-program tests: the competition robot assembled on the simulation
//! backends and replayed on virtual time.

#![cfg(feature = "sim")]

use core::time::Duration;
use std::rc::Rc;

use futures_util::future::select;
use talos::{
    auton::telemetry,
    gamepad::ButtonLevels,
    prelude::*,
    setup,
    sim::{gamepad::GamepadFrame, pneumatics::ActuatorWrite},
};

struct Rig {
    executor: Executor,
    timer: Timer,
    robot: Robot<SimChassis, SimPneumatics, ScriptedGamepad>,
}

fn rig(gamepad: ScriptedGamepad) -> Rig {
    let executor = Executor::with_clock(Rc::new(SimClock::new()));
    let timer = executor.timer();

    let robot = Robot::new(
        timer.clone(),
        SimChassis::with_config(timer.clone(), &setup::chassis_config()),
        SimPneumatics::new(timer.clone()),
        gamepad,
        setup::route_table(),
        RouteSelector::new(setup::DEFAULT_ROUTE),
    );

    Rig {
        executor,
        timer,
        robot,
    }
}

#[test]
fn autonomous_runs_the_selected_route() {
    let Rig {
        executor,
        mut robot,
        ..
    } = rig(ScriptedGamepad::new());
    let chassis = robot.chassis();

    executor.block_on(robot.autonomous());

    let calls = chassis.take_calls();
    assert_eq!(calls.len(), 14);
    assert_eq!(calls[0], ChassisCall::SetPose(Pose::new(35.5, -61.63, 0.0)));
    assert_eq!(
        calls[1],
        ChassisCall::MoveToPose {
            target: Pose::new(35.5, -9.63, 0.0),
            timeout: setup::DEFAULT_TIMEOUT,
            params: MoveToPoseParams::default(),
        }
    );
    assert_eq!(
        calls[2],
        ChassisCall::MoveToPose {
            target: Pose::new(35.5, -9.63, 90.0),
            timeout: setup::DEFAULT_TIMEOUT,
            params: MoveToPoseParams::default(),
        }
    );

    let writes: Vec<_> = robot
        .pneumatics()
        .inner()
        .writes()
        .iter()
        .map(|write| (write.id, write.engaged))
        .collect();
    assert_eq!(
        writes,
        vec![
            (ActuatorId::Intake, true),
            (ActuatorId::Intake, false),
            (ActuatorId::FrontWings, true),
            (ActuatorId::Intake, true),
            (ActuatorId::FrontWings, false),
            (ActuatorId::Intake, false),
        ],
    );

    // The opening drive is 52" up the field at a bit over 102 in/s; the
    // first intake write waits on it.
    let first = robot.pneumatics().inner().writes()[0].at;
    assert!(first >= Duration::from_millis(500) && first <= Duration::from_millis(520));
}

#[test]
fn the_empty_skills_slot_parks_the_robot() {
    let Rig {
        executor,
        timer,
        mut robot,
    } = rig(ScriptedGamepad::new());
    let chassis = robot.chassis();

    robot.selector().select(RouteId(3));
    executor.block_on(robot.autonomous());

    assert!(chassis.take_calls().is_empty());
    assert!(robot.pneumatics().inner().writes().is_empty());
    assert_eq!(timer.now().since_start(), Duration::ZERO);
}

#[test]
fn launching_pulses_the_front_wings() {
    let Rig {
        executor,
        mut robot,
        ..
    } = rig(ScriptedGamepad::new());

    robot.selector().select(RouteId(1));
    executor.block_on(robot.autonomous());

    let writes = robot.pneumatics().inner().writes();
    assert_eq!(
        (writes[0].id, writes[0].engaged),
        (ActuatorId::FrontWings, true)
    );
    assert_eq!(
        (writes[1].id, writes[1].engaged),
        (ActuatorId::FrontWings, false)
    );

    // Held through the 800ms launch window plus the drive back.
    assert!(writes[1].at - writes[0].at >= Duration::from_secs(1));
}

#[test]
fn a_full_match_replays_through_competition_control() {
    let b_down = ButtonLevels {
        b: true,
        ..ButtonLevels::default()
    };
    let mut gamepad = ScriptedGamepad::new();
    gamepad.push(GamepadFrame::neutral());
    gamepad.push(GamepadFrame::holding(b_down));
    gamepad.push(GamepadFrame::neutral());

    let Rig {
        executor,
        timer,
        robot,
    } = rig(gamepad);
    let chassis = robot.chassis();
    let states = robot.actuator_states();

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
        ],
    );

    executor.block_on(async {
        let match_play = Box::pin(robot.compete(status, timer.clone()));
        let horizon = timer.sleep(Duration::from_secs(17));

        select(match_play, horizon).await;
    });

    let calls = chassis.take_calls();
    assert_eq!(
        calls[0],
        ChassisCall::SetPose(Pose::new(35.5, -61.63, 0.0))
    );
    assert!(calls
        .iter()
        .any(|call| matches!(call, ChassisCall::MoveToPose { .. })));
    assert!(calls
        .iter()
        .any(|call| matches!(call, ChassisCall::Arcade { .. })));

    // The driver's B press left the front wings out.
    assert!(states.get(ActuatorId::FrontWings));
    assert!(!states.get(ActuatorId::RearWings));
}

fn run_launching(with_reporter: bool) -> (Duration, Vec<ActuatorWrite>) {
    let Rig {
        executor,
        timer,
        mut robot,
    } = rig(ScriptedGamepad::new());

    robot.selector().select(RouteId(1));

    let reporter = with_reporter.then(|| {
        executor.spawn(telemetry::report(
            robot.chassis(),
            robot.actuator_states(),
            timer.clone(),
            telemetry::DEFAULT_PERIOD,
        ))
    });

    executor.block_on(robot.autonomous());
    drop(reporter);

    (
        timer.now().since_start(),
        robot.pneumatics().inner().writes().to_vec(),
    )
}

#[test]
fn telemetry_observes_without_perturbing() {
    let bare = run_launching(false);
    let reported = run_launching(true);

    assert_eq!(bare, reported);
    assert!(bare.0 >= Duration::from_secs(1));
}
