//! This robot.
//!
//! The hardware map, motion tuning, and competition routes, all as plain
//! data. Changing a port or a route touches this file and nothing else.

use core::time::Duration;

use talos_auton::{Route, RouteId, RouteTable};
use talos_core::{
    chassis::{MoveToPoseParams, PathAsset},
    config::{
        ChassisConfig, DriveCurve, Drivetrain, Gearset, MotionGains, MotorPort, OdometrySensors,
        TrackingWheel, OMNI_325,
    },
    path_asset,
    pneumatics::ActuatorId,
};

/// Competition team number.
pub const TEAM_NUMBER: &str = "72116A";

/// Team name, as printed on match displays.
pub const TEAM_NAME: &str = "Single Point Failure";

/// School line printed under the team name.
pub const TEAM_SCHOOL: &str = "Catholic High School For Boys";

/// Motion timeout used by most route steps.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// The slot run when nobody touches the selector before the match.
pub const DEFAULT_ROUTE: RouteId = RouteId(2);

/// Recorded lap of the field for the pure pursuit route.
pub const FIELD_LAP: PathAsset = path_asset!("../assets/field_lap.txt");

/// The drivetrain's wiring and motion tuning.
#[must_use]
pub fn chassis_config() -> ChassisConfig {
    ChassisConfig {
        left_motors: vec![
            MotorPort::forward(8, Gearset::Blue),
            MotorPort::reversed(10, Gearset::Blue),
            MotorPort::forward(7, Gearset::Blue),
            MotorPort::forward(6, Gearset::Blue),
        ],
        right_motors: vec![
            MotorPort::reversed(18, Gearset::Blue),
            MotorPort::forward(20, Gearset::Blue),
            MotorPort::reversed(17, Gearset::Blue),
            MotorPort::reversed(16, Gearset::Blue),
        ],
        drivetrain: Drivetrain {
            track_width: 11.0,
            wheel_diameter: OMNI_325,
            rpm: 600.0,
            // Would be around 8 with traction wheels.
            horizontal_drift: 2.0,
        },
        lateral: MotionGains {
            kp: 10.0,
            ki: 0.0,
            kd: 3.0,
            windup: 3.0,
            small_error: 1.0,
            small_error_timeout: Duration::from_millis(100),
            large_error: 3.0,
            large_error_timeout: Duration::from_millis(500),
            slew: 20.0,
        },
        angular: MotionGains {
            kp: 2.0,
            ki: 0.0,
            kd: 15.0,
            windup: 3.0,
            small_error: 1.0,
            small_error_timeout: Duration::from_millis(100),
            large_error: 3.0,
            large_error_timeout: Duration::from_millis(500),
            slew: 0.0,
        },
        throttle_curve: DriveCurve {
            deadband: 3.0,
            min_output: 10.0,
            gain: 1.019,
        },
        steer_curve: DriveCurve {
            deadband: 3.0,
            min_output: 10.0,
            gain: 1.019,
        },
        odometry: OdometrySensors {
            vertical_1: Some(TrackingWheel {
                port: 9,
                reversed: false,
                wheel_diameter: OMNI_325,
                offset: 5.5,
            }),
            vertical_2: Some(TrackingWheel {
                port: 19,
                reversed: true,
                wheel_diameter: OMNI_325,
                offset: -5.5,
            }),
            horizontal_1: None,
            horizontal_2: None,
            imu_port: Some(1),
        },
    }
}

/// Every selectable route, registered in its competition slot.
#[must_use]
pub fn route_table() -> RouteTable {
    let mut table = RouteTable::new();

    table.insert(RouteId(1), launching());
    table.insert(RouteId(2), offense());
    // TODO: skills routine for slot 3.
    table.insert(RouteId(4), nudge());
    table.insert(RouteId(5), corner_pass());
    table.insert(RouteId(6), square_test());
    table.insert(RouteId(7), pure_pursuit());

    table
}

fn reversed() -> MoveToPoseParams {
    MoveToPoseParams {
        forwards: false,
        ..MoveToPoseParams::default()
    }
}

// Near side.
fn launching() -> Route {
    Route::starting_at("launching", -44.5, -59.13, 135.0)
        .move_to_with(-56.64, -46.93, 135.0, DEFAULT_TIMEOUT, reversed())
        .wait_until_done()
        .actuator(ActuatorId::FrontWings, true)
        .pause(Duration::from_millis(800))
        .move_to(-44.5, -59.13, 135.0, DEFAULT_TIMEOUT)
        .wait_until_done()
        .pause(Duration::from_millis(200))
        .actuator(ActuatorId::FrontWings, false)
        .move_to(-9.0, -59.55, 90.0, DEFAULT_TIMEOUT)
        .actuator(ActuatorId::Intake, true)
        .move_to_with(-15.0, -59.55, 90.0, DEFAULT_TIMEOUT, reversed())
        .actuator(ActuatorId::Intake, false)
        .move_to(-9.0, -59.55, 90.0, DEFAULT_TIMEOUT)
        .actuator(ActuatorId::FrontWings, true)
        .move_to(-9.0, -59.55, 110.0, DEFAULT_TIMEOUT)
        .build()
}

// Far side.
fn offense() -> Route {
    Route::starting_at("offense", 35.5, -61.63, 0.0)
        .move_to(35.5, -9.63, 0.0, DEFAULT_TIMEOUT)
        .move_to(35.5, -9.63, 90.0, DEFAULT_TIMEOUT)
        .wait_until_done()
        .actuator(ActuatorId::Intake, true)
        .move_to_with(
            50.5,
            -7.63,
            90.0,
            DEFAULT_TIMEOUT,
            MoveToPoseParams {
                min_speed: 100.0,
                ..MoveToPoseParams::default()
            },
        )
        .move_to_with(35.5, -7.63, 90.0, DEFAULT_TIMEOUT, reversed())
        // Next triball.
        .move_to(35.5, -7.63, 270.0, DEFAULT_TIMEOUT)
        .move_to(9.5, -23.39, 270.0, DEFAULT_TIMEOUT)
        .wait_until_done()
        .actuator(ActuatorId::Intake, false)
        .correct_pose(Some(9.7), None, None)
        .move_to_with(15.5, -23.39, 270.0, DEFAULT_TIMEOUT, reversed())
        .move_to(15.5, -23.39, 355.0, DEFAULT_TIMEOUT)
        // Final push.
        .move_to(7.0, -8.2, 355.0, DEFAULT_TIMEOUT)
        .move_to_with(
            7.0,
            -8.2,
            80.0,
            DEFAULT_TIMEOUT,
            MoveToPoseParams {
                max_speed: 20.0,
                ..MoveToPoseParams::default()
            },
        )
        .wait_until_traveled(5.0)
        .actuator(ActuatorId::FrontWings, true)
        .actuator(ActuatorId::Intake, true)
        .move_to(42.45, -4.85, 84.0, Duration::from_millis(3000))
        .move_to_with(32.25, -4.85, 84.0, DEFAULT_TIMEOUT, reversed())
        .wait_until_done()
        .actuator(ActuatorId::FrontWings, false)
        .actuator(ActuatorId::Intake, false)
        .build()
}

fn nudge() -> Route {
    Route::builder("nudge")
        .move_to(0.0, 15.0, 0.0, DEFAULT_TIMEOUT)
        .build()
}

fn corner_pass() -> Route {
    Route::starting_at("corner pass", 46.92, -59.02, 45.0)
        .move_to(59.5, -47.1, 45.0, DEFAULT_TIMEOUT)
        .build()
}

// Tuning square around the origin.
fn square_test() -> Route {
    Route::builder("square test")
        .move_to(0.0, 25.0, 0.0, DEFAULT_TIMEOUT)
        .move_to(25.0, 25.0, 90.0, DEFAULT_TIMEOUT)
        .move_to(25.0, 0.0, 180.0, DEFAULT_TIMEOUT)
        .move_to(0.0, 0.0, 270.0, DEFAULT_TIMEOUT)
        .turn_to_heading(360.0, DEFAULT_TIMEOUT)
        .build()
}

fn pure_pursuit() -> Route {
    Route::starting_at("pure pursuit", 39.37, -61.02, 0.0)
        .follow(FIELD_LAP, 10.0, Duration::from_secs(30), true)
        .build()
}

#[cfg(test)]
mod test {
    use talos_auton::Step;
    use talos_core::geometry::Pose;

    use super::*;

    #[test]
    fn the_table_fills_its_competition_slots() {
        let table = route_table();

        let slots: Vec<_> = table.iter().map(|(slot, _)| slot).collect();
        assert_eq!(
            slots,
            [
                RouteId(1),
                RouteId(2),
                RouteId(4),
                RouteId(5),
                RouteId(6),
                RouteId(7),
            ]
        );

        assert!(table.get(DEFAULT_ROUTE).is_some());
        assert!(table.get(RouteId(3)).is_none());
    }

    #[test]
    fn offense_opens_from_the_far_side_tile() {
        let route = offense();
        assert_eq!(route.name(), "offense");

        let steps = route.steps();
        assert_eq!(steps[0], Step::SetPose(Pose::new(35.5, -61.63, 0.0)));
        assert_eq!(
            steps[1],
            Step::MoveTo {
                target: Pose::new(35.5, -9.63, 0.0),
                timeout: DEFAULT_TIMEOUT,
                params: MoveToPoseParams::default(),
            }
        );
    }

    #[test]
    fn the_lap_asset_is_bundled() {
        assert_eq!(FIELD_LAP.name(), "field_lap.txt");

        let text = core::str::from_utf8(FIELD_LAP.contents()).unwrap();
        assert!(text.lines().any(|line| line.trim() == "endData"));
    }

    #[test]
    fn the_drive_has_four_motors_a_side() {
        let config = chassis_config();

        assert_eq!(config.left_motors.len(), 4);
        assert_eq!(config.right_motors.len(), 4);
        assert_eq!(config.odometry.imu_port, Some(1));
    }
}
