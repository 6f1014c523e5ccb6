//! Robot configuration.
//!
//! The robot's hardware is described once, in code, and handed to whichever
//! chassis backend the program runs on. Nothing here is read from files at
//! runtime; a competition robot's wiring does not change between boots, and
//! a bad port number should fail review, not a match.

use core::time::Duration;

/// Nominal diameter of the 3.25" omni wheel, in inches.
pub const OMNI_325: f64 = 3.25;

/// Nominal diameter of the 2.75" omni wheel, in inches.
pub const OMNI_275: f64 = 2.75;

/// Internal gearing of a V5 smart motor.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gearset {
    /// 36:1 gearing, 100 RPM (red cartridge).
    Red,
    /// 18:1 gearing, 200 RPM (green cartridge).
    #[default]
    Green,
    /// 6:1 gearing, 600 RPM (blue cartridge).
    Blue,
}

impl Gearset {
    /// Rated output speed of this gearset, in RPM.
    #[must_use]
    pub const fn rpm(&self) -> f64 {
        match self {
            Self::Red => 100.0,
            Self::Green => 200.0,
            Self::Blue => 600.0,
        }
    }
}

/// A rotational direction.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Positive rotation.
    #[default]
    Forward,
    /// Negative rotation.
    Reverse,
}

/// One drive motor: its smart port and how it is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPort {
    /// Smart port number, 1-21.
    pub port: u8,
    /// The rotation that drives the robot forward.
    pub direction: Direction,
    /// Installed gear cartridge.
    pub gearset: Gearset,
}

impl MotorPort {
    /// A motor mounted so positive rotation drives forward.
    #[must_use]
    pub const fn forward(port: u8, gearset: Gearset) -> Self {
        Self {
            port,
            direction: Direction::Forward,
            gearset,
        }
    }

    /// A motor mounted mirrored, driving forward on negative rotation.
    #[must_use]
    pub const fn reversed(port: u8, gearset: Gearset) -> Self {
        Self {
            port,
            direction: Direction::Reverse,
            gearset,
        }
    }
}

/// Physical dimensions and capability of the drivetrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drivetrain {
    /// Distance between the left and right wheel contact patches, in inches.
    pub track_width: f64,
    /// Drive wheel diameter, in inches.
    pub wheel_diameter: f64,
    /// Wheel speed after external gearing, in RPM.
    pub rpm: f64,
    /// How much the robot drifts sideways through fast turns. Higher values
    /// let the motion service carry more speed into corners.
    pub horizontal_drift: f64,
}

/// Feedback tuning for one axis of motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Anti-windup range. The integral only accumulates inside it.
    pub windup: f64,
    /// Error magnitude considered settled.
    pub small_error: f64,
    /// How long the error must stay small before the motion exits.
    pub small_error_timeout: Duration,
    /// Error magnitude considered close.
    pub large_error: f64,
    /// How long the error must stay merely close before the motion exits.
    pub large_error_timeout: Duration,
    /// Maximum change in output per update. Zero disables slew.
    pub slew: f64,
}

/// Response curve applied to one driver control input.
///
/// Inputs and outputs are on the controller's native 0-127 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCurve {
    /// Inputs at or below this magnitude read as zero.
    pub deadband: f64,
    /// Smallest output that physically moves the drivetrain.
    pub min_output: f64,
    /// Exponential gain. 1.0 leaves inputs linear.
    pub gain: f64,
}

/// One tracking wheel: a rotation sensor and where its wheel sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingWheel {
    /// Rotation sensor smart port.
    pub port: u8,
    /// Whether the sensor counts backwards.
    pub reversed: bool,
    /// Wheel diameter, in inches.
    pub wheel_diameter: f64,
    /// Signed offset from the tracking center, in inches.
    pub offset: f64,
}

/// The sensor complement available for odometry.
///
/// Any wheel left as `None` falls back to the drive motors' integrated
/// encoders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OdometrySensors {
    /// First vertical tracking wheel.
    pub vertical_1: Option<TrackingWheel>,
    /// Second vertical tracking wheel.
    pub vertical_2: Option<TrackingWheel>,
    /// First horizontal tracking wheel.
    pub horizontal_1: Option<TrackingWheel>,
    /// Second horizontal tracking wheel.
    pub horizontal_2: Option<TrackingWheel>,
    /// Inertial sensor smart port.
    pub imu_port: Option<u8>,
}

/// Everything a chassis backend needs to know about the robot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChassisConfig {
    /// Motors on the left side of the drivetrain.
    pub left_motors: Vec<MotorPort>,
    /// Motors on the right side of the drivetrain.
    pub right_motors: Vec<MotorPort>,
    /// Drivetrain dimensions.
    pub drivetrain: Drivetrain,
    /// Tuning for straight-line motion.
    pub lateral: MotionGains,
    /// Tuning for turning.
    pub angular: MotionGains,
    /// Curve for the throttle input during driver control.
    pub throttle_curve: DriveCurve,
    /// Curve for the steer input during driver control.
    pub steer_curve: DriveCurve,
    /// Odometry sensors.
    pub odometry: OdometrySensors,
}

impl ChassisConfig {
    /// Top straight-line speed of this drivetrain, in inches per second.
    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.drivetrain.rpm / 60.0 * self.drivetrain.wheel_diameter * core::f64::consts::PI
    }
}
