//! The chassis motion contract.
//!
//! [`Chassis`] is the surface autonomous routines and driver control are
//! written against. Motion calls are fire-and-forget: they hand a target to
//! the backend's motion service and return immediately, superseding whatever
//! motion was running. Code that needs to block on progress does so
//! explicitly through [`wait_until_done`](Chassis::wait_until_done) or
//! [`wait_until_traveled`](Chassis::wait_until_traveled).
//!
//! Motion calls do not return errors. A target the service cannot reach is
//! ended by its timeout, and the wait futures resolve either way, so a
//! routine degrades to driving its remaining steps rather than aborting
//! mid-field.

use core::time::Duration;

use crate::geometry::{Point, Pose};

/// Which way a turn is allowed to rotate.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Whichever rotation is shortest.
    #[default]
    Auto,
    /// Always rotate clockwise.
    Clockwise,
    /// Always rotate counterclockwise.
    CounterClockwise,
}

/// Tuning knobs for [`Chassis::move_to_pose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveToPoseParams {
    /// Drive with the front of the robot leading.
    pub forwards: bool,
    /// Floor on the commanded speed, 0-127. A floor keeps chained motions
    /// from decelerating to a stop between targets.
    pub min_speed: f64,
    /// Cap on the commanded speed, 0-127.
    pub max_speed: f64,
}

impl Default for MoveToPoseParams {
    fn default() -> Self {
        Self {
            forwards: true,
            min_speed: 0.0,
            max_speed: 127.0,
        }
    }
}

/// Tuning knobs for [`Chassis::turn_to_heading`] and
/// [`Chassis::turn_to_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnToParams {
    /// Allowed rotation direction.
    pub direction: TurnDirection,
    /// Floor on the commanded speed, 0-127.
    pub min_speed: f64,
    /// Cap on the commanded speed, 0-127.
    pub max_speed: f64,
}

impl Default for TurnToParams {
    fn default() -> Self {
        Self {
            direction: TurnDirection::Auto,
            min_speed: 0.0,
            max_speed: 127.0,
        }
    }
}

/// A path file compiled into the program binary.
///
/// Paths are plain text, one `x, y, speed` triple per line, closed by an
/// `endData` line. Bundle one with [`path_asset!`](crate::path_asset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathAsset {
    source: &'static str,
    contents: &'static [u8],
}

impl PathAsset {
    /// Wraps raw asset bytes. Prefer [`path_asset!`](crate::path_asset),
    /// which compiles the file in for you.
    #[must_use]
    pub const fn new(source: &'static str, contents: &'static [u8]) -> Self {
        Self { source, contents }
    }

    /// File name of the asset, without any leading directories.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.source.rsplit('/').next().unwrap_or(self.source)
    }

    /// Raw bytes of the asset.
    #[must_use]
    pub const fn contents(&self) -> &'static [u8] {
        self.contents
    }
}

/// Compiles a path file into the binary and wraps it as a [`PathAsset`].
///
/// The path is resolved relative to the file invoking the macro.
#[macro_export]
macro_rules! path_asset {
    ($path:literal) => {
        $crate::chassis::PathAsset::new($path, ::core::include_bytes!($path))
    };
}

/// Drivetrain motion surface.
///
/// Implementations run their own motion service; this trait only issues
/// targets and observes progress. Everything takes `&self` so a chassis can
/// be shared between an executing routine and a telemetry task.
#[allow(async_fn_in_trait)]
pub trait Chassis {
    /// Overwrites the tracked pose.
    fn set_pose(&self, pose: Pose);

    /// The current tracked pose.
    fn pose(&self) -> Pose;

    /// Starts a motion toward `target`, superseding any active motion.
    ///
    /// The motion ends on its own once it settles, or when `timeout`
    /// expires, whichever comes first.
    fn move_to_pose(&self, target: Pose, timeout: Duration, params: MoveToPoseParams);

    /// Starts a turn to an absolute compass heading, in degrees.
    fn turn_to_heading(&self, heading: f64, timeout: Duration, params: TurnToParams);

    /// Starts a turn to face a field point.
    fn turn_to_point(&self, point: Point, timeout: Duration, params: TurnToParams);

    /// Starts following a recorded path by pure pursuit.
    ///
    /// `lookahead` is the pursuit lookahead distance in inches. Pass
    /// `forwards = false` to lead with the back of the robot.
    fn follow(&self, path: &PathAsset, lookahead: f64, timeout: Duration, forwards: bool);

    /// Commands the drivetrain directly with arcade-style inputs.
    ///
    /// `throttle` and `steer` are in `[-1, 1]`. The backend applies its
    /// configured drive curves before the values reach the motors.
    fn arcade(&self, throttle: f64, steer: f64);

    /// Suspends until the active motion settles or times out.
    ///
    /// Resolves immediately when no motion is active.
    async fn wait_until_done(&self);

    /// Suspends until the active motion has covered `distance`.
    ///
    /// Distance is measured in inches for translations and degrees for
    /// turns. Resolves when the motion ends for any reason, even if it never
    /// covered `distance`.
    async fn wait_until_traveled(&self, distance: f64);

    /// Temperatures of the drive motors, in °C.
    ///
    /// Backends without thermal monitoring return an empty vector.
    fn drive_temperatures(&self) -> Vec<f64> {
        Vec::new()
    }
}
