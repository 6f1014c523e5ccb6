//! A kinematic chassis model.
//!
//! [`SimChassis`] implements the full [`Chassis`] contract against a
//! [`Timer`] instead of hardware. Motions translate and rotate the tracked
//! pose along a straight line at constant rates derived from ideal
//! differential-drive kinematics, settle exactly when the distance has been
//! covered, and freeze in place when a timeout cuts them short. Every
//! command is also appended to a call log for assertions.

use core::{cell::RefCell, time::Duration};

use talos_async::{Instant, Timer};
use talos_core::{
    chassis::{Chassis, MoveToPoseParams, PathAsset, TurnDirection, TurnToParams},
    config::ChassisConfig,
    geometry::{heading_error, normalize_heading, Point, Pose},
};

/// Full-throttle straight-line speed used by [`SimChassis::new`], in inches
/// per second.
const DEFAULT_LINEAR_SPEED: f64 = 60.0;

/// Full-throttle spin rate used by [`SimChassis::new`], in degrees per
/// second.
const DEFAULT_ANGULAR_SPEED: f64 = 360.0;

/// One recorded [`Chassis`] command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChassisCall {
    /// [`Chassis::set_pose`].
    SetPose(Pose),
    /// [`Chassis::move_to_pose`].
    MoveToPose {
        /// Commanded target.
        target: Pose,
        /// Commanded timeout.
        timeout: Duration,
        /// Commanded tuning.
        params: MoveToPoseParams,
    },
    /// [`Chassis::turn_to_heading`].
    TurnToHeading {
        /// Commanded heading, in degrees.
        heading: f64,
        /// Commanded timeout.
        timeout: Duration,
        /// Commanded tuning.
        params: TurnToParams,
    },
    /// [`Chassis::turn_to_point`].
    TurnToPoint {
        /// Commanded point.
        point: Point,
        /// Commanded timeout.
        timeout: Duration,
        /// Commanded tuning.
        params: TurnToParams,
    },
    /// [`Chassis::follow`].
    Follow {
        /// File name of the followed asset.
        path: &'static str,
        /// Commanded lookahead, in inches.
        lookahead: f64,
        /// Commanded timeout.
        timeout: Duration,
        /// Whether the robot led with its front.
        forwards: bool,
    },
    /// [`Chassis::arcade`].
    Arcade {
        /// Commanded throttle, in `[-1, 1]`.
        throttle: f64,
        /// Commanded steer, in `[-1, 1]`.
        steer: f64,
    },
}

/// An in-flight motion, swept from `from` toward `to` at a constant rate.
struct ActiveMotion {
    from: Pose,
    to: Pose,
    /// Signed heading change over the whole motion, in degrees. Carries the
    /// commanded rotation direction, so it may sweep the long way around.
    heading_sweep: f64,
    /// Progress metric covered by the whole motion. Inches for translations
    /// and paths, degrees for turns.
    total: f64,
    started: Instant,
    /// Time the motion needs to cover `total`.
    full_duration: Duration,
    /// When the motion ends: settled, or frozen by its timeout.
    settles_at: Instant,
}

impl ActiveMotion {
    /// Fraction of the motion completed at `now`, in `[0, 1]`.
    fn fraction(&self, now: Instant) -> f64 {
        if self.full_duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.min(self.settles_at).duration_since(self.started);
        (elapsed.as_secs_f64() / self.full_duration.as_secs_f64()).min(1.0)
    }

    fn pose_at(&self, now: Instant) -> Pose {
        let t = self.fraction(now);

        Pose::new(
            self.from.x + (self.to.x - self.from.x) * t,
            self.from.y + (self.to.y - self.from.y) * t,
            self.from.heading + self.heading_sweep * t,
        )
    }

    /// The instant this motion has covered `distance` of its progress
    /// metric, or ended without reaching it.
    fn reaches(&self, distance: f64) -> Instant {
        if self.total <= 0.0 || self.full_duration.is_zero() {
            return self.started;
        }

        let fraction = (distance / self.total).clamp(0.0, 1.0);
        (self.started + self.full_duration.mul_f64(fraction)).min(self.settles_at)
    }
}

/// What a planned motion sweeps through, computed from the starting pose.
struct MotionPlan {
    to: Pose,
    heading_sweep: f64,
    total: f64,
    seconds: f64,
}

struct SimState {
    pose: Pose,
    motion: Option<ActiveMotion>,
}

/// A scripted [`Chassis`] backend driven entirely by a [`Timer`].
///
/// Under a [`SimClock`](talos_async::SimClock) the executor jumps straight
/// between motion deadlines, so a routine that would hold the field for a
/// minute replays in the time it takes to run its assertions.
pub struct SimChassis {
    timer: Timer,
    /// Full-throttle straight-line speed, in inches per second.
    linear_speed: f64,
    /// Full-throttle spin rate, in degrees per second.
    angular_speed: f64,
    state: RefCell<SimState>,
    calls: RefCell<Vec<ChassisCall>>,
    temperatures: RefCell<Vec<f64>>,
}

impl SimChassis {
    /// Creates a chassis at [`Pose::ZERO`] with nominal full-throttle rates
    /// of 60 in/s and 360°/s.
    #[must_use]
    pub fn new(timer: Timer) -> Self {
        Self {
            timer,
            linear_speed: DEFAULT_LINEAR_SPEED,
            angular_speed: DEFAULT_ANGULAR_SPEED,
            state: RefCell::new(SimState {
                pose: Pose::ZERO,
                motion: None,
            }),
            calls: RefCell::new(Vec::new()),
            temperatures: RefCell::new(Vec::new()),
        }
    }

    /// Creates a chassis whose rates follow `config`.
    ///
    /// The straight-line speed is the drivetrain's rated top speed, and the
    /// spin rate assumes both sides at top speed with no slip.
    #[must_use]
    pub fn with_config(timer: Timer, config: &ChassisConfig) -> Self {
        let linear = config.max_speed();
        let angular = (linear / (config.drivetrain.track_width / 2.0)).to_degrees();

        Self {
            linear_speed: linear,
            angular_speed: angular,
            ..Self::new(timer)
        }
    }

    /// Every command issued so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ChassisCall> {
        self.calls.borrow().clone()
    }

    /// Drains and returns the recorded commands.
    pub fn take_calls(&self) -> Vec<ChassisCall> {
        core::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Sets the temperatures reported by
    /// [`drive_temperatures`](Chassis::drive_temperatures).
    pub fn set_drive_temperatures(&self, temperatures: impl Into<Vec<f64>>) {
        *self.temperatures.borrow_mut() = temperatures.into();
    }

    /// Folds a motion that has run to its end back into the tracked pose.
    fn settle(&self) {
        let now = self.timer.now();
        let mut state = self.state.borrow_mut();

        let Some(motion) = state.motion.as_ref() else {
            return;
        };
        if now < motion.settles_at {
            return;
        }

        let settled = motion.pose_at(now);
        state.pose = settled;
        state.motion = None;
    }

    /// Supersedes any active motion and starts the one `plan` describes.
    ///
    /// The superseded motion's partial progress is folded into the pose
    /// first, so the new motion departs from where the robot actually is.
    fn start_motion(&self, timeout: Duration, plan: impl FnOnce(Pose) -> MotionPlan) {
        let now = self.timer.now();
        let mut state = self.state.borrow_mut();

        if let Some(active) = state.motion.take() {
            state.pose = active.pose_at(now);
        }

        let plan = plan(state.pose);
        let full_duration = if plan.seconds.is_finite() && plan.seconds > 0.0 {
            Duration::from_secs_f64(plan.seconds)
        } else {
            Duration::ZERO
        };

        state.motion = Some(ActiveMotion {
            from: state.pose,
            to: plan.to,
            heading_sweep: plan.heading_sweep,
            total: plan.total,
            started: now,
            full_duration,
            settles_at: now + full_duration.min(timeout),
        });
    }
}

/// Fraction of full throttle a 0-127 speed cap allows.
fn speed_scale(max_speed: f64) -> f64 {
    (max_speed / 127.0).clamp(0.05, 1.0)
}

/// Compass bearing from `from` to `to`, in degrees.
fn bearing(from: Point, to: Point) -> f64 {
    normalize_heading((to.x - from.x).atan2(to.y - from.y).to_degrees())
}

/// Signed sweep that honors the commanded rotation direction.
fn turn_sweep(from: f64, to: f64, direction: TurnDirection) -> f64 {
    let shortest = heading_error(from, to);

    match direction {
        TurnDirection::Auto => shortest,
        TurnDirection::Clockwise if shortest < 0.0 => shortest + 360.0,
        TurnDirection::CounterClockwise if shortest > 0.0 => shortest - 360.0,
        TurnDirection::Clockwise | TurnDirection::CounterClockwise => shortest,
    }
}

/// Decodes a path asset's `x, y, speed` lines. Stops at `endData` and skips
/// lines that do not parse.
fn parse_path(asset: &PathAsset) -> Vec<Point> {
    let Ok(text) = core::str::from_utf8(asset.contents()) else {
        log::warn!("path {} is not text; ignoring it", asset.name());
        return Vec::new();
    };

    let mut points = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "endData" {
            break;
        }

        let mut fields = line.split(',').map(str::trim);
        let parsed = match (fields.next(), fields.next()) {
            (Some(x), Some(y)) => x.parse::<f64>().ok().zip(y.parse::<f64>().ok()),
            _ => None,
        };

        match parsed {
            Some((x, y)) => points.push(Point { x, y }),
            None => log::warn!("path {}: skipping malformed line {line:?}", asset.name()),
        }
    }

    points
}

impl Chassis for SimChassis {
    fn set_pose(&self, pose: Pose) {
        self.calls.borrow_mut().push(ChassisCall::SetPose(pose));

        let mut state = self.state.borrow_mut();
        state.motion = None;
        state.pose = pose;
    }

    fn pose(&self) -> Pose {
        self.settle();

        let state = self.state.borrow();
        match state.motion.as_ref() {
            Some(motion) => motion.pose_at(self.timer.now()),
            None => state.pose,
        }
    }

    fn move_to_pose(&self, target: Pose, timeout: Duration, params: MoveToPoseParams) {
        self.calls.borrow_mut().push(ChassisCall::MoveToPose {
            target,
            timeout,
            params,
        });

        let speed = self.linear_speed * speed_scale(params.max_speed);
        self.start_motion(timeout, |from| {
            let total = from.distance_to(target.position());
            MotionPlan {
                to: target,
                heading_sweep: heading_error(from.heading, target.heading),
                total,
                seconds: total / speed,
            }
        });
    }

    fn turn_to_heading(&self, heading: f64, timeout: Duration, params: TurnToParams) {
        self.calls.borrow_mut().push(ChassisCall::TurnToHeading {
            heading,
            timeout,
            params,
        });

        let rate = self.angular_speed * speed_scale(params.max_speed);
        self.start_motion(timeout, |from| {
            let sweep = turn_sweep(from.heading, heading, params.direction);
            MotionPlan {
                to: from.with_heading(heading),
                heading_sweep: sweep,
                total: sweep.abs(),
                seconds: sweep.abs() / rate,
            }
        });
    }

    fn turn_to_point(&self, point: Point, timeout: Duration, params: TurnToParams) {
        self.calls.borrow_mut().push(ChassisCall::TurnToPoint {
            point,
            timeout,
            params,
        });

        let rate = self.angular_speed * speed_scale(params.max_speed);
        self.start_motion(timeout, |from| {
            let heading = bearing(from.position(), point);
            let sweep = turn_sweep(from.heading, heading, params.direction);
            MotionPlan {
                to: from.with_heading(heading),
                heading_sweep: sweep,
                total: sweep.abs(),
                seconds: sweep.abs() / rate,
            }
        });
    }

    fn follow(&self, path: &PathAsset, lookahead: f64, timeout: Duration, forwards: bool) {
        self.calls.borrow_mut().push(ChassisCall::Follow {
            path: path.name(),
            lookahead,
            timeout,
            forwards,
        });

        let waypoints = parse_path(path);
        let Some((&last, rest)) = waypoints.split_last() else {
            log::warn!("path {} has no waypoints; holding position", path.name());
            return;
        };

        self.start_motion(timeout, |from| {
            let mut total = 0.0;
            let mut cursor = from.position();
            for &point in &waypoints {
                total += (point.x - cursor.x).hypot(point.y - cursor.y);
                cursor = point;
            }

            // The robot ends aligned with the path's final segment, turned
            // around when it drove the path in reverse.
            let exit = match rest.last() {
                Some(&previous) => bearing(previous, last),
                None => bearing(from.position(), last),
            };
            let heading = if forwards {
                exit
            } else {
                normalize_heading(exit + 180.0)
            };

            MotionPlan {
                to: Pose::new(last.x, last.y, heading),
                heading_sweep: heading_error(from.heading, heading),
                total,
                seconds: total / self.linear_speed,
            }
        });
    }

    fn arcade(&self, throttle: f64, steer: f64) {
        self.calls
            .borrow_mut()
            .push(ChassisCall::Arcade { throttle, steer });
    }

    async fn wait_until_done(&self) {
        loop {
            let deadline = {
                let state = self.state.borrow();
                match state.motion.as_ref() {
                    Some(motion) => motion.settles_at,
                    None => return,
                }
            };

            self.timer.sleep_until(deadline).await;
            self.settle();
        }
    }

    async fn wait_until_traveled(&self, distance: f64) {
        let deadline = {
            let state = self.state.borrow();
            match state.motion.as_ref() {
                Some(motion) => motion.reaches(distance),
                None => return,
            }
        };

        self.timer.sleep_until(deadline).await;
        self.settle();
    }

    fn drive_temperatures(&self) -> Vec<f64> {
        self.temperatures.borrow().clone()
    }
}
