//! Routes: named, validated step sequences.

use core::time::Duration;

use snafu::Snafu;
use talos_core::{
    chassis::{MoveToPoseParams, PathAsset, TurnToParams},
    geometry::{Point, Pose},
    pneumatics::ActuatorId,
};

use crate::step::Step;

/// Why a step list was rejected as a route.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// A `SetPose` appeared after the first step.
    ///
    /// Overwriting the whole pose mid-route silently discards odometry. A
    /// mid-route correction has to say which components it means, with
    /// [`Step::CorrectPose`].
    #[snafu(display("step {index} is a SetPose, which is only valid as a route's first step"))]
    MisplacedSetPose {
        /// Position of the offending step.
        index: usize,
    },
}

/// A named autonomous routine: an ordered list of [`Step`]s.
///
/// Routes are validated when built and immutable afterwards, so a malformed
/// route fails at startup rather than mid-match.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    name: &'static str,
    steps: Vec<Step>,
}

impl Route {
    /// Validates `steps` as a route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MisplacedSetPose`] if any step after the first
    /// is a [`Step::SetPose`].
    pub fn from_steps(name: &'static str, steps: Vec<Step>) -> Result<Self, RouteError> {
        for (index, step) in steps.iter().enumerate().skip(1) {
            if matches!(step, Step::SetPose(_)) {
                return MisplacedSetPoseSnafu { index }.fail();
            }
        }

        Ok(Self { name, steps })
    }

    /// Starts building a route that declares its starting pose.
    #[must_use]
    pub fn starting_at(name: &'static str, x: f64, y: f64, heading: f64) -> RouteBuilder {
        RouteBuilder {
            name,
            steps: vec![Step::SetPose(Pose::new(x, y, heading))],
        }
    }

    /// Starts building a route that trusts the already-tracked pose.
    #[must_use]
    pub fn builder(name: &'static str) -> RouteBuilder {
        RouteBuilder {
            name,
            steps: Vec::new(),
        }
    }

    /// The route's display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The steps, in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the route has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Builds a [`Route`] step by step.
///
/// Obtained from [`Route::starting_at`] or [`Route::builder`]. The builder
/// can only express valid routes: the starting pose is the one place a full
/// pose overwrite exists, so [`build`](RouteBuilder::build) is infallible.
#[derive(Debug)]
#[must_use = "a route builder does nothing until `build` is called"]
pub struct RouteBuilder {
    name: &'static str,
    steps: Vec<Step>,
}

impl RouteBuilder {
    /// Appends a motion toward a pose with default tuning.
    pub fn move_to(self, x: f64, y: f64, heading: f64, timeout: Duration) -> Self {
        self.move_to_with(x, y, heading, timeout, MoveToPoseParams::default())
    }

    /// Appends a motion toward a pose with explicit tuning.
    pub fn move_to_with(
        mut self,
        x: f64,
        y: f64,
        heading: f64,
        timeout: Duration,
        params: MoveToPoseParams,
    ) -> Self {
        self.steps.push(Step::MoveTo {
            target: Pose::new(x, y, heading),
            timeout,
            params,
        });
        self
    }

    /// Appends a turn to an absolute heading with default tuning.
    pub fn turn_to_heading(self, heading: f64, timeout: Duration) -> Self {
        self.turn_to_heading_with(heading, timeout, TurnToParams::default())
    }

    /// Appends a turn to an absolute heading with explicit tuning.
    pub fn turn_to_heading_with(
        mut self,
        heading: f64,
        timeout: Duration,
        params: TurnToParams,
    ) -> Self {
        self.steps.push(Step::TurnToHeading {
            heading,
            timeout,
            params,
        });
        self
    }

    /// Appends a turn to face a field point.
    pub fn turn_to_point(mut self, point: Point, timeout: Duration) -> Self {
        self.steps.push(Step::TurnToPoint {
            point,
            timeout,
            params: TurnToParams::default(),
        });
        self
    }

    /// Appends a pure pursuit path follow.
    pub fn follow(
        mut self,
        path: PathAsset,
        lookahead: f64,
        timeout: Duration,
        forwards: bool,
    ) -> Self {
        self.steps.push(Step::Follow {
            path,
            lookahead,
            timeout,
            forwards,
        });
        self
    }

    /// Appends a pneumatic actuator command.
    pub fn actuator(mut self, id: ActuatorId, engaged: bool) -> Self {
        self.steps.push(Step::SetActuator { id, engaged });
        self
    }

    /// Appends a fixed delay.
    pub fn pause(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Pause(duration));
        self
    }

    /// Appends a wait for the in-flight motion to settle.
    pub fn wait_until_done(mut self) -> Self {
        self.steps.push(Step::WaitUntilDone);
        self
    }

    /// Appends a wait for the in-flight motion to cover `distance`.
    pub fn wait_until_traveled(mut self, distance: f64) -> Self {
        self.steps.push(Step::WaitUntilTraveled { distance });
        self
    }

    /// Appends a partial pose correction. `None` components keep their
    /// tracked value.
    pub fn correct_pose(
        mut self,
        x: Option<f64>,
        y: Option<f64>,
        heading: Option<f64>,
    ) -> Self {
        self.steps.push(Step::CorrectPose { x, y, heading });
        self
    }

    /// Finishes the route.
    pub fn build(self) -> Route {
        Route {
            name: self.name,
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_pose_must_lead() {
        let steps = vec![
            Step::SetPose(Pose::new(35.5, -61.63, 0.0)),
            Step::MoveTo {
                target: Pose::new(35.5, -9.63, 0.0),
                timeout: Duration::from_secs(2),
                params: MoveToPoseParams::default(),
            },
            Step::SetPose(Pose::ZERO),
        ];

        assert_eq!(
            Route::from_steps("bad", steps),
            Err(RouteError::MisplacedSetPose { index: 2 })
        );
    }

    #[test]
    fn leading_set_pose_is_accepted() {
        let steps = vec![
            Step::SetPose(Pose::new(-44.5, -59.13, 135.0)),
            Step::WaitUntilDone,
        ];

        let route = Route::from_steps("ok", steps).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.name(), "ok");
    }

    #[test]
    fn corrections_are_allowed_anywhere() {
        let steps = vec![
            Step::Pause(Duration::from_millis(100)),
            Step::CorrectPose {
                x: Some(9.7),
                y: None,
                heading: None,
            },
        ];

        assert!(Route::from_steps("correcting", steps).is_ok());
    }

    #[test]
    fn builder_matches_hand_built_steps() {
        let built = Route::starting_at("prefix", 35.5, -61.63, 0.0)
            .move_to(35.5, -9.63, 0.0, Duration::from_secs(2))
            .wait_until_done()
            .actuator(ActuatorId::Intake, true)
            .build();

        let expected = Route::from_steps(
            "prefix",
            vec![
                Step::SetPose(Pose::new(35.5, -61.63, 0.0)),
                Step::MoveTo {
                    target: Pose::new(35.5, -9.63, 0.0),
                    timeout: Duration::from_secs(2),
                    params: MoveToPoseParams::default(),
                },
                Step::WaitUntilDone,
                Step::SetActuator {
                    id: ActuatorId::Intake,
                    engaged: true,
                },
            ],
        )
        .unwrap();

        assert_eq!(built, expected);
    }

    #[test]
    fn empty_routes_are_legal() {
        let route = Route::builder("idle").build();
        assert!(route.is_empty());
        assert_eq!(route.len(), 0);
    }
}
