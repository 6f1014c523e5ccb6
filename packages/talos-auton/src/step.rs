//! The step vocabulary routes are written in.

use core::time::Duration;

use talos_core::{
    chassis::{MoveToPoseParams, PathAsset, TurnToParams},
    geometry::{Point, Pose},
    pneumatics::ActuatorId,
};

/// One instruction in an autonomous route.
///
/// Steps either issue work and let the routine continue immediately, or
/// suspend the routine until a condition holds. The only suspending steps
/// are [`Pause`](Step::Pause), [`WaitUntilDone`](Step::WaitUntilDone), and
/// [`WaitUntilTraveled`](Step::WaitUntilTraveled); everything else returns
/// before the hardware finishes acting.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Overwrites the tracked pose. Only valid as a route's first step.
    SetPose(Pose),

    /// Partially overwrites the tracked pose mid-route, keeping every `None`
    /// component. Re-anchors odometry against a known field feature, such as
    /// a wall the robot just squared up on.
    CorrectPose {
        /// Replacement x coordinate, in inches.
        x: Option<f64>,
        /// Replacement y coordinate, in inches.
        y: Option<f64>,
        /// Replacement compass heading, in degrees.
        heading: Option<f64>,
    },

    /// Starts a motion toward a pose.
    MoveTo {
        /// Target pose.
        target: Pose,
        /// Deadline for the motion to settle.
        timeout: Duration,
        /// Motion tuning.
        params: MoveToPoseParams,
    },

    /// Starts a turn to an absolute compass heading.
    TurnToHeading {
        /// Target heading, in degrees.
        heading: f64,
        /// Deadline for the turn to settle.
        timeout: Duration,
        /// Turn tuning.
        params: TurnToParams,
    },

    /// Starts a turn to face a field point.
    TurnToPoint {
        /// Point to face.
        point: Point,
        /// Deadline for the turn to settle.
        timeout: Duration,
        /// Turn tuning.
        params: TurnToParams,
    },

    /// Starts following a bundled path by pure pursuit.
    Follow {
        /// The recorded path.
        path: PathAsset,
        /// Pursuit lookahead distance, in inches.
        lookahead: f64,
        /// Deadline for the whole path.
        timeout: Duration,
        /// Whether the front of the robot leads.
        forwards: bool,
    },

    /// Commands a pneumatic actuator.
    SetActuator {
        /// Which actuator.
        id: ActuatorId,
        /// Extend or retract.
        engaged: bool,
    },

    /// Suspends the routine for a fixed duration.
    Pause(Duration),

    /// Suspends until the in-flight motion settles or times out. Skipped if
    /// the routine has not issued a motion yet.
    WaitUntilDone,

    /// Suspends until the in-flight motion has covered a distance, in
    /// inches for translations and degrees for turns. Skipped if the
    /// routine has not issued a motion yet.
    WaitUntilTraveled {
        /// Distance the motion must cover before the routine resumes.
        distance: f64,
    },
}

impl Step {
    /// Whether this step starts a chassis motion.
    #[must_use]
    pub const fn is_motion(&self) -> bool {
        matches!(
            self,
            Self::MoveTo { .. }
                | Self::TurnToHeading { .. }
                | Self::TurnToPoint { .. }
                | Self::Follow { .. }
        )
    }

    /// Whether this step can suspend the routine.
    #[must_use]
    pub const fn is_suspension(&self) -> bool {
        matches!(
            self,
            Self::Pause(_) | Self::WaitUntilDone | Self::WaitUntilTraveled { .. }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_motion_steps_report_motion() {
        let motion = Step::MoveTo {
            target: Pose::ZERO,
            timeout: Duration::from_secs(2),
            params: MoveToPoseParams::default(),
        };
        assert!(motion.is_motion());
        assert!(!motion.is_suspension());

        assert!(!Step::WaitUntilDone.is_motion());
        assert!(Step::WaitUntilDone.is_suspension());
        assert!(Step::Pause(Duration::ZERO).is_suspension());
        assert!(!Step::SetPose(Pose::ZERO).is_motion());
    }
}
