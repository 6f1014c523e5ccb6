//! Step execution.

use log::{debug, warn};
use talos_async::time::Timer;
use talos_core::{chassis::Chassis, geometry::Pose, pneumatics::Pneumatics};

use crate::{
    registry::{RouteId, RouteTable},
    route::Route,
    step::Step,
};

/// Executes routes step by step.
///
/// The sequencer is the only place steps are interpreted, so every route
/// runs with the same semantics: motion steps hand a target to the chassis
/// and continue immediately, and the routine only suspends at an explicit
/// pause or wait step.
///
/// Nothing here aborts a route. Motions that cannot reach their target are
/// ended by their timeout, and a failed actuator write is logged and
/// skipped, so the routine always drives its remaining steps.
#[derive(Debug, Clone)]
pub struct Sequencer {
    timer: Timer,
}

impl Sequencer {
    /// Creates a sequencer that paces its delays on `timer`.
    pub fn new(timer: Timer) -> Self {
        Self { timer }
    }

    /// Looks up `slot` in `table` and executes whatever is registered.
    ///
    /// An empty slot logs and returns immediately, leaving the robot parked
    /// for the period.
    pub async fn run<C: Chassis, P: Pneumatics>(
        &self,
        table: &RouteTable,
        slot: RouteId,
        chassis: &C,
        pneumatics: &mut P,
    ) {
        match table.get(slot) {
            Some(route) => self.execute(route, chassis, pneumatics).await,
            None => warn!("no route registered in slot {slot}; holding position"),
        }
    }

    /// Executes `route` from its first step.
    pub async fn execute<C: Chassis, P: Pneumatics>(
        &self,
        route: &Route,
        chassis: &C,
        pneumatics: &mut P,
    ) {
        debug!("running route {} ({} steps)", route.name(), route.len());

        // Set per route, never carried across runs: a wait ahead of the
        // first motion must not block on a motion left over from earlier.
        let mut motion_issued = false;

        for step in route.steps() {
            self.step(step, &mut motion_issued, chassis, pneumatics).await;
        }

        debug!("route {} finished", route.name());
    }

    async fn step<C: Chassis, P: Pneumatics>(
        &self,
        step: &Step,
        motion_issued: &mut bool,
        chassis: &C,
        pneumatics: &mut P,
    ) {
        if step.is_motion() {
            *motion_issued = true;
        }

        match *step {
            Step::SetPose(pose) => chassis.set_pose(pose),
            Step::CorrectPose { x, y, heading } => {
                let current = chassis.pose();
                chassis.set_pose(Pose::new(
                    x.unwrap_or(current.x),
                    y.unwrap_or(current.y),
                    heading.unwrap_or(current.heading),
                ));
            }
            Step::MoveTo {
                target,
                timeout,
                params,
            } => chassis.move_to_pose(target, timeout, params),
            Step::TurnToHeading {
                heading,
                timeout,
                params,
            } => chassis.turn_to_heading(heading, timeout, params),
            Step::TurnToPoint {
                point,
                timeout,
                params,
            } => chassis.turn_to_point(point, timeout, params),
            Step::Follow {
                path,
                lookahead,
                timeout,
                forwards,
            } => chassis.follow(&path, lookahead, timeout, forwards),
            Step::SetActuator { id, engaged } => {
                if let Err(error) = pneumatics.set(id, engaged) {
                    warn!("{id} write failed: {error}");
                }
            }
            Step::Pause(duration) => self.timer.sleep(duration).await,
            Step::WaitUntilDone => {
                if *motion_issued {
                    chassis.wait_until_done().await;
                } else {
                    debug!("wait-until-done before any motion; skipping");
                }
            }
            Step::WaitUntilTraveled { distance } => {
                if *motion_issued {
                    chassis.wait_until_traveled(distance).await;
                } else {
                    debug!("wait-until-traveled before any motion; skipping");
                }
            }
        }
    }
}
