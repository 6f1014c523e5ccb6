//! Pneumatic actuators.
//!
//! Actuators are addressed by role rather than by port, so routines read as
//! "extend the front wings" instead of "set ADI C high". The port mapping
//! lives with the backend that implements [`Pneumatics`].

use core::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};
use std::sync::Arc;

use snafu::Snafu;

/// The solenoid-driven actuators fitted to the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorId {
    /// Wing flaps on the front of the robot.
    FrontWings,
    /// Wing flaps on the rear of the robot.
    RearWings,
    /// Piston dropping the intake.
    Intake,
}

impl ActuatorId {
    /// Every actuator, in display order.
    pub const ALL: [Self; 3] = [Self::FrontWings, Self::RearWings, Self::Intake];
}

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FrontWings => "front wings",
            Self::RearWings => "rear wings",
            Self::Intake => "intake",
        })
    }
}

/// Errors produced by actuator writes.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The actuator's solenoid did not respond on its port.
    #[snafu(display("no solenoid connected to ADI port {port}"))]
    Disconnected {
        /// The three-wire port the solenoid should be wired to.
        port: char,
    },
}

/// Digital actuator outputs.
pub trait Pneumatics {
    /// Drives `id` to `engaged`.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::Disconnected`] if the solenoid's port is
    /// unreachable. Callers in the middle of a routine should log and keep
    /// going; a dead piston does not stop the drivetrain.
    fn set(&mut self, id: ActuatorId, engaged: bool) -> Result<(), ActuatorError>;
}

/// Last commanded state of every actuator, shareable across tasks.
///
/// Written through a [`Monitored`] wrapper and read by telemetry.
#[derive(Debug, Default)]
pub struct ActuatorStates {
    front_wings: AtomicBool,
    rear_wings: AtomicBool,
    intake: AtomicBool,
}

impl ActuatorStates {
    /// Creates states with every actuator released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            front_wings: AtomicBool::new(false),
            rear_wings: AtomicBool::new(false),
            intake: AtomicBool::new(false),
        }
    }

    const fn slot(&self, id: ActuatorId) -> &AtomicBool {
        match id {
            ActuatorId::FrontWings => &self.front_wings,
            ActuatorId::RearWings => &self.rear_wings,
            ActuatorId::Intake => &self.intake,
        }
    }

    /// The last state commanded for `id`.
    #[must_use]
    pub fn get(&self, id: ActuatorId) -> bool {
        self.slot(id).load(Ordering::Relaxed)
    }

    /// Records that `id` was commanded to `engaged`.
    pub fn set(&self, id: ActuatorId, engaged: bool) {
        self.slot(id).store(engaged, Ordering::Relaxed);
    }

    /// Snapshot of every actuator, in [`ActuatorId::ALL`] order.
    #[must_use]
    pub fn snapshot(&self) -> [(ActuatorId, bool); 3] {
        ActuatorId::ALL.map(|id| (id, self.get(id)))
    }
}

/// Wraps a [`Pneumatics`] backend and mirrors every successful write into a
/// shared [`ActuatorStates`].
#[derive(Debug)]
pub struct Monitored<P> {
    inner: P,
    states: Arc<ActuatorStates>,
}

impl<P: Pneumatics> Monitored<P> {
    /// Wraps `inner` with a fresh set of shared states.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            states: Arc::new(ActuatorStates::new()),
        }
    }

    /// The shared states this wrapper writes through to.
    #[must_use]
    pub fn states(&self) -> Arc<ActuatorStates> {
        Arc::clone(&self.states)
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Pneumatics> Pneumatics for Monitored<P> {
    fn set(&mut self, id: ActuatorId, engaged: bool) -> Result<(), ActuatorError> {
        self.inner.set(id, engaged)?;
        self.states.set(id, engaged);
        Ok(())
    }
}
