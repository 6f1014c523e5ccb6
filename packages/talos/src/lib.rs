//! # talos
//!
//! Route-driven competition runtime for VEX V5 robots.
//!
//! A talos program is written in three layers. At the bottom, [`chassis`],
//! [`pneumatics`], and [`gamepad`] are contracts: traits the rest of the
//! program drives without knowing whether a real drivetrain or a simulator
//! is answering. Above them, [`auton`] turns autonomous routines into data:
//! routes are validated once at startup, registered in a table by selector
//! slot, and executed step by step when the field starts the period. At the
//! top, [`robot::Robot`] ties one set of backends to the competition
//! lifecycle, and [`setup`] holds this robot's hardware map and routes.
//!
//! Everything is paced by a [`Timer`](time::Timer) on the executor's clock,
//! so the same program runs against hardware on [`WallClock`] and against
//! the [`sim`] backends on [`SimClock`], where a full match replays in
//! microseconds.
//!
//! [`WallClock`]: runtime::WallClock
//! [`SimClock`]: runtime::SimClock
//!
//! # Usage
//!
//! ```
//! use core::time::Duration;
//! use std::rc::Rc;
//!
//! use talos::prelude::*;
//!
//! let executor = Executor::with_clock(Rc::new(SimClock::new()));
//! let timer = executor.timer();
//!
//! let chassis = SimChassis::new(timer.clone());
//! let mut pneumatics = SimPneumatics::new(timer.clone());
//!
//! let route = Route::builder("demo")
//!     .move_to(0.0, 30.0, 0.0, Duration::from_secs(2))
//!     .wait_until_done()
//!     .actuator(ActuatorId::Intake, true)
//!     .build();
//!
//! executor.block_on(Sequencer::new(timer).execute(&route, &chassis, &mut pneumatics));
//!
//! assert_eq!(chassis.pose(), Pose::new(0.0, 30.0, 0.0));
//! ```

/// Async executor and the clocks that drive it.
pub mod runtime {
    #[doc(inline)]
    pub use talos_async::{Clock, Executor, Instant, SimClock, Task, WallClock};
}

/// Timers and sleep futures measured on the executor's clock.
pub mod time {
    #[doc(inline)]
    pub use talos_async::time::{Sleep, Timer};
}

#[doc(inline)]
pub use talos_auton as auton;
#[doc(inline)]
pub use talos_core::{chassis, competition, config, gamepad, geometry, pneumatics};
#[doc(inline)]
#[cfg(feature = "sim")]
pub use talos_sim as sim;

pub mod driver;
pub mod robot;
pub mod setup;

/// Commonly used features of talos.
///
/// This module is meant to be glob imported.
pub mod prelude {
    #[doc(inline)]
    pub use talos_core::path_asset;

    #[cfg(feature = "sim")]
    pub use crate::sim::{ChassisCall, ScriptedGamepad, ScriptedStatus, SimChassis, SimPneumatics};
    pub use crate::{
        auton::{Route, RouteId, RouteSelector, RouteTable, Sequencer, Step},
        chassis::{Chassis, MoveToPoseParams, PathAsset, TurnDirection, TurnToParams},
        competition::{Compete, CompeteExt, CompetitionStatus, StatusSource},
        driver::{DriverConfig, DriverToggles},
        gamepad::{Gamepad, GamepadState},
        geometry::{Point, Pose},
        pneumatics::{ActuatorId, ActuatorStates, Monitored, Pneumatics},
        robot::Robot,
        runtime::{Executor, SimClock, Task, WallClock},
        time::{Sleep, Timer},
    };
}
