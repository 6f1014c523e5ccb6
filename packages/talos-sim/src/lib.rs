//! Deterministic simulation backends for the talos contracts.
//!
//! Every hardware trait in `talos-core` gets a scripted stand-in here:
//! a kinematic [`SimChassis`], a [`SimPneumatics`] bank that records
//! writes and can be forced offline, a [`ScriptedGamepad`] that replays
//! canned stick frames, and a [`ScriptedStatus`] source that walks the
//! match through its phases on a schedule.
//!
//! Paired with [`talos_async::SimClock`], these make routine and driver
//! logic testable on the bench: the executor advances virtual time only
//! when every task is parked, so a full two-minute match replays in
//! microseconds and produces the same trace every run.

pub mod chassis;
pub mod competition;
pub mod gamepad;
pub mod pneumatics;

pub use chassis::{ChassisCall, SimChassis};
pub use competition::ScriptedStatus;
pub use gamepad::ScriptedGamepad;
pub use pneumatics::SimPneumatics;
