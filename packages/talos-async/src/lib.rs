//! Tiny async runtime for talos.
//!
//! The executor supports spawning tasks and blocking on futures. Every task
//! runs on the thread that drives the executor, interleaved at `.await`
//! points, so shared state needs no locking.
//!
//! Timers are measured against a swappable [`Clock`] rather than the host
//! clock. Robot programs run on [`WallClock`]; tests and replays run on
//! [`SimClock`], where time only moves when the executor has nothing left to
//! do, so a schedule plays out identically on every run.

mod executor;
mod reactor;

pub mod clock;
pub mod task;
pub mod time;

pub use clock::{Clock, Instant, SimClock, WallClock};
pub use executor::Executor;
pub use task::Task;
pub use time::{Sleep, Timer};
