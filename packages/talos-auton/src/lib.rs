//! Autonomous route definition, selection, and execution.
//!
//! An autonomous period has three moving parts here. A [`RouteTable`] maps
//! selector slots to validated [`Route`]s, built once at startup. A
//! [`RouteSelector`] remembers the driver's pre-match choice. When the field
//! starts the period, a [`Sequencer`] looks the choice up and executes the
//! route's steps against the chassis and pneumatics contracts.
//!
//! Routes are plain data. Everything that interprets a step lives in the
//! sequencer, so adding a route touches no control flow, only the table.

pub mod registry;
pub mod route;
pub mod selector;
pub mod sequencer;
pub mod step;
pub mod telemetry;

pub use registry::{RouteId, RouteTable};
pub use route::{Route, RouteBuilder, RouteError};
pub use selector::RouteSelector;
pub use sequencer::Sequencer;
pub use step::Step;
