//! The robot program.
//!
//! [`Robot`] owns one set of backends and implements [`Compete`] over them,
//! so the whole program is a value handed to competition control. Shared
//! handles to the chassis, actuator states, and route selector are available
//! before the handoff for telemetry and selection UI tasks.

use std::{rc::Rc, sync::Arc};

use log::info;
use talos_async::time::Timer;
use talos_auton::{RouteSelector, RouteTable, Sequencer};
use talos_core::{
    chassis::Chassis,
    competition::Compete,
    gamepad::Gamepad,
    pneumatics::{ActuatorStates, Monitored, Pneumatics},
};

use crate::driver::{self, DriverConfig};

/// A complete competition robot: backends, routes, and the phase handlers
/// the field controller drives.
///
/// The autonomous handler reads the selector once when the period starts and
/// hands the chosen slot to the sequencer. The driver handler runs the
/// control loop until the field moves on. Hand the robot to
/// [`CompeteExt::compete`] to put it under field control.
///
/// [`CompeteExt::compete`]: talos_core::competition::CompeteExt::compete
#[derive(Debug)]
pub struct Robot<C, P, G> {
    chassis: Rc<C>,
    pneumatics: Monitored<P>,
    gamepad: G,
    routes: RouteTable,
    selector: Arc<RouteSelector>,
    sequencer: Sequencer,
    driver: DriverConfig,
    timer: Timer,
}

impl<C: Chassis, P: Pneumatics, G: Gamepad> Robot<C, P, G> {
    /// Assembles a robot from its backends and route table.
    ///
    /// The pneumatics backend is wrapped in [`Monitored`] so telemetry can
    /// observe actuator states without holding the backend itself.
    pub fn new(
        timer: Timer,
        chassis: C,
        pneumatics: P,
        gamepad: G,
        routes: RouteTable,
        selector: RouteSelector,
    ) -> Self {
        Self {
            chassis: Rc::new(chassis),
            pneumatics: Monitored::new(pneumatics),
            gamepad,
            routes,
            selector: Arc::new(selector),
            sequencer: Sequencer::new(timer.clone()),
            driver: DriverConfig::default(),
            timer,
        }
    }

    /// Replaces the driver control tuning.
    #[must_use]
    pub fn with_driver_config(mut self, config: DriverConfig) -> Self {
        self.driver = config;
        self
    }

    /// A shared handle to the chassis backend.
    #[must_use]
    pub fn chassis(&self) -> Rc<C> {
        Rc::clone(&self.chassis)
    }

    /// The shared actuator states mirror.
    #[must_use]
    pub fn actuator_states(&self) -> Arc<ActuatorStates> {
        self.pneumatics.states()
    }

    /// A shared handle to the route selector, for selection UIs.
    #[must_use]
    pub fn selector(&self) -> Arc<RouteSelector> {
        Arc::clone(&self.selector)
    }

    /// The monitored pneumatics wrapper.
    #[must_use]
    pub fn pneumatics(&self) -> &Monitored<P> {
        &self.pneumatics
    }
}

impl<C: Chassis, P: Pneumatics, G: Gamepad> Compete for Robot<C, P, G> {
    async fn connected(&mut self) {
        info!("connected to competition control");
    }

    async fn disconnected(&mut self) {
        info!("lost competition control");
    }

    async fn disabled(&mut self) {
        info!("disabled by field control");
    }

    async fn autonomous(&mut self) {
        let slot = self.selector.active();
        info!("autonomous started; running slot {slot}");

        self.sequencer
            .run(&self.routes, slot, &*self.chassis, &mut self.pneumatics)
            .await;
    }

    async fn driver(&mut self) {
        info!("driver control started");

        driver::drive(
            &*self.chassis,
            &mut self.pneumatics,
            &mut self.gamepad,
            &self.timer,
            self.driver,
        )
        .await;
    }
}
