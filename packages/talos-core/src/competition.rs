//! Competition lifecycle.
//!
//! A match-legal program does not decide what it runs; the field controller
//! does. This module reads the controller's raw status through a
//! [`StatusSource`], tracks transitions, and drives a [`Compete`]
//! implementation through the matching phase handlers, cancelling the
//! running handler whenever the field moves the match along.

use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use bitflags::bitflags;
use futures_core::Stream;
use futures_util::future::{select, Either};
use talos_async::time::{Sleep, Timer};

bitflags! {
    /// The raw status bits reported by competition control.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CompetitionStatus: u32 {
        /// Robot is disabled by field control.
        const DISABLED = 1 << 0;

        /// Robot is in autonomous mode.
        const AUTONOMOUS = 1 << 1;

        /// Robot is connected to competition control (either competition
        /// switch or field control).
        const CONNECTED = 1 << 2;

        /// Robot is connected to field control (NOT competition switch).
        const SYSTEM = 1 << 3;
    }
}

/// A mode that the robot can be set in during the competition lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionMode {
    /// The Disabled competition mode.
    ///
    /// Robots may not move any motors or actuators in this mode.
    Disabled,

    /// The Autonomous competition mode.
    ///
    /// Robots run without any driver input in this mode.
    Autonomous,

    /// The Driver Control competition mode.
    Driver,
}

/// A type of system used to control competition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionSystem {
    /// A competition field controller.
    FieldControl,

    /// A hand-held competition switch.
    CompetitionSwitch,
}

impl CompetitionStatus {
    /// Whether the robot is connected to competition control.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.contains(Self::CONNECTED)
    }

    /// The competition mode this status encodes.
    #[must_use]
    pub const fn mode(&self) -> CompetitionMode {
        if self.contains(Self::DISABLED) {
            CompetitionMode::Disabled
        } else if self.contains(Self::AUTONOMOUS) {
            CompetitionMode::Autonomous
        } else {
            CompetitionMode::Driver
        }
    }

    /// The system controlling the competition, if any is connected.
    #[must_use]
    pub const fn system(&self) -> Option<CompetitionSystem> {
        if self.is_connected() {
            if self.contains(Self::SYSTEM) {
                Some(CompetitionSystem::FieldControl)
            } else {
                Some(CompetitionSystem::CompetitionSwitch)
            }
        } else {
            None
        }
    }
}

/// A source of raw competition status.
///
/// Hardware backends read their brain's competition word; simulators play a
/// schedule back.
pub trait StatusSource {
    /// The current status word.
    fn status(&self) -> CompetitionStatus;
}

/// A stream of updates to the competition status.
///
/// Yields the new status word whenever it differs from the previously
/// observed one. The source is sampled every [`POLL_INTERVAL`] on the
/// executor's clock.
///
/// [`POLL_INTERVAL`]: StatusUpdates::POLL_INTERVAL
pub struct StatusUpdates<S> {
    source: S,
    timer: Timer,
    last: CompetitionStatus,
    poll_delay: Option<Sleep>,
}

impl<S: StatusSource> StatusUpdates<S> {
    /// How often the source is sampled for changes.
    pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

    /// Creates a stream over `source`, treating its current status as the
    /// starting point.
    pub fn new(source: S, timer: Timer) -> Self {
        let last = source.status();

        Self {
            source,
            timer,
            last,
            poll_delay: None,
        }
    }

    /// The most recently observed status.
    #[must_use]
    pub const fn last(&self) -> CompetitionStatus {
        self.last
    }

    /// Waits for the next status change.
    pub fn changed(&mut self) -> Changed<'_, S> {
        Changed { updates: self }
    }
}

impl<S: StatusSource + Unpin> Stream for StatusUpdates<S> {
    type Item = CompetitionStatus;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            let status = this.source.status();
            if status != this.last {
                this.last = status;
                this.poll_delay = None;
                return Poll::Ready(Some(status));
            }

            let delay = this
                .poll_delay
                .get_or_insert_with(|| this.timer.sleep(Self::POLL_INTERVAL));

            match Pin::new(delay).poll(cx) {
                Poll::Ready(()) => this.poll_delay = None,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Future returned by [`StatusUpdates::changed`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Changed<'a, S> {
    updates: &'a mut StatusUpdates<S>,
}

impl<S: StatusSource + Unpin> Future for Changed<'_, S> {
    type Output = CompetitionStatus;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut *self.updates).poll_next(cx) {
            Poll::Ready(Some(status)) => Poll::Ready(status),
            Poll::Ready(None) | Poll::Pending => Poll::Pending,
        }
    }
}

/// Phase of the competition lifecycle the program is acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Competition control has never been observed.
    NeverConnected,
    /// Previously connected to competition control, but not anymore.
    Disconnected,
    /// Just connected or reconnected, running the connect handler.
    Connected,
    /// Acting on a competition mode.
    InMode(CompetitionMode),
}

impl Phase {
    /// Advances the phase in response to a status change.
    fn process_status_update(&mut self, status: CompetitionStatus) {
        *self = match *self {
            Self::NeverConnected | Self::Disconnected if status.is_connected() => Self::Connected,
            Self::Connected | Self::InMode(_) if !status.is_connected() => Self::Disconnected,
            Self::InMode(mode) if mode != status.mode() => Self::InMode(status.mode()),
            current => current,
        };
    }

    /// Advances the phase after its handler has run to completion.
    fn finish_handler(&mut self, status: CompetitionStatus) {
        if *self == Self::Connected {
            *self = Self::InMode(status.mode());
        }
    }
}

/// A competition-ready robot program.
///
/// Implementors provide a handler per competition phase; the default for
/// every handler is to do nothing. Handlers are cancelled mid-await when the
/// field controller moves the match on, so state that must outlive a phase
/// belongs on `self`, not in handler locals.
#[allow(async_fn_in_trait)]
pub trait Compete: Sized {
    /// Runs when the robot becomes connected to competition control.
    async fn connected(&mut self) {}

    /// Runs when the robot loses its connection to competition control.
    async fn disconnected(&mut self) {}

    /// Runs when the robot is disabled by field control.
    async fn disabled(&mut self) {}

    /// Runs the autonomous period.
    async fn autonomous(&mut self) {}

    /// Runs the driver control period.
    async fn driver(&mut self) {}
}

/// Extension methods for [`Compete`].
///
/// Automatically implemented for any type implementing [`Compete`].
#[allow(async_fn_in_trait)]
pub trait CompeteExt: Compete {
    /// Hands the program over to competition control. This future never
    /// resolves.
    ///
    /// Phase handlers run as the field dictates. A handler still awaiting
    /// when its phase ends is dropped at its current suspension point and
    /// never resumed; the next phase starts from its handler's top.
    async fn compete<S: StatusSource + Unpin>(mut self, source: S, timer: Timer) {
        let mut updates = StatusUpdates::new(source, timer);
        let mut phase = Phase::NeverConnected;

        // Act on whatever status is already present at startup.
        phase.process_status_update(updates.last());

        loop {
            log::trace!("competition phase: {phase:?}");

            let handler: Option<Pin<Box<dyn Future<Output = ()> + '_>>> = match phase {
                Phase::NeverConnected => None,
                Phase::Disconnected => Some(Box::pin(self.disconnected())),
                Phase::Connected => Some(Box::pin(self.connected())),
                Phase::InMode(CompetitionMode::Disabled) => Some(Box::pin(self.disabled())),
                Phase::InMode(CompetitionMode::Autonomous) => Some(Box::pin(self.autonomous())),
                Phase::InMode(CompetitionMode::Driver) => Some(Box::pin(self.driver())),
            };

            let Some(handler) = handler else {
                let status = updates.changed().await;
                phase.process_status_update(status);
                continue;
            };

            match select(handler, updates.changed()).await {
                Either::Left(((), changed)) => {
                    drop(changed);

                    let before = phase;
                    phase.finish_handler(updates.last());

                    if phase == before {
                        // The handler finished early; idle out the rest of
                        // the phase.
                        let status = updates.changed().await;
                        phase.process_status_update(status);
                    }
                }
                Either::Right((status, handler)) => {
                    drop(handler);
                    phase.process_status_update(status);
                }
            }
        }
    }
}

impl<R: Compete> CompeteExt for R {}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, pin::pin, rc::Rc};

    use talos_async::{Executor, SimClock};

    use super::*;

    #[test]
    fn status_decodes_mode_and_system() {
        let auton = CompetitionStatus::CONNECTED | CompetitionStatus::AUTONOMOUS;
        assert_eq!(auton.mode(), CompetitionMode::Autonomous);
        assert_eq!(auton.system(), Some(CompetitionSystem::CompetitionSwitch));

        let disabled =
            CompetitionStatus::CONNECTED | CompetitionStatus::SYSTEM | CompetitionStatus::DISABLED;
        assert_eq!(disabled.mode(), CompetitionMode::Disabled);
        assert_eq!(disabled.system(), Some(CompetitionSystem::FieldControl));

        let idle = CompetitionStatus::empty();
        assert_eq!(idle.mode(), CompetitionMode::Driver);
        assert_eq!(idle.system(), None);
        assert!(!idle.is_connected());
    }

    #[test]
    fn phase_follows_connection_and_mode() {
        let connected_auton = CompetitionStatus::CONNECTED | CompetitionStatus::AUTONOMOUS;
        let connected_driver = CompetitionStatus::CONNECTED;

        let mut phase = Phase::NeverConnected;

        phase.process_status_update(CompetitionStatus::empty());
        assert_eq!(phase, Phase::NeverConnected);

        phase.process_status_update(connected_auton);
        assert_eq!(phase, Phase::Connected);

        phase.finish_handler(connected_auton);
        assert_eq!(phase, Phase::InMode(CompetitionMode::Autonomous));

        phase.process_status_update(connected_driver);
        assert_eq!(phase, Phase::InMode(CompetitionMode::Driver));

        phase.process_status_update(CompetitionStatus::empty());
        assert_eq!(phase, Phase::Disconnected);

        phase.process_status_update(connected_driver);
        assert_eq!(phase, Phase::Connected);
    }

    struct ScheduledStatus {
        timer: Timer,
        schedule: Vec<(Duration, CompetitionStatus)>,
    }

    impl StatusSource for ScheduledStatus {
        fn status(&self) -> CompetitionStatus {
            let elapsed = self.timer.now().since_start();

            self.schedule
                .iter()
                .take_while(|(at, _)| *at <= elapsed)
                .last()
                .map_or(CompetitionStatus::empty(), |(_, status)| *status)
        }
    }

    struct Recorder {
        timer: Timer,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Recorder {
        fn record(&self, event: &'static str) {
            self.log.borrow_mut().push(event);
        }
    }

    impl Compete for Recorder {
        async fn connected(&mut self) {
            self.record("connected");
        }

        async fn disabled(&mut self) {
            self.record("disabled");
        }

        async fn autonomous(&mut self) {
            self.record("autonomous");
            self.timer.sleep(Duration::from_secs(60)).await;
            self.record("autonomous finished");
        }

        async fn driver(&mut self) {
            self.record("driver");
        }
    }

    #[test]
    fn handlers_follow_the_field_and_cancel_on_mode_change() {
        let clock = Rc::new(SimClock::new());
        let executor = Executor::with_clock(Rc::clone(&clock));
        let timer = executor.timer();

        let connected = CompetitionStatus::CONNECTED | CompetitionStatus::SYSTEM;
        let source = ScheduledStatus {
            timer: timer.clone(),
            schedule: vec![
                (Duration::ZERO, connected | CompetitionStatus::DISABLED),
                (Duration::from_millis(50), connected | CompetitionStatus::AUTONOMOUS),
                (Duration::from_millis(150), connected),
            ],
        };

        let log = Rc::new(RefCell::new(Vec::new()));
        let robot = Recorder {
            timer: timer.clone(),
            log: Rc::clone(&log),
        };

        executor.block_on(async {
            let run = pin!(robot.compete(source, timer.clone()));
            let deadline = pin!(timer.sleep(Duration::from_millis(300)));
            select(run, deadline).await;
        });

        // The 60 second autonomous handler must be dropped at the driver
        // switch, not left to finish.
        assert_eq!(
            *log.borrow(),
            ["connected", "disabled", "autonomous", "driver"]
        );
    }
}
