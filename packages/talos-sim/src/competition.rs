//! A field controller that runs to a script.

use core::time::Duration;

use talos_async::Timer;
use talos_core::competition::{CompetitionStatus, StatusSource};

/// A [`StatusSource`] that walks through status words on a schedule.
///
/// Each entry takes effect at its offset from the start of the clock and
/// holds until the next one. Before the first entry the robot reads as
/// disconnected from field control.
#[derive(Debug)]
pub struct ScriptedStatus {
    timer: Timer,
    schedule: Vec<(Duration, CompetitionStatus)>,
}

impl ScriptedStatus {
    /// Creates a source replaying `schedule`. Entries may arrive in any
    /// order; they are sorted by offset.
    pub fn new(timer: Timer, schedule: impl Into<Vec<(Duration, CompetitionStatus)>>) -> Self {
        let mut schedule = schedule.into();
        schedule.sort_by_key(|(at, _)| *at);

        Self { timer, schedule }
    }
}

impl StatusSource for ScriptedStatus {
    fn status(&self) -> CompetitionStatus {
        let elapsed = self.timer.now().since_start();

        self.schedule
            .iter()
            .take_while(|(at, _)| *at <= elapsed)
            .last()
            .map_or_else(CompetitionStatus::empty, |(_, status)| *status)
    }
}
