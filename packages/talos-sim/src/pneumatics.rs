//! A recording pneumatics bank.

use core::time::Duration;

use talos_async::Timer;
use talos_core::pneumatics::{ActuatorError, ActuatorId, Pneumatics};

/// One recorded actuator write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorWrite {
    /// When the write landed, measured from the start of the clock.
    pub at: Duration,
    /// The actuator written.
    pub id: ActuatorId,
    /// The commanded state.
    pub engaged: bool,
}

/// A [`Pneumatics`] backend that records every write with a timestamp.
///
/// Individual solenoids can be taken offline to exercise the failure paths
/// of routine and driver code.
#[derive(Debug)]
pub struct SimPneumatics {
    timer: Timer,
    offline: Vec<ActuatorId>,
    writes: Vec<ActuatorWrite>,
}

impl SimPneumatics {
    /// Creates a bank with every solenoid connected.
    #[must_use]
    pub fn new(timer: Timer) -> Self {
        Self {
            timer,
            offline: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Unplugs `id`. Writes to it fail until [`reconnect`](Self::reconnect).
    pub fn disconnect(&mut self, id: ActuatorId) {
        if !self.offline.contains(&id) {
            self.offline.push(id);
        }
    }

    /// Plugs `id` back in.
    pub fn reconnect(&mut self, id: ActuatorId) {
        self.offline.retain(|offline| *offline != id);
    }

    /// Every successful write so far, oldest first.
    #[must_use]
    pub fn writes(&self) -> &[ActuatorWrite] {
        &self.writes
    }

    /// The ADI port an actuator's solenoid reports errors under.
    const fn port(id: ActuatorId) -> char {
        match id {
            ActuatorId::FrontWings => 'C',
            ActuatorId::RearWings => 'A',
            ActuatorId::Intake => 'B',
        }
    }
}

impl Pneumatics for SimPneumatics {
    fn set(&mut self, id: ActuatorId, engaged: bool) -> Result<(), ActuatorError> {
        if self.offline.contains(&id) {
            return Err(ActuatorError::Disconnected {
                port: Self::port(id),
            });
        }

        self.writes.push(ActuatorWrite {
            at: self.timer.now().since_start(),
            id,
            engaged,
        });
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use talos_async::{Executor, SimClock};

    use super::*;

    #[test]
    fn writes_carry_their_timestamp() {
        let executor = Executor::with_clock(Rc::new(SimClock::new()));
        let timer = executor.timer();
        let mut pneumatics = SimPneumatics::new(timer.clone());

        executor.block_on(async {
            pneumatics.set(ActuatorId::FrontWings, true).ok();
            timer.sleep(Duration::from_millis(800)).await;
            pneumatics.set(ActuatorId::FrontWings, false).ok();
        });

        assert_eq!(
            pneumatics.writes(),
            [
                ActuatorWrite {
                    at: Duration::ZERO,
                    id: ActuatorId::FrontWings,
                    engaged: true,
                },
                ActuatorWrite {
                    at: Duration::from_millis(800),
                    id: ActuatorId::FrontWings,
                    engaged: false,
                },
            ]
        );
    }

    #[test]
    fn disconnected_solenoids_reject_writes() {
        let executor = Executor::with_clock(Rc::new(SimClock::new()));
        let mut pneumatics = SimPneumatics::new(executor.timer());

        pneumatics.disconnect(ActuatorId::Intake);
        assert_eq!(
            pneumatics.set(ActuatorId::Intake, true),
            Err(ActuatorError::Disconnected { port: 'B' })
        );
        assert!(pneumatics.writes().is_empty());

        pneumatics.reconnect(ActuatorId::Intake);
        assert!(pneumatics.set(ActuatorId::Intake, true).is_ok());
        assert_eq!(pneumatics.writes().len(), 1);
    }
}
