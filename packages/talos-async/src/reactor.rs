use std::{collections::BTreeMap, task::Waker};

use crate::clock::Instant;

/// Timers waiting to fire, ordered by deadline.
///
/// Each deadline is paired with an insertion sequence number so sleepers
/// sharing an instant keep separate entries.
pub(crate) struct Sleepers {
    entries: BTreeMap<(Instant, u64), Waker>,
    sequence: u64,
}

impl Sleepers {
    pub fn push(&mut self, deadline: Instant, waker: Waker) {
        self.entries.insert((deadline, self.sequence), waker);
        self.sequence += 1;
    }

    pub fn pop_due(&mut self, now: Instant) -> Option<Waker> {
        let (&key, _) = self.entries.first_key_value()?;

        if key.0 <= now {
            self.entries.remove(&key)
        } else {
            None
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first_key_value().map(|(key, _)| key.0)
    }
}

pub(crate) struct Reactor {
    pub(crate) sleepers: Sleepers,
}

impl Reactor {
    pub const fn new() -> Self {
        Self {
            sleepers: Sleepers {
                entries: BTreeMap::new(),
                sequence: 0,
            },
        }
    }

    /// Wakes every sleeper whose deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        while let Some(waker) = self.sleepers.pop_due(now) {
            waker.wake();
        }
    }
}

#[cfg(test)]
mod test {
    use core::time::Duration;

    use super::*;

    fn noop_waker() -> Waker {
        waker_fn::waker_fn(|| {})
    }

    #[test]
    fn sleepers_share_a_deadline() {
        let mut sleepers = Sleepers {
            entries: BTreeMap::new(),
            sequence: 0,
        };
        let deadline = Instant::ZERO + Duration::from_millis(20);

        sleepers.push(deadline, noop_waker());
        sleepers.push(deadline, noop_waker());

        assert!(sleepers.pop_due(deadline).is_some());
        assert!(sleepers.pop_due(deadline).is_some());
        assert!(sleepers.pop_due(deadline).is_none());
    }

    #[test]
    fn pop_due_respects_order() {
        let mut sleepers = Sleepers {
            entries: BTreeMap::new(),
            sequence: 0,
        };

        sleepers.push(Instant::ZERO + Duration::from_millis(30), noop_waker());
        sleepers.push(Instant::ZERO + Duration::from_millis(10), noop_waker());

        assert_eq!(
            sleepers.next_deadline(),
            Some(Instant::ZERO + Duration::from_millis(10))
        );
        assert!(sleepers.pop_due(Instant::ZERO).is_none());
        assert!(sleepers
            .pop_due(Instant::ZERO + Duration::from_millis(10))
            .is_some());
        assert_eq!(
            sleepers.next_deadline(),
            Some(Instant::ZERO + Duration::from_millis(30))
        );
    }
}
