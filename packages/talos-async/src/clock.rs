//! Time sources for the executor.
//!
//! Timers never read the host clock directly. They measure against a
//! [`Clock`], which gives every executor a single timeline that can be backed
//! by real time ([`WallClock`]) or driven by hand ([`SimClock`]).

use core::{
    cell::Cell,
    fmt,
    ops::{Add, AddAssign, Sub},
    time::Duration,
};

/// A point on a [`Clock`]'s timeline.
///
/// Instants are measured from the moment their clock started and are only
/// meaningful when compared against instants from the same clock.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(Duration);

impl Instant {
    /// The instant at which every clock starts.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Returns the time elapsed from `earlier` to `self`, or zero if
    /// `earlier` is actually the later of the two.
    #[must_use]
    pub fn duration_since(&self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns this instant's offset from the start of its clock.
    #[must_use]
    pub const fn since_start(&self) -> Duration {
        self.0
    }
}

impl Add<Duration> for Instant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs;
    }
}

impl Sub<Duration> for Instant {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        Self(self.0.saturating_sub(rhs))
    }
}

impl Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.duration_since(rhs)
    }
}

impl fmt::Debug for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// A monotonic time source for an [`Executor`](crate::Executor).
pub trait Clock {
    /// The current instant on this clock's timeline.
    fn now(&self) -> Instant;

    /// Jumps the timeline forward to `deadline`, if this clock supports it.
    ///
    /// Returns `true` when the jump happened. Clocks tied to real time return
    /// `false`, and an idle executor waits the gap out instead.
    fn advance_to(&self, deadline: Instant) -> bool;
}

/// A [`Clock`] backed by the host's monotonic clock.
#[derive(Debug)]
pub struct WallClock {
    origin: std::time::Instant,
}

impl WallClock {
    /// Creates a clock that starts counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> Instant {
        Instant(self.origin.elapsed())
    }

    fn advance_to(&self, _deadline: Instant) -> bool {
        false
    }
}

/// A manually driven [`Clock`].
///
/// The timeline only moves when [`advance`](SimClock::advance) is called or
/// when an idle executor jumps it to the next timer deadline. Code running
/// under a `SimClock` observes timeouts and delays at full speed without the
/// host actually waiting them out.
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<Duration>,
}

impl SimClock {
    /// Creates a clock frozen at [`Instant::ZERO`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the timeline forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for SimClock {
    fn now(&self) -> Instant {
        Instant(self.now.get())
    }

    fn advance_to(&self, deadline: Instant) -> bool {
        if deadline.0 > self.now.get() {
            self.now.set(deadline.0);
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn instant_arithmetic_saturates() {
        let early = Instant::ZERO + Duration::from_millis(10);
        let late = Instant::ZERO + Duration::from_millis(35);

        assert_eq!(late - early, Duration::from_millis(25));
        assert_eq!(early - late, Duration::ZERO);
        assert_eq!(early - Duration::from_millis(50), Instant::ZERO);
    }

    #[test]
    fn sim_clock_never_rewinds() {
        let clock = SimClock::new();
        clock.advance(Duration::from_millis(100));

        assert!(clock.advance_to(Instant::ZERO + Duration::from_millis(40)));
        assert_eq!(clock.now().since_start(), Duration::from_millis(100));

        assert!(clock.advance_to(Instant::ZERO + Duration::from_millis(250)));
        assert_eq!(clock.now().since_start(), Duration::from_millis(250));
    }
}
