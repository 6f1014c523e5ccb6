//! Utilities for tracking time.
//!
//! This module provides types for suspending a task until a point in time.
//!
//! - [`Timer`] is a cloneable handle to one executor's timeline.
//! - [`Sleep`] is a future that does no work and completes at a specific
//!   [`Instant`].

use core::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use std::{cell::RefCell, rc::Rc};

use crate::{
    clock::{Clock, Instant},
    reactor::Reactor,
};

/// Mints [`Sleep`] futures on an executor's timeline.
///
/// Obtained from [`Executor::timer`](crate::Executor::timer). Clones are
/// cheap and share the same timeline.
#[derive(Clone)]
pub struct Timer {
    pub(crate) reactor: Rc<RefCell<Reactor>>,
    pub(crate) clock: Rc<dyn Clock>,
}

impl Timer {
    /// The current instant on the executor's clock.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Waits until `duration` has elapsed.
    ///
    /// Equivalent to `sleep_until(timer.now() + duration)`.
    pub fn sleep(&self, duration: Duration) -> Sleep {
        self.sleep_until(self.now() + duration)
    }

    /// Waits until `deadline` is reached.
    pub fn sleep_until(&self, deadline: Instant) -> Sleep {
        Sleep {
            deadline,
            registered: false,
            reactor: Rc::clone(&self.reactor),
            clock: Rc::clone(&self.clock),
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer").finish_non_exhaustive()
    }
}

/// A future that completes once a certain instant is reached in time.
///
/// This type is returned by [`Timer::sleep`] and [`Timer::sleep_until`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Sleep {
    deadline: Instant,
    registered: bool,
    reactor: Rc<RefCell<Reactor>>,
    clock: Rc<dyn Clock>,
}

impl Sleep {
    /// The instant this future completes at.
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.clock.now() >= self.deadline {
            return Poll::Ready(());
        }

        if !self.registered {
            self.reactor
                .borrow_mut()
                .sleepers
                .push(self.deadline, cx.waker().clone());
            self.registered = true;
        }

        Poll::Pending
    }
}

impl fmt::Debug for Sleep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sleep")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
