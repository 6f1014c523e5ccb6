use std::{
    cell::RefCell,
    collections::VecDeque,
    future::Future,
    pin::pin,
    rc::Rc,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll},
};

use waker_fn::waker_fn;

use crate::{
    clock::{Clock, WallClock},
    reactor::Reactor,
    task::Task,
    time::Timer,
};

type Runnable = async_task::Runnable;

/// A single-threaded, cooperatively scheduled task executor.
///
/// Tasks run interleaved on the thread that calls [`block_on`](Executor::block_on):
/// each task keeps the thread until it yields at an `.await`, then the next
/// scheduled task runs. Nothing runs in parallel, so tasks may share state
/// through `Rc` and `RefCell` without locking.
///
/// Timers measure against the executor's [`Clock`]. With the default
/// [`WallClock`] an idle executor sleeps the thread until the next deadline
/// is reached. With a [`SimClock`](crate::SimClock) it jumps the clock there
/// instead, running timed code in virtual time.
pub struct Executor {
    queue: Rc<RefCell<VecDeque<Runnable>>>,
    reactor: Rc<RefCell<Reactor>>,
    clock: Rc<dyn Clock>,
}

impl Executor {
    /// Creates an executor that tracks real time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Rc::new(WallClock::new()))
    }

    /// Creates an executor driven by `clock`.
    ///
    /// The caller keeps its own handle to the clock, which is how tests hold
    /// onto a [`SimClock`](crate::SimClock) they advance by hand.
    pub fn with_clock<C: Clock + 'static>(clock: Rc<C>) -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
            reactor: Rc::new(RefCell::new(Reactor::new())),
            clock,
        }
    }

    /// Returns a [`Timer`] that mints sleeps on this executor's clock.
    #[must_use]
    pub fn timer(&self) -> Timer {
        Timer {
            reactor: Rc::clone(&self.reactor),
            clock: Rc::clone(&self.clock),
        }
    }

    /// Spawns a task onto the executor, returning a handle to it.
    ///
    /// The task starts running the next time the executor is driven. Dropping
    /// the handle cancels the task; call [`Task::detach`] to let it run
    /// unsupervised instead.
    pub fn spawn<T>(&self, future: impl Future<Output = T> + 'static) -> Task<T> {
        let queue = Rc::clone(&self.queue);

        // SAFETY: the executor is neither `Send` nor `Sync`, so runnables and
        // their wakers never leave the spawning thread. Both `future` and
        // `schedule` are `'static`, so neither can be used after being freed.
        let (runnable, task) = unsafe {
            async_task::spawn_unchecked(future, move |runnable| {
                queue.borrow_mut().push_back(runnable);
            })
        };

        runnable.schedule();

        task
    }

    /// Wakes due timers and runs the next scheduled task, if any.
    ///
    /// Returns `false` when no task was ready to run.
    pub fn tick(&self) -> bool {
        self.reactor.borrow_mut().tick(self.clock.now());

        let runnable = self.queue.borrow_mut().pop_front();

        if let Some(runnable) = runnable {
            runnable.run();
            true
        } else {
            false
        }
    }

    /// Drives the executor until `future` completes, returning its output.
    ///
    /// Spawned tasks that have not finished keep their progress and continue
    /// the next time the executor runs.
    ///
    /// # Panics
    ///
    /// Panics if every task is blocked and no timer is pending, since nothing
    /// could ever wake the executor again.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        let mut future = pin!(future);

        let woken = Arc::new(AtomicBool::new(true));
        let waker = waker_fn({
            let woken = Arc::clone(&woken);
            move || woken.store(true, Ordering::Relaxed)
        });
        let mut cx = Context::from_waker(&waker);

        loop {
            if woken.swap(false, Ordering::Relaxed) {
                if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                    return output;
                }
            }

            if !self.tick() && !woken.load(Ordering::Relaxed) {
                self.idle();
            }
        }
    }

    /// Waits out the gap to the next timer deadline when nothing is runnable.
    fn idle(&self) {
        let deadline = self.reactor.borrow().sleepers.next_deadline();

        match deadline {
            Some(deadline) => {
                if !self.clock.advance_to(deadline) {
                    let gap = deadline.duration_since(self.clock.now());
                    if !gap.is_zero() {
                        std::thread::sleep(gap);
                    }
                }
            }
            None => panic!("executor deadlocked: no runnable tasks and no pending timers"),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use core::time::Duration;
    use std::rc::Rc;

    use super::*;
    use crate::clock::SimClock;

    fn sim_executor() -> (Executor, Rc<SimClock>) {
        let clock = Rc::new(SimClock::new());
        (Executor::with_clock(Rc::clone(&clock)), clock)
    }

    #[test]
    fn block_on_returns_output() {
        let executor = Executor::new();
        assert_eq!(executor.block_on(async { 7 * 6 }), 42);
    }

    #[test]
    fn spawned_tasks_run_to_completion() {
        let executor = Executor::new();
        let task = executor.spawn(async { "done" });
        assert_eq!(executor.block_on(task), "done");
    }

    #[test]
    fn sleeps_advance_a_sim_clock() {
        let (executor, clock) = sim_executor();
        let timer = executor.timer();

        executor.block_on(async {
            timer.sleep(Duration::from_millis(500)).await;
            timer.sleep(Duration::from_millis(1500)).await;
        });

        assert_eq!(clock.now().since_start(), Duration::from_secs(2));
    }

    #[test]
    fn sleeps_wake_in_deadline_order() {
        let (executor, _clock) = sim_executor();
        let timer = executor.timer();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("slow", 30), ("fast", 10), ("medium", 20)] {
            let timer = timer.clone();
            let order = Rc::clone(&order);
            executor
                .spawn(async move {
                    timer.sleep(Duration::from_millis(delay)).await;
                    order.borrow_mut().push(label);
                })
                .detach();
        }

        executor.block_on(timer.sleep(Duration::from_millis(50)));

        assert_eq!(*order.borrow(), ["fast", "medium", "slow"]);
    }

    #[test]
    fn zero_length_sleep_is_immediate() {
        let (executor, clock) = sim_executor();
        let timer = executor.timer();

        executor.block_on(timer.sleep(Duration::ZERO));

        assert_eq!(clock.now(), crate::Instant::ZERO);
    }

    #[test]
    fn manual_advance_wakes_sleepers() {
        let (executor, clock) = sim_executor();
        let timer = executor.timer();

        let task = executor.spawn(async move {
            timer.sleep(Duration::from_millis(100)).await;
        });

        // Park the task on its timer without letting the executor idle.
        while executor.tick() {}
        clock.advance(Duration::from_millis(100));

        executor.block_on(task);
    }

    #[test]
    #[should_panic(expected = "executor deadlocked")]
    fn blocking_on_a_stuck_future_panics() {
        let (executor, _clock) = sim_executor();
        executor.block_on(std::future::pending::<()>());
    }
}
