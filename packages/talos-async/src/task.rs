//! Handles to spawned tasks.

/// An owned permission to join a spawned task.
///
/// Returned by [`Executor::spawn`](crate::Executor::spawn). Awaiting the
/// handle yields the task's output once it completes. Dropping the handle
/// cancels the task; [`Task::detach`] releases it to run on its own.
pub type Task<T> = async_task::Task<T>;
