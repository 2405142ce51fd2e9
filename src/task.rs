//! Task polling utilities
//!
//! Background work runs on the tokio runtime; the owner of the session polls
//! the handles from its own loop (the egui frame or the CLI loop).

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// Result of polling a task
pub enum PollResult<T> {
    /// No task to poll (task was None)
    NoTask,
    /// Task is still running
    Pending,
    /// Task completed with result (may be Ok or join error)
    Complete(Result<T, JoinError>),
}

/// Poll an optional task handle and return its result if finished.
///
/// The handle is taken out of `task` only once it has finished, so a pending
/// task stays in place for the next poll.
///
/// # Example
/// ```ignore
/// match poll_task(&mut self.task) {
///     PollResult::Complete(Ok(outcome)) => { /* reconcile */ }
///     PollResult::Complete(Err(e)) => { /* task panicked or was aborted */ }
///     PollResult::Pending => ctx.request_repaint(),
///     PollResult::NoTask => {}
/// }
/// ```
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    match task {
        None => return PollResult::NoTask,
        Some(handle) if !handle.is_finished() => return PollResult::Pending,
        Some(_) => {}
    }

    let Some(mut handle) = task.take() else {
        return PollResult::NoTask;
    };
    match (&mut handle).now_or_never() {
        Some(result) => PollResult::Complete(result),
        None => {
            // Shouldn't happen since we checked is_finished()
            tracing::warn!("Task not ready despite is_finished()");
            *task = Some(handle);
            PollResult::Pending
        }
    }
}

/// Wait until the task, if any, has finished. The handle stays in place so
/// the regular poll picks up its result.
///
/// This is a polling wait that checks every 5 ms. It serves the CLI and
/// tests only; frame loops use `poll_task` instead.
pub async fn settle<T>(task: &Option<JoinHandle<T>>) {
    let Some(handle) = task else {
        return;
    };
    while !handle.is_finished() {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
}
