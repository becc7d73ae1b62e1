//! The supervisor-owned wrapper around a spawned worker's execution.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

// Layer 3: Internal module imports
use super::runnable::Runnable;

/// Whether a worker's most recent termination was voluntary or a fault.
///
/// Set by the execution wrapper when the spawned `start()` future resolves
/// (or panics), not by the worker itself — a worker cannot lie about its
/// own exit reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitReason {
    /// The worker has never been started.
    #[default]
    None,
    /// `start()` returned `Ok(())`.
    Normal,
    /// `start()` returned `Err(..)` or panicked.
    Abnormal,
}

/// Handle to one asynchronous execution of a worker's `start()` call.
///
/// The worker's `start()` future runs on its own tokio task. A second,
/// lightweight "watcher" task awaits that task and writes the resulting
/// [`ExitReason`] into a shared cell, following the execution-handle
/// abstraction named in the design notes ("a small abstraction with
/// alive(), cancel(), and a completion callback that records
/// NORMAL/ABNORMAL on the entry"). A watcher task is used, rather than
/// recording the reason inline in the worker task, because a panic inside
/// `worker.start()` unwinds that task before any code following the
/// `.await` could run; tokio instead surfaces the unwind as a `JoinError`
/// when the task is awaited, which is exactly what the watcher inspects.
#[derive(Debug)]
pub struct ExecutionHandle {
    worker_abort: AbortHandle,
    watcher_task: JoinHandle<()>,
    exit_reason: Arc<Mutex<ExitReason>>,
}

impl ExecutionHandle {
    /// Spawns `worker.start()` on its own tokio task.
    pub fn spawn(worker: Arc<dyn Runnable>) -> Self {
        let exit_reason = Arc::new(Mutex::new(ExitReason::None));
        let watcher_exit_reason = Arc::clone(&exit_reason);

        let worker_task = tokio::spawn(async move { worker.start().await });
        let worker_abort = worker_task.abort_handle();

        let watcher_task = tokio::spawn(async move {
            let reason = match worker_task.await {
                Ok(Ok(())) => ExitReason::Normal,
                Ok(Err(_)) => ExitReason::Abnormal,
                Err(_) => ExitReason::Abnormal,
            };
            *watcher_exit_reason.lock() = reason;
        });

        Self {
            worker_abort,
            watcher_task,
            exit_reason,
        }
    }

    /// Returns whether the execution is still running.
    pub fn alive(&self) -> bool {
        !self.watcher_task.is_finished()
    }

    /// Returns the exit reason recorded so far (`None` while still running).
    pub fn exit_reason(&self) -> ExitReason {
        *self.exit_reason.lock()
    }

    /// Aborts the worker's task unconditionally.
    pub fn cancel(&self) {
        self.worker_abort.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::any::Any;
    use tokio::time::{Duration, sleep};

    struct Sleeper;

    #[async_trait]
    impl Runnable for Sleeper {
        async fn start(&self) -> Result<(), crate::RunnableError> {
            sleep(Duration::from_millis(150)).await;
            Ok(())
        }

        async fn stop(&self) -> Result<(), crate::RunnableError> {
            Ok(())
        }

        async fn alive(&self) -> bool {
            true
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Faulty;

    #[async_trait]
    impl Runnable for Faulty {
        async fn start(&self) -> Result<(), crate::RunnableError> {
            Err("boom".into())
        }

        async fn stop(&self) -> Result<(), crate::RunnableError> {
            Ok(())
        }

        async fn alive(&self) -> bool {
            false
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Panicky;

    #[async_trait]
    impl Runnable for Panicky {
        #[allow(clippy::panic)]
        async fn start(&self) -> Result<(), crate::RunnableError> {
            panic!("worker panicked");
        }

        async fn stop(&self) -> Result<(), crate::RunnableError> {
            Ok(())
        }

        async fn alive(&self) -> bool {
            false
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[tokio::test]
    async fn alive_until_start_completes() {
        let handle = ExecutionHandle::spawn(Arc::new(Sleeper));
        assert!(handle.alive());
        sleep(Duration::from_millis(250)).await;
        assert!(!handle.alive());
        assert_eq!(handle.exit_reason(), ExitReason::Normal);
    }

    #[tokio::test]
    async fn error_return_is_abnormal() {
        let handle = ExecutionHandle::spawn(Arc::new(Faulty));
        sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.exit_reason(), ExitReason::Abnormal);
    }

    #[tokio::test]
    async fn panic_is_abnormal() {
        let handle = ExecutionHandle::spawn(Arc::new(Panicky));
        sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.exit_reason(), ExitReason::Abnormal);
    }

    #[tokio::test]
    async fn cancel_stops_reporting_alive() {
        let handle = ExecutionHandle::spawn(Arc::new(Sleeper));
        handle.cancel();
        sleep(Duration::from_millis(50)).await;
        assert!(!handle.alive());
    }
}
