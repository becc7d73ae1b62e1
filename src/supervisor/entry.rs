//! Per-worker bookkeeping record owned exclusively by one supervisor.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::execution::{ExecutionHandle, ExitReason};
use super::runnable::Runnable;
use crate::util::WorkerId;

/// Per-child restart policy: governs whether a given termination of this
/// worker qualifies it for restart (§3, §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartType {
    /// Restart on both normal and abnormal exit.
    Permanent,
    /// Never restart.
    Temporary,
    /// Restart only on abnormal exit.
    Transient,
}

impl Default for RestartType {
    fn default() -> Self {
        Self::Permanent
    }
}

/// Whether a registered worker is an ordinary worker or itself a nested
/// supervisor. Auto-detected at `add_worker` time via a downcast check
/// (§4.1, §9 "Supervisor-inside-supervisor"); never required from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerKind {
    /// An ordinary supervised worker.
    Worker,
    /// A nested [`crate::Supervisor`].
    Supervisor,
}

impl Default for WorkerKind {
    fn default() -> Self {
        Self::Worker
    }
}

/// One entry in a supervisor's worker list.
///
/// Exclusively owned by the supervisor that created it for its entire
/// lifetime; the supervisor never exposes the entry itself, only its
/// [`WorkerId`] (§3 "Ownership").
pub struct WorkerEntry {
    id: WorkerId,
    worker: Arc<dyn Runnable>,
    restart_type: RestartType,
    kind: WorkerKind,
    execution: Option<ExecutionHandle>,
    start_count: u32,
}

impl WorkerEntry {
    /// Creates a new, not-yet-started entry.
    pub fn new(worker: Arc<dyn Runnable>, restart_type: RestartType, kind: WorkerKind) -> Self {
        Self {
            id: WorkerId::new(),
            worker,
            restart_type,
            kind,
            execution: None,
            start_count: 0,
        }
    }

    /// The opaque id returned to callers at add time.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Reference to the supervised worker.
    pub fn worker(&self) -> &Arc<dyn Runnable> {
        &self.worker
    }

    /// This worker's configured restart type.
    pub fn restart_type(&self) -> RestartType {
        self.restart_type
    }

    /// Whether this entry is a plain worker or a nested supervisor.
    pub fn kind(&self) -> WorkerKind {
        self.kind
    }

    /// Total number of times `start()` has been invoked on this worker by
    /// this supervisor.
    pub fn start_count(&self) -> u32 {
        self.start_count
    }

    /// Whether the current execution (if any) is still alive.
    pub fn is_alive(&self) -> bool {
        self.execution.as_ref().is_some_and(ExecutionHandle::alive)
    }

    /// The exit reason of the most recently completed execution.
    pub fn last_exit_reason(&self) -> ExitReason {
        self.execution
            .as_ref()
            .map(ExecutionHandle::exit_reason)
            .unwrap_or_default()
    }

    /// Spawns a fresh execution of `worker.start()`, replacing any previous
    /// (necessarily dead) execution, and increments `start_count`.
    pub fn spawn_execution(&mut self) {
        self.execution = Some(ExecutionHandle::spawn(Arc::clone(&self.worker)));
        self.start_count += 1;
    }

    /// Aborts and drops the current execution handle, if any.
    pub fn cancel_execution(&mut self) {
        if let Some(execution) = self.execution.take() {
            execution.cancel();
        }
    }
}

impl std::fmt::Debug for WorkerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerEntry")
            .field("id", &self.id)
            .field("restart_type", &self.restart_type)
            .field("kind", &self.kind)
            .field("start_count", &self.start_count)
            .field("alive", &self.is_alive())
            .finish()
    }
}
