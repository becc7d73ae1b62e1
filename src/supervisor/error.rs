//! Error types for supervisor operations (§7).

// Layer 1: Standard library imports
use std::error::Error as StdError;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::WorkerId;

/// Errors raised synchronously by supervisor operations.
///
/// Not every failure mode in §7's taxonomy surfaces as a `SupervisorError`:
/// worker rejection returns a null id rather than an error, and worker
/// faults are captured by the execution wrapper and routed to the restart
/// policy instead of propagating to the caller. This enum covers the cases
/// that do raise synchronously: invalid construction/add arguments,
/// lifecycle violations, and the fatal conditions a caller may want to
/// branch on (`is_fatal`/`is_retryable`), following the teacher crate's
/// canonical error-struct style.
///
/// # Examples
///
/// ```rust
/// use oversight::SupervisorError;
///
/// fn check(err: &SupervisorError) {
///     if err.is_fatal() {
///         println!("fatal — escalate");
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Bad enum value or out-of-range numeric at construction or add time.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Out-of-range configuration, or an unrecognized strategy identifier.
    #[error("invalid supervisor configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// `start()` called while already RUNNING.
    #[error("supervisor is already running")]
    AlreadyRunning,

    /// An internal invariant was violated inside the monitor loop. Fatal.
    #[error("monitor fault: {reason}")]
    MonitorFault { reason: String },

    /// The restart-storm budget was exhausted; the supervisor stopped
    /// itself (§7 "Budget exhaustion").
    #[error("restart budget exhausted: {restart_count} restarts observed for worker {worker_id:?}")]
    BudgetExhausted {
        worker_id: Option<WorkerId>,
        restart_count: u32,
    },

    /// A collaborator (e.g. the monitor) reported a fault of its own.
    #[error("monitoring error: {source}")]
    Monitoring {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl SupervisorError {
    /// Returns `true` for errors that represent an unrecoverable condition
    /// for this supervisor instance.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SupervisorError::MonitorFault { .. }
                | SupervisorError::BudgetExhausted { .. }
                | SupervisorError::InvalidConfiguration { .. }
        )
    }

    /// Returns `true` for errors a caller might reasonably retry after
    /// correcting the input or waiting for transient state to clear.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SupervisorError::AlreadyRunning { .. } | SupervisorError::Monitoring { .. }
        )
    }

    /// Returns `true` for argument-validation failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            SupervisorError::InvalidArgument { .. } | SupervisorError::InvalidConfiguration { .. }
        )
    }
}
