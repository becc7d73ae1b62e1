//! Monitoring event types and configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::WorkerId;

/// Configuration for monitoring behavior.
///
/// Controls how events are recorded, filtered, and stored in the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled
    pub enabled: bool,

    /// Maximum number of events to keep in history
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered)
    pub severity_filter: EventSeverity,

    /// Interval for snapshot generation (if using background snapshots)
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
///
/// Provides queryable access to monitoring counters and recent event history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    /// Timestamp when snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded
    pub total_events: u64,

    /// Number of trace-level events
    pub trace_count: u64,

    /// Number of debug-level events
    pub debug_count: u64,

    /// Number of info-level events
    pub info_count: u64,

    /// Number of warning-level events
    pub warning_count: u64,

    /// Number of error-level events
    pub error_count: u64,

    /// Number of critical-level events
    pub critical_count: u64,

    /// Recent events (up to max_history_size)
    pub recent_events: Vec<E>,
}

// ============================================================================
// Supervision Events
// ============================================================================

/// An event describing one worker lifecycle or restart-policy transition.
///
/// This is the sole event type a [`crate::Supervisor`] records through its
/// `Monitor<SupervisionEvent>` collaborator: one event per start, stop,
/// failure, restart, strategy application, or restart-budget exhaustion.
#[derive(Debug, Clone, Serialize)]
pub struct SupervisionEvent {
    /// Timestamp when the event occurred (`chrono::DateTime<Utc>`)
    pub timestamp: DateTime<Utc>,

    /// Id of the supervisor that observed this transition
    pub supervisor_id: WorkerId,

    /// Id of the worker involved, if the event concerns a specific worker
    pub worker_id: Option<WorkerId>,

    /// Specific supervision event type
    pub event_kind: SupervisionEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl SupervisionEvent {
    /// Builds an event stamped with the current time and empty metadata.
    pub fn new(
        supervisor_id: WorkerId,
        worker_id: Option<WorkerId>,
        event_kind: SupervisionEventKind,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            supervisor_id,
            worker_id,
            event_kind,
            metadata: HashMap::new(),
        }
    }

    /// Attaches a metadata key/value pair, returning the event for chaining.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl MonitoringEvent for SupervisionEvent {
    const EVENT_TYPE: &'static str = "supervision";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SupervisionEventKind::WorkerStarted => EventSeverity::Info,
            SupervisionEventKind::WorkerStopped => EventSeverity::Info,
            SupervisionEventKind::WorkerFailed { .. } => EventSeverity::Error,
            SupervisionEventKind::WorkerRestarted { .. } => EventSeverity::Warning,
            SupervisionEventKind::RestartLimitExceeded { .. } => EventSeverity::Critical,
            SupervisionEventKind::StrategyApplied { .. } => EventSeverity::Info,
        }
    }
}

/// Specific types of supervision events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SupervisionEventKind {
    /// Worker successfully started
    WorkerStarted,

    /// Worker gracefully stopped
    WorkerStopped,

    /// Worker exited abnormally
    WorkerFailed {
        /// Error message describing the abnormal exit
        reason: String,
    },

    /// Worker was restarted after an abnormal exit
    WorkerRestarted {
        /// Total number of times this worker has been started
        start_count: u32,
    },

    /// Restart-storm budget exhausted; the supervisor is giving up
    RestartLimitExceeded {
        /// Number of restarts recorded within the window
        restart_count: u32,
        /// Width of the sliding restart window
        #[serde(with = "crate::util::duration_serde")]
        window: Duration,
    },

    /// A restart strategy was applied across the worker list
    StrategyApplied {
        /// Name of the strategy (OneForOne, OneForAll, RestForOne)
        strategy: String,
        /// Number of workers affected by this application
        affected_count: usize,
    },
}
