//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use oversight::prelude::*;
//! ```

pub use crate::monitoring::{
    EventSeverity, InMemoryMonitor, Monitor, MonitoringConfig, MonitoringEvent, NoopMonitor,
    SupervisionEvent, SupervisionEventKind,
};
pub use crate::supervisor::{
    RestartType, Runnable, RunnableError, Strategy, Supervisor, SupervisorConfig, SupervisorError,
    WorkerKind,
};
pub use crate::util::WorkerId;
