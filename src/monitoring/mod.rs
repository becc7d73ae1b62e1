//! Observability for the supervisor core.
//!
//! This is the "optional logger" collaborator named in the supervisor
//! specification: supervisors accept a `Monitor<SupervisionEvent>` at
//! construction and record one event per lifecycle transition (worker
//! started, stopped, failed, restarted, restart-storm budget exhausted,
//! strategy applied). A supervisor given no monitor defaults to
//! [`NoopMonitor`], which compiles away to nothing.
//!
//! ## Event Types
//! - `SupervisionEvent`: worker lifecycle and restart-policy transitions
//!
//! ## Examples
//! ```rust
//! use oversight::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, SupervisionEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let monitor = InMemoryMonitor::new(MonitoringConfig::default());
//! let snapshot = monitor.snapshot().await?;
//! assert_eq!(snapshot.total_events, 0);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod traits;
pub mod types;

mod in_memory;
mod noop;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{MonitoringConfig, MonitoringSnapshot, SupervisionEvent, SupervisionEventKind};
