//! # oversight - Erlang/OTP-inspired supervision trees
//!
//! A minimal, general-purpose supervisor core: register any
//! [`Runnable`](supervisor::Runnable) worker, choose a restart strategy, and
//! let the supervisor detect terminations and apply the policy. Supervisors
//! nest — a `Supervisor` is itself a `Runnable`, so supervision trees of
//! arbitrary depth compose the same way OTP's do.
//!
//! # Quick Start
//!
//! ```rust
//! use oversight::{RestartType, Runnable, RunnableError, Supervisor, SupervisorConfig};
//! use async_trait::async_trait;
//! use std::any::Any;
//! use std::sync::Arc;
//!
//! struct Worker;
//!
//! #[async_trait]
//! impl Runnable for Worker {
//!     async fn start(&self) -> Result<(), RunnableError> {
//!         Ok(())
//!     }
//!     async fn stop(&self) -> Result<(), RunnableError> {
//!         Ok(())
//!     }
//!     async fn alive(&self) -> bool {
//!         false
//!     }
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let supervisor = Supervisor::with_config(SupervisorConfig::default());
//! supervisor
//!     .add_worker(Arc::new(Worker), Some(RestartType::Permanent), None)
//!     .await;
//! supervisor.start_async().await?;
//! supervisor.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`supervisor`] — the [`Supervisor`] façade, worker registry
//!   ([`supervisor::WorkerEntry`]), restart-storm breaker
//!   ([`supervisor::RestartLedger`]), execution wrapper
//!   ([`supervisor::ExecutionHandle`]), configuration, and error taxonomy.
//! - [`monitoring`] — the optional logging collaborator: [`Monitor`],
//!   [`SupervisionEvent`], and the [`NoopMonitor`]/[`InMemoryMonitor`]
//!   implementations.
//! - [`util`] — [`WorkerId`] and shared serde helpers.
//!
//! # Architecture Principles
//!
//! - **Trait objects at the worker boundary.** Workers are registered as
//!   `Arc<dyn Runnable>` rather than a generic type parameter: a supervisor
//!   holds a heterogeneous, runtime-composed collection of workers, which a
//!   monomorphized generic cannot express.
//! - **Lock hygiene.** The worker-list lock is never held across a
//!   `worker.start()`/`worker.stop()` call; restart-policy application uses
//!   a separate mutual-exclusion lock for the policy decision itself.
//! - **chrono `DateTime<Utc>` for all timestamps**, `thiserror` for the
//!   error taxonomy, `serde` for configuration — the ambient stack follows
//!   the conventions of the crate this one was adapted from.

pub mod monitoring;
pub mod prelude;
pub mod supervisor;
pub mod util;

pub use monitoring::{
    EventSeverity, InMemoryMonitor, Monitor, MonitoringConfig, MonitoringError, MonitoringEvent,
    MonitoringSnapshot, NoopMonitor, SupervisionEvent, SupervisionEventKind,
};
pub use supervisor::{
    ExecutionHandle, ExitReason, RestartLedger, RestartType, Runnable, RunnableError, Strategy,
    Supervisor, SupervisorConfig, SupervisorConfigBuilder, SupervisorError, WorkerEntry, WorkerKind,
};
pub use util::WorkerId;
