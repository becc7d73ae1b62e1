//! Supervision trees: worker registry, monitor loop, and restart strategies.
//!
//! [`Supervisor`] is the public façade (§2 component F). It owns an ordered
//! list of [`WorkerEntry`] records, a [`RestartLedger`] restart-storm
//! breaker, and a periodic monitor loop that detects terminated workers and
//! dispatches them to the configured [`Strategy`]. A `Supervisor` is itself
//! a [`Runnable`], so a supervisor may be registered as a worker of another
//! supervisor (§4.1, §9 "Supervisor-inside-supervisor").

// Layer 1: Standard library imports
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;

// Layer 3: Internal module imports
pub mod config;
pub mod entry;
pub mod error;
pub mod execution;
pub mod ledger;
pub mod runnable;

pub use config::{Strategy, SupervisorConfig, SupervisorConfigBuilder};
pub use entry::{RestartType, WorkerEntry, WorkerKind};
pub use error::SupervisorError;
pub use execution::{ExecutionHandle, ExitReason};
pub use ledger::RestartLedger;
pub use runnable::{Runnable, RunnableError};

use crate::monitoring::{Monitor, MonitoringError, NoopMonitor, SupervisionEvent, SupervisionEventKind};
use crate::util::WorkerId;

/// Type-erased monitor, so [`Supervisor`] can stay a concrete (non-generic)
/// struct: `Monitor<E>` requires `Clone`, which is not object-safe, so a
/// blanket-impl'd erasure trait is the boundary between the generic
/// constructor and the fixed-type struct the kind-auto-detection downcast
/// depends on.
#[async_trait]
trait ErasedMonitor: Send + Sync {
    async fn record(&self, event: SupervisionEvent) -> Result<(), MonitoringError>;
}

#[async_trait]
impl<M> ErasedMonitor for M
where
    M: Monitor<SupervisionEvent> + Send + Sync + 'static,
{
    async fn record(&self, event: SupervisionEvent) -> Result<(), MonitoringError> {
        Monitor::record(self, event).await
    }
}

struct SupervisorInner {
    id: WorkerId,
    config: SupervisorConfig,
    monitor: Arc<dyn ErasedMonitor>,
    workers: AsyncMutex<Vec<WorkerEntry>>,
    ledger: RestartLedger,
    running: AtomicBool,
    length: AtomicUsize,
    /// Coarse mutual-exclusion lock covering `add_worker`, `stop`, and
    /// restart-policy application (§4.5: "Step 3 must be executed under a
    /// lock that also excludes concurrent add_worker and stop"). Distinct
    /// from `workers`, which guards only data access and is never held
    /// across a `worker.start()`/`worker.stop()` call (§5 lock hygiene).
    restart_lock: AsyncMutex<()>,
    stop_notify: Notify,
    monitor_handle: AsyncMutex<Option<JoinHandle<()>>>,
}

/// Public façade owning a supervisor's worker list and lifecycle.
///
/// Cheaply `Clone`able (an `Arc` around the shared state), matching the
/// teacher crate's M-SERVICES-CLONE pattern for its monitors: the monitor
/// loop clones a `Supervisor` handle to run on its own task.
///
/// # Examples
///
/// ```rust
/// use oversight::{Supervisor, SupervisorConfig};
///
/// # async fn example() {
/// let supervisor = Supervisor::with_config(SupervisorConfig::default());
/// assert_eq!(supervisor.length(), 0);
/// assert!(!supervisor.running());
/// # }
/// ```
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<SupervisorInner>,
}

impl Supervisor {
    /// Creates a new, `STOPPED` supervisor with the given configuration and
    /// monitor collaborator.
    pub fn new<M>(config: SupervisorConfig, monitor: M) -> Self
    where
        M: Monitor<SupervisionEvent> + Send + Sync + 'static,
    {
        let ledger = RestartLedger::new(config.max_restarts, config.window);
        Self {
            inner: Arc::new(SupervisorInner {
                id: WorkerId::new(),
                config,
                monitor: Arc::new(monitor),
                workers: AsyncMutex::new(Vec::new()),
                ledger,
                running: AtomicBool::new(false),
                length: AtomicUsize::new(0),
                restart_lock: AsyncMutex::new(()),
                stop_notify: Notify::new(),
                monitor_handle: AsyncMutex::new(None),
            }),
        }
    }

    /// Creates a new, `STOPPED` supervisor with a [`NoopMonitor`] — the
    /// default when no logging collaborator is required.
    pub fn with_config(config: SupervisorConfig) -> Self {
        Self::new(config, NoopMonitor::<SupervisionEvent>::new())
    }

    /// Creates a supervisor preloaded with one worker (§3 "zero or one
    /// preloaded worker"), added with default restart type and
    /// auto-detected kind.
    pub async fn with_initial_worker<M>(
        config: SupervisorConfig,
        monitor: M,
        worker: Arc<dyn Runnable>,
    ) -> Self
    where
        M: Monitor<SupervisionEvent> + Send + Sync + 'static,
    {
        let supervisor = Self::new(config, monitor);
        supervisor.add_worker(worker, None, None).await;
        supervisor
    }

    /// This supervisor's own id (used as `supervisor_id` on every
    /// [`SupervisionEvent`] it records).
    pub fn id(&self) -> WorkerId {
        self.inner.id
    }

    /// Registers a worker, returning its id, or `None` if the worker was
    /// rejected (§4.2: rejected while `RUNNING`).
    ///
    /// Auto-detects [`WorkerKind::Supervisor`] when `kind` is omitted and
    /// the worker downcasts to [`Supervisor`] (§4.1, §9).
    pub async fn add_worker(
        &self,
        worker: Arc<dyn Runnable>,
        restart_type: Option<RestartType>,
        kind: Option<WorkerKind>,
    ) -> Option<WorkerId> {
        let _policy_guard = self.inner.restart_lock.lock().await;

        if self.inner.running.load(Ordering::SeqCst) {
            return None;
        }

        let detected_kind = kind.unwrap_or_else(|| {
            if worker.as_any().downcast_ref::<Supervisor>().is_some() {
                WorkerKind::Supervisor
            } else {
                WorkerKind::Worker
            }
        });

        let entry = WorkerEntry::new(worker, restart_type.unwrap_or_default(), detected_kind);
        let id = entry.id();
        self.inner.workers.lock().await.push(entry);
        self.inner.length.fetch_add(1, Ordering::SeqCst);
        Some(id)
    }

    /// Transitions `STOPPED → RUNNING`: starts every worker and the
    /// monitor loop, then blocks the caller until [`Supervisor::stop`] is
    /// invoked (by any task) (§4.3).
    pub async fn start(&self) -> Result<(), SupervisorError> {
        self.start_internal().await?;

        let notified = self.inner.stop_notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if !self.inner.running.load(Ordering::SeqCst) {
            return Ok(());
        }
        notified.await;
        Ok(())
    }

    /// Non-blocking variant of [`Supervisor::start`]: spawns the monitor
    /// and every worker, then returns immediately.
    pub async fn start_async(&self) -> Result<(), SupervisorError> {
        self.start_internal().await
    }

    async fn start_internal(&self) -> Result<(), SupervisorError> {
        let _policy_guard = self.inner.restart_lock.lock().await;

        if self.inner.running.swap(true, Ordering::SeqCst) {
            return Err(SupervisorError::AlreadyRunning);
        }

        let started_ids: Vec<WorkerId> = {
            let mut workers = self.inner.workers.lock().await;
            for entry in workers.iter_mut() {
                entry.spawn_execution();
            }
            workers.iter().map(WorkerEntry::id).collect()
        };

        let monitor = self.clone();
        let handle = tokio::spawn(async move { monitor.monitor_loop().await });
        *self.inner.monitor_handle.lock().await = Some(handle);

        drop(_policy_guard);
        for id in started_ids {
            self.record_event(Some(id), SupervisionEventKind::WorkerStarted).await;
        }

        Ok(())
    }

    /// Transitions `RUNNING → STOPPED`. Idempotent: a no-op if already
    /// `STOPPED` (§4.3, testable property 11).
    pub async fn stop(&self) -> Result<(), SupervisorError> {
        let _policy_guard = self.inner.restart_lock.lock().await;

        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(handle) = self.inner.monitor_handle.lock().await.take() {
            handle.abort();
        }

        let targets: Vec<Arc<dyn Runnable>> = {
            let mut workers = self.inner.workers.lock().await;
            let targets = workers
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| Arc::clone(e.worker()))
                .collect();
            for entry in workers.iter_mut() {
                entry.cancel_execution();
            }
            targets
        };

        drop(_policy_guard);

        for worker in targets {
            let _ = worker.stop().await;
        }

        self.inner.ledger.reset();
        self.inner.stop_notify.notify_waiters();
        Ok(())
    }

    /// Count of registered worker entries (§4.6).
    pub fn length(&self) -> usize {
        self.inner.length.load(Ordering::SeqCst)
    }

    /// Size of the restart ledger's non-purged sequence (§4.6).
    pub fn current_restart_count(&self) -> u32 {
        self.inner.ledger.current_restart_count()
    }

    /// Whether the supervisor is currently `RUNNING` (§4.6).
    pub fn running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    async fn monitor_loop(self) {
        let mut interval = tokio::time::interval_at(
            tokio::time::Instant::now() + self.inner.config.monitor_interval,
            self.inner.config.monitor_interval,
        );

        loop {
            tokio::select! {
                _ = self.inner.stop_notify.notified() => return,
                _ = interval.tick() => {}
            }

            if !self.running() {
                return;
            }

            let dead: Vec<(WorkerId, ExitReason)> = {
                let workers = self.inner.workers.lock().await;
                workers
                    .iter()
                    .filter(|e| e.start_count() > 0 && !e.is_alive())
                    .map(|e| (e.id(), e.last_exit_reason()))
                    .collect()
            };

            for (id, reason) in dead {
                match reason {
                    ExitReason::Abnormal => {
                        self.record_event(
                            Some(id),
                            SupervisionEventKind::WorkerFailed {
                                reason: "worker exited abnormally".to_string(),
                            },
                        )
                        .await;
                    }
                    ExitReason::Normal => {
                        self.record_event(Some(id), SupervisionEventKind::WorkerStopped).await;
                    }
                    ExitReason::None => {}
                }

                if let Err(err) = self.apply_restart_policy(id, reason).await {
                    eprintln!("restart policy error for worker {id}: {err}");
                }

                if !self.running() {
                    return;
                }
            }
        }
    }

    /// Applies the configured restart strategy to one terminated entry
    /// (§4.5).
    async fn apply_restart_policy(
        &self,
        dead_id: WorkerId,
        reason: ExitReason,
    ) -> Result<(), SupervisorError> {
        let _policy_guard = self.inner.restart_lock.lock().await;

        if !self.inner.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        let eligible = {
            let workers = self.inner.workers.lock().await;
            let Some(entry) = workers.iter().find(|e| e.id() == dead_id) else {
                return Ok(());
            };
            matches!(
                (entry.restart_type(), reason),
                (RestartType::Permanent, _) | (RestartType::Transient, ExitReason::Abnormal)
            )
        };

        if !eligible {
            return Ok(());
        }

        // Step 2: restart-storm circuit breaker. Appended on every call,
        // including this no-restart-needed case — see RestartLedger's docs.
        let exceeded = self.inner.ledger.exceeded();
        let strategy = self.inner.config.strategy;

        // Drop before any further call touches a worker: restart_one/all/rest
        // and stop() themselves call worker.start()/stop(), which can block
        // for arbitrary durations (§5 lock hygiene). Holding the guard this
        // far would stall every other restart_lock waiter, including a
        // concurrent stop().
        drop(_policy_guard);

        if exceeded {
            let restart_count = self.inner.ledger.current_restart_count();
            self.stop().await?;
            self.record_event(
                Some(dead_id),
                SupervisionEventKind::RestartLimitExceeded {
                    restart_count,
                    window: self.inner.ledger.window(),
                },
            )
            .await;
            return Err(SupervisorError::BudgetExhausted {
                worker_id: Some(dead_id),
                restart_count,
            });
        }

        match strategy {
            Strategy::OneForOne => self.restart_one(dead_id).await,
            Strategy::OneForAll => self.restart_all(dead_id).await,
            Strategy::RestForOne => self.restart_rest(dead_id).await,
        }
    }

    async fn restart_one(&self, id: WorkerId) -> Result<(), SupervisorError> {
        let worker = {
            let workers = self.inner.workers.lock().await;
            workers.iter().find(|e| e.id() == id).map(|e| Arc::clone(e.worker()))
        };
        if let Some(worker) = worker {
            let _ = worker.stop().await;
        }

        {
            let mut workers = self.inner.workers.lock().await;
            if let Some(entry) = workers.iter_mut().find(|e| e.id() == id) {
                entry.cancel_execution();
                entry.spawn_execution();
            }
        }

        let start_count = self.entry_start_count(id).await;
        self.record_event(Some(id), SupervisionEventKind::WorkerRestarted { start_count })
            .await;
        self.record_event(
            None,
            SupervisionEventKind::StrategyApplied {
                strategy: Strategy::OneForOne.name().to_string(),
                affected_count: 1,
            },
        )
        .await;
        Ok(())
    }

    async fn restart_all(&self, triggering_id: WorkerId) -> Result<(), SupervisorError> {
        let (all_ids, others_alive) = {
            let workers = self.inner.workers.lock().await;
            let all_ids: Vec<WorkerId> = workers.iter().map(WorkerEntry::id).collect();
            let others_alive: Vec<Arc<dyn Runnable>> = workers
                .iter()
                .filter(|e| e.id() != triggering_id && e.is_alive())
                .map(|e| Arc::clone(e.worker()))
                .collect();
            (all_ids, others_alive)
        };

        for worker in &others_alive {
            let _ = worker.stop().await;
        }
        for id in all_ids.iter().filter(|id| **id != triggering_id) {
            self.wait_until_dead(*id).await;
        }

        for id in &all_ids {
            {
                let mut workers = self.inner.workers.lock().await;
                if let Some(entry) = workers.iter_mut().find(|e| e.id() == *id) {
                    entry.cancel_execution();
                    entry.spawn_execution();
                }
            }
            let start_count = self.entry_start_count(*id).await;
            self.record_event(Some(*id), SupervisionEventKind::WorkerRestarted { start_count })
                .await;
        }

        self.record_event(
            None,
            SupervisionEventKind::StrategyApplied {
                strategy: Strategy::OneForAll.name().to_string(),
                affected_count: all_ids.len(),
            },
        )
        .await;
        Ok(())
    }

    async fn restart_rest(&self, triggering_id: WorkerId) -> Result<(), SupervisorError> {
        let (trailing_ids, after_ids) = {
            let workers = self.inner.workers.lock().await;
            let Some(trigger_index) = workers.iter().position(|e| e.id() == triggering_id) else {
                return Ok(());
            };
            let trailing: Vec<WorkerId> = workers[trigger_index..].iter().map(WorkerEntry::id).collect();
            let after: Vec<WorkerId> = workers[trigger_index + 1..]
                .iter()
                .map(WorkerEntry::id)
                .collect();
            (trailing, after)
        };

        let to_stop: Vec<Arc<dyn Runnable>> = {
            let workers = self.inner.workers.lock().await;
            workers
                .iter()
                .filter(|e| after_ids.contains(&e.id()) && e.is_alive())
                .map(|e| Arc::clone(e.worker()))
                .collect()
        };
        for worker in &to_stop {
            let _ = worker.stop().await;
        }
        for id in &after_ids {
            self.wait_until_dead(*id).await;
        }

        for id in &trailing_ids {
            {
                let mut workers = self.inner.workers.lock().await;
                if let Some(entry) = workers.iter_mut().find(|e| e.id() == *id) {
                    entry.cancel_execution();
                    entry.spawn_execution();
                }
            }
            let start_count = self.entry_start_count(*id).await;
            self.record_event(Some(*id), SupervisionEventKind::WorkerRestarted { start_count })
                .await;
        }

        self.record_event(
            None,
            SupervisionEventKind::StrategyApplied {
                strategy: Strategy::RestForOne.name().to_string(),
                affected_count: trailing_ids.len(),
            },
        )
        .await;
        Ok(())
    }

    async fn entry_start_count(&self, id: WorkerId) -> u32 {
        let workers = self.inner.workers.lock().await;
        workers
            .iter()
            .find(|e| e.id() == id)
            .map(WorkerEntry::start_count)
            .unwrap_or(0)
    }

    async fn wait_until_dead(&self, id: WorkerId) {
        loop {
            let alive = {
                let workers = self.inner.workers.lock().await;
                workers.iter().find(|e| e.id() == id).map(WorkerEntry::is_alive).unwrap_or(false)
            };
            if !alive {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    async fn record_event(&self, worker_id: Option<WorkerId>, kind: SupervisionEventKind) {
        let event = SupervisionEvent::new(self.inner.id, worker_id, kind);
        if let Err(err) = self.inner.monitor.record(event).await {
            eprintln!("failed to record supervision event: {err}");
        }
    }
}

#[async_trait]
impl Runnable for Supervisor {
    /// Blocks until [`Supervisor::stop`] is called from elsewhere,
    /// enabling hierarchical composition (§4.1).
    async fn start(&self) -> Result<(), RunnableError> {
        Supervisor::start(self).await.map_err(|e| Box::new(e) as RunnableError)
    }

    async fn stop(&self) -> Result<(), RunnableError> {
        Supervisor::stop(self).await.map_err(|e| Box::new(e) as RunnableError)
    }

    async fn alive(&self) -> bool {
        self.running()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
