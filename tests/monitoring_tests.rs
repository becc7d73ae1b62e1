//! Integration tests for the observability collaborator (SPEC_FULL.md §2
//! component G, §9 ambient "Logging texture"): an `InMemoryMonitor`
//! attached to a `Supervisor` records one `SupervisionEvent` per lifecycle
//! transition, while a `NoopMonitor` changes no observable restart
//! behavior (testable property 14).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use oversight::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, SupervisionEvent, SupervisionEventKind};
use oversight::{RunnableError, Runnable, Strategy, Supervisor, SupervisorConfig};

struct FailsOnce {
    starts: AtomicU32,
}

impl FailsOnce {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            starts: AtomicU32::new(0),
        })
    }

    fn starts(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Runnable for FailsOnce {
    async fn start(&self) -> Result<(), RunnableError> {
        let attempt = self.starts.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            return Err("simulated fault".into());
        }
        sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), RunnableError> {
        Ok(())
    }

    async fn alive(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn fast_config() -> SupervisorConfig {
    SupervisorConfig::builder()
        .with_strategy(Strategy::OneForOne)
        .with_monitor_interval(Duration::from_millis(15))
        .with_max_restarts(100)
        .with_window(Duration::from_secs(60))
        .build()
        .expect("valid config")
}

#[tokio::test]
async fn in_memory_monitor_records_failure_and_restart_events() {
    let monitor = InMemoryMonitor::<SupervisionEvent>::new(MonitoringConfig::default());
    let supervisor = Supervisor::new(fast_config(), monitor.clone());

    let worker = FailsOnce::new();
    supervisor.add_worker(Arc::clone(&worker) as Arc<dyn Runnable>, None, None).await;
    supervisor.start_async().await.expect("start should succeed");
    sleep(Duration::from_millis(90)).await;
    supervisor.stop().await.expect("stop should succeed");

    let snapshot = monitor.snapshot().await.expect("snapshot should succeed");
    assert!(snapshot.total_events > 0);

    let saw_failure = snapshot
        .recent_events
        .iter()
        .any(|e| matches!(e.event_kind, SupervisionEventKind::WorkerFailed { .. }));
    let saw_restart = snapshot
        .recent_events
        .iter()
        .any(|e| matches!(e.event_kind, SupervisionEventKind::WorkerRestarted { .. }));
    assert!(saw_failure, "a WorkerFailed event should have been recorded");
    assert!(saw_restart, "a WorkerRestarted event should have been recorded");
}

#[tokio::test]
async fn noop_monitor_does_not_change_restart_decisions() {
    let supervisor = Supervisor::with_config(fast_config());
    let worker = FailsOnce::new();
    supervisor.add_worker(Arc::clone(&worker) as Arc<dyn Runnable>, None, None).await;
    supervisor.start_async().await.expect("start should succeed");
    sleep(Duration::from_millis(90)).await;
    supervisor.stop().await.expect("stop should succeed");

    assert!(worker.starts() >= 2, "restart still happens without an observing monitor");
}
