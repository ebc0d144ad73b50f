use std::sync::Arc;

use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::engine::Engine;
use crate::migration::tick as migration_tick;
use crate::policy::drain_once;

/// The Asynchronous scheduler adapter (§4.8): policy and migration run as
/// `tokio::task`s driven by `tokio::time::interval` ticks inside a
/// `tokio::select!` loop, mirroring the corpus's own async task-loop idiom
/// (`async_bridge`-style). Preferred when thread-count/CPU cost is the
/// bottleneck.
///
/// The sample-ingestion path may call [`AsyncScheduler::notify_policy`]
/// to wake the policy task early instead of waiting out its interval; the
/// policy task, at the end of each drain, notifies the migration task the
/// same way.
pub struct AsyncScheduler {
    policy_task: Option<JoinHandle<()>>,
    migration_task: Option<JoinHandle<()>>,
    policy_shutdown: Option<oneshot::Sender<()>>,
    migration_shutdown: Option<oneshot::Sender<()>>,
    policy_notify: Arc<Notify>,
}

impl AsyncScheduler {
    pub fn start(engine: Arc<Engine>) -> Self {
        let policy_notify = Arc::new(Notify::new());
        let migration_notify = Arc::new(Notify::new());

        let (policy_tx, mut policy_rx) = oneshot::channel();
        let (migration_tx, mut migration_rx) = oneshot::channel();

        let policy_engine = Arc::clone(&engine);
        let policy_interval = engine.config().policy_interval;
        let policy_wake = Arc::clone(&policy_notify);
        let migration_wake = Arc::clone(&migration_notify);
        let policy_task = tokio::spawn(async move {
            let mut ticker = interval(policy_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    () = policy_wake.notified() => {}
                    _ = &mut policy_rx => break,
                }
                drain_once(&policy_engine);
                migration_wake.notify_one();
            }
        });

        let migration_engine = Arc::clone(&engine);
        let migration_interval = engine.config().migration_interval;
        let migration_task = tokio::spawn(async move {
            let mut ticker = interval(migration_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    () = migration_notify.notified() => {}
                    _ = &mut migration_rx => break,
                }
                migration_tick(&migration_engine);
            }
        });

        Self {
            policy_task: Some(policy_task),
            migration_task: Some(migration_task),
            policy_shutdown: Some(policy_tx),
            migration_shutdown: Some(migration_tx),
            policy_notify,
        }
    }

    /// A handle the sample-ingestion path can notify to run the policy
    /// worker's next pass early (§4.4, §4.8) instead of waiting for its
    /// next interval tick.
    #[must_use]
    pub fn policy_notify(&self) -> Arc<Notify> {
        Arc::clone(&self.policy_notify)
    }

    /// Signals both tasks to stop and awaits them; returns once both have
    /// actually returned (§4.8 state machine: `Stopping -> Stopped`).
    pub async fn stop(mut self) {
        if let Some(tx) = self.policy_shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(tx) = self.migration_shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.policy_task.take() {
            let _ = handle.await;
        }
        if let Some(handle) = self.migration_task.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{LruControl, MigrationOutcome, MigrationPrimitive};
    use crate::config::{Config, SchedulerKind};
    use crate::tier::{Tier, TierTopology, WatermarkKind};
    use std::time::Duration;

    struct StubTopology;
    impl TierTopology for StubTopology {
        fn tier_of(&self, _pfn: u64) -> Tier {
            Tier::Dram
        }
        fn free_pages(&self, _tier: Tier) -> u64 {
            1_000_000
        }
        fn watermark(&self, _tier: Tier, _kind: WatermarkKind) -> u64 {
            1
        }
    }

    struct StubMigration;
    impl MigrationPrimitive for StubMigration {
        fn migrate_pages(&self, pfns: &[u64], _target: Tier) -> MigrationOutcome {
            MigrationOutcome {
                succeeded: pfns.len() as u32,
                failed: 0,
            }
        }
    }

    struct StubLru;
    impl LruControl for StubLru {
        fn try_isolate(&self, _pfn: u64) -> bool {
            true
        }
        fn putback(&self, _pfn: u64) {}
    }

    #[tokio::test]
    async fn cooperative_shutdown_joins_both_tasks() {
        let config = Config {
            scheduler: SchedulerKind::Async,
            policy_interval: Duration::from_millis(1),
            migration_interval: Duration::from_millis(1),
            sds_width: Some(256),
            candidate_size: Some(16),
            ..Config::default()
        };
        let engine = Arc::new(
            Engine::new(
                config,
                1 << 10,
                1 << 10,
                Arc::new(StubTopology),
                Arc::new(StubMigration),
                Arc::new(StubLru),
            )
            .unwrap(),
        );

        let scheduler = AsyncScheduler::start(Arc::clone(&engine));
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.stop().await;
    }
}
