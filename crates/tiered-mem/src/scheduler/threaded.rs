use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::Engine;
use crate::migration::tick as migration_tick;
use crate::policy::drain_once;

/// The Threaded scheduler adapter (§4.8): two cooperative `std::thread`
/// workers with staggered sleeps, each polling a shared stop flag between
/// ticks. Preferred when predictable latency matters.
pub struct ThreadedScheduler {
    stop_flag: Arc<AtomicBool>,
    policy_thread: Option<JoinHandle<()>>,
    migration_thread: Option<JoinHandle<()>>,
}

impl ThreadedScheduler {
    pub fn start(engine: Arc<Engine>) -> Self {
        let stop_flag = Arc::new(AtomicBool::new(false));

        let policy_engine = Arc::clone(&engine);
        let policy_stop = Arc::clone(&stop_flag);
        let policy_interval = engine.config().policy_interval;
        let policy_thread = thread::spawn(move || {
            while !policy_stop.load(Ordering::Acquire) {
                drain_once(&policy_engine);
                thread::sleep(policy_interval);
            }
        });

        let migration_engine = Arc::clone(&engine);
        let migration_stop = Arc::clone(&stop_flag);
        let migration_interval = engine.config().migration_interval;
        let migration_thread = thread::spawn(move || {
            while !migration_stop.load(Ordering::Acquire) {
                migration_tick(&migration_engine);
                thread::sleep(migration_interval);
            }
        });

        Self {
            stop_flag,
            policy_thread: Some(policy_thread),
            migration_thread: Some(migration_thread),
        }
    }

    /// Signals both workers to stop and joins them; blocks until both have
    /// actually returned (§4.8 state machine: `Stopping -> Stopped`).
    pub fn stop(mut self) {
        self.stop_flag.store(true, Ordering::Release);
        if let Some(handle) = self.policy_thread.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.migration_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ThreadedScheduler {
    fn drop(&mut self) {
        // Best-effort: if the caller dropped the handle without calling
        // `stop`, at least ask the workers to wind down rather than
        // leaking two threads that poll forever.
        self.stop_flag.store(true, Ordering::Release);
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

    #[test]
    fn cooperative_shutdown_joins_both_workers() {
        let config = Config {
            scheduler: SchedulerKind::Threaded,
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

        let scheduler = ThreadedScheduler::start(Arc::clone(&engine));
        thread::sleep(Duration::from_millis(20));
        scheduler.stop();
    }
}
