use std::sync::atomic::{AtomicU64, Ordering};

/// Engine-wide health counters (§3 "EngineMetrics"). Ambient — never
/// consulted for control-flow decisions, only for test assertions and
/// operator observability. All fields use `Ordering::Relaxed`, matching
/// `tiered_ring::Metrics`: these are statistical counters with no
/// happens-before relationship to guard.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Samples dropped because their (cpu, event) ring was full.
    samples_dropped: AtomicU64,
    /// `Outcome::Rejected` results from an I-Heap insert.
    heap_rejections: AtomicU64,
    /// Pages promoted PMEM -> DRAM.
    migrations_promoted: AtomicU64,
    /// Pages demoted DRAM -> PMEM.
    migrations_demoted: AtomicU64,
    /// Isolated-candidate migrations that the migration primitive reported
    /// as failed.
    migrations_failed: AtomicU64,
    /// Candidates that failed `LruControl::try_isolate`.
    isolation_failures: AtomicU64,
    /// Migration ticks that returned `Again` (target tier at/below `Low`).
    again_ticks: AtomicU64,
}

impl EngineMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc_samples_dropped(&self) {
        self.samples_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_heap_rejections(&self) {
        self.heap_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_promoted(&self, n: u64) {
        self.migrations_promoted.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn add_demoted(&self, n: u64) {
        self.migrations_demoted.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn add_migrations_failed(&self, n: u64) {
        self.migrations_failed.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn add_isolation_failures(&self, n: u64) {
        self.isolation_failures.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn inc_again_ticks(&self) {
        self.again_ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn samples_dropped(&self) -> u64 {
        self.samples_dropped.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn heap_rejections(&self) -> u64 {
        self.heap_rejections.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn migrations_promoted(&self) -> u64 {
        self.migrations_promoted.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn migrations_demoted(&self) -> u64 {
        self.migrations_demoted.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn migrations_failed(&self) -> u64 {
        self.migrations_failed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn isolation_failures(&self) -> u64 {
        self.isolation_failures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn again_ticks(&self) -> u64 {
        self.again_ticks.load(Ordering::Relaxed)
    }
}
