use std::time::Duration;

/// Which scheduler adapter (§4.8) drives the policy and migration workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerKind {
    /// Two OS threads, staggered sleeps, polling a stop flag.
    Threaded,
    /// Two tokio tasks on `tokio::time::interval` ticks, woken early by the
    /// sample-ingestion path via `Notify`.
    #[default]
    Async,
}

/// Tunables for the engine (§6). `Default` matches the defaults table.
#[derive(Debug, Clone)]
pub struct Config {
    /// SDS columns (W). `None` derives `floor(0.07% * total_pages)` from
    /// `total_spanned_pages` at `Engine::new` time.
    pub sds_width: Option<u32>,
    /// SDS rows (D).
    pub sds_depth: u32,
    /// I-Heap capacity for both the demotion and promotion heaps. `None`
    /// derives `dram_spanned_pages / 10` at `Engine::new` time.
    pub candidate_size: Option<usize>,
    /// Desired DRAM hit fraction, expressed as a percentage (0-100).
    pub target_percentile: u64,
    /// Pages migrated per `do_migration` call.
    pub batch_size: usize,
    /// Hardware sampler decimation; collaborator-facing only, not consumed
    /// by the engine itself.
    pub sample_period: u32,
    /// Minimum latency for a read sample to fire; collaborator-facing
    /// only.
    pub load_latency_threshold: u32,
    /// Which scheduler adapter to run.
    pub scheduler: SchedulerKind,
    /// Policy worker tick period.
    pub policy_interval: Duration,
    /// Migration worker tick period.
    pub migration_interval: Duration,
    /// Capacity, in per-(cpu,event) sample records, of each SPSC ring.
    pub ring_bits: u8,
    /// Maximum number of (cpu, event) producers registered with the
    /// engine's ring registry.
    pub max_producers: usize,
}

impl Config {
    /// Resolves `sds_width` against a total page count, honoring an
    /// explicit override if one was set.
    #[must_use]
    pub fn resolved_sds_width(&self, total_spanned_pages: u64) -> u32 {
        self.sds_width.unwrap_or_else(|| {
            let derived = (total_spanned_pages as f64 * 0.0007) as u64;
            derived.max(1).min(u64::from(u32::MAX)) as u32
        })
    }

    /// Resolves `candidate_size` against a DRAM page count, honoring an
    /// explicit override if one was set.
    #[must_use]
    pub fn resolved_candidate_size(&self, dram_spanned_pages: u64) -> usize {
        self.candidate_size
            .unwrap_or_else(|| ((dram_spanned_pages / 10).max(1)) as usize)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sds_width: None,
            sds_depth: 4,
            candidate_size: None,
            target_percentile: 95,
            batch_size: 4096,
            sample_period: 17,
            load_latency_threshold: 64,
            scheduler: SchedulerKind::default(),
            policy_interval: Duration::from_millis(10),
            migration_interval: Duration::from_millis(100),
            ring_bits: 12,
            max_producers: 16,
        }
    }
}
