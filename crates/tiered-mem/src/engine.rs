use std::sync::{Arc, Mutex};

use tiered_ring::Channel;
use tiered_sketch::Sketch;

use crate::candidates::CandidateHeaps;
use crate::collaborators::{LruControl, MigrationPrimitive, NoopProcessTracker, ProcessTracker};
use crate::config::Config;
use crate::error::EngineError;
use crate::ingestion::SampleIngest;
use crate::metrics::EngineMetrics;
use crate::sample::Sample;
use crate::tier::TierTopology;

/// The three shared counters of §3: monotonically non-decreasing, merged
/// from each policy drain pass's local accumulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub total_samples: u64,
    pub dram_samples: u64,
    pub pmem_samples: u64,
}

impl Counters {
    /// `dram_samples * 100 / max(1, total_samples)` (§4.6 step 1).
    #[must_use]
    pub fn dram_hit_percentile(&self) -> u64 {
        self.dram_samples * 100 / self.total_samples.max(1)
    }
}

/// The state the engine's single mutex protects as one logical unit (§4.7):
/// the SDS, both I-Heaps, and the counters.
pub(crate) struct Shared {
    pub sds: Sketch,
    pub heaps: CandidateHeaps,
    pub counters: Counters,
}

/// The control loop and owner of all mutable engine state (§4.7, §9).
///
/// Constructed once at startup from a [`Config`] and a set of collaborators
/// (§6), then handed to a scheduler adapter (§4.8) by `Arc`. `Engine` itself
/// holds no scheduling logic — it is the shared state the policy and
/// migration workers operate on.
pub struct Engine {
    config: Config,
    metrics: Arc<EngineMetrics>,
    shared: Mutex<Shared>,
    rings: Channel<Sample>,
    topology: Arc<dyn TierTopology>,
    migration: Arc<dyn MigrationPrimitive>,
    lru: Arc<dyn LruControl>,
    process_tracker: Arc<dyn ProcessTracker>,
}

impl Engine {
    /// Builds a new engine. `total_dram_pages`/`total_pmem_pages` size the
    /// SDS and the I-Heaps (§6 defaults); they are not re-derived from
    /// `topology` because [`TierTopology`] only exposes *free* pages, not
    /// the span of each tier.
    pub fn new(
        config: Config,
        total_dram_pages: u64,
        total_pmem_pages: u64,
        topology: Arc<dyn TierTopology>,
        migration: Arc<dyn MigrationPrimitive>,
        lru: Arc<dyn LruControl>,
    ) -> Result<Self, EngineError> {
        Self::with_process_tracker(
            config,
            total_dram_pages,
            total_pmem_pages,
            topology,
            migration,
            lru,
            Arc::new(NoopProcessTracker),
        )
    }

    /// As [`Self::new`], but with an explicit [`ProcessTracker`] for the
    /// "track the dominating process" variant (§6, §9).
    pub fn with_process_tracker(
        config: Config,
        total_dram_pages: u64,
        total_pmem_pages: u64,
        topology: Arc<dyn TierTopology>,
        migration: Arc<dyn MigrationPrimitive>,
        lru: Arc<dyn LruControl>,
        process_tracker: Arc<dyn ProcessTracker>,
    ) -> Result<Self, EngineError> {
        let total_pages = total_dram_pages + total_pmem_pages;
        let width = config.resolved_sds_width(total_pages);
        let sds = Sketch::new(width, config.sds_depth)?;

        let candidate_size = config.resolved_candidate_size(total_dram_pages);
        let heaps = CandidateHeaps::new(candidate_size)?;

        let ring_config =
            tiered_ring::Config::new(config.ring_bits, config.max_producers, false);
        let rings = Channel::new(ring_config);

        Ok(Self {
            config,
            metrics: Arc::new(EngineMetrics::new()),
            shared: Mutex::new(Shared {
                sds,
                heaps,
                counters: Counters::default(),
            }),
            rings,
            topology,
            migration,
            lru,
            process_tracker,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    #[must_use]
    pub fn process_tracker(&self) -> &Arc<dyn ProcessTracker> {
        &self.process_tracker
    }

    /// Registers a new (cpu, event) producer. Sample ingestion (§4.4) uses
    /// the returned handle to push samples into its dedicated ring.
    pub fn register_producer(&self) -> Result<SampleIngest, EngineError> {
        let producer = self.rings.register()?;
        Ok(SampleIngest::new(producer, Arc::clone(&self.metrics)))
    }

    /// A snapshot of the shared counters, taken under the mutex.
    #[must_use]
    pub fn counters(&self) -> Counters {
        self.shared.lock().expect("engine mutex poisoned").counters
    }

    /// The current size of the demotion heap (DRAM candidates).
    #[must_use]
    pub fn demotion_heap_len(&self) -> usize {
        self.shared.lock().expect("engine mutex poisoned").heaps.demotion.len()
    }

    /// The current size of the promotion heap (PMEM candidates).
    #[must_use]
    pub fn promotion_heap_len(&self) -> usize {
        self.shared.lock().expect("engine mutex poisoned").heaps.promotion.len()
    }

    pub(crate) fn shared(&self) -> &Mutex<Shared> {
        &self.shared
    }

    pub(crate) fn rings(&self) -> &Channel<Sample> {
        &self.rings
    }

    pub(crate) fn topology(&self) -> &Arc<dyn TierTopology> {
        &self.topology
    }

    pub(crate) fn migration_primitive(&self) -> &Arc<dyn MigrationPrimitive> {
        &self.migration
    }

    pub(crate) fn lru(&self) -> &Arc<dyn LruControl> {
        &self.lru
    }
}
