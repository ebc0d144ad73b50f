use tiered_heap::{Outcome, Pair};

use crate::engine::Engine;
use crate::tier::Tier;

/// One drain pass of the policy worker (§4.5): pops every (cpu, event)
/// ring to empty, updates the SDS and the appropriate I-Heap per sample,
/// and merges the pass's local counter accumulation into the shared
/// counters — all under the engine's single mutex, since the SDS, both
/// I-Heaps, and the counters are one logical unit (§4.7).
///
/// Returns the number of ring records observed (including unresolved
/// samples skipped for `phys_addr == 0`).
pub fn drain_once(engine: &Engine) -> usize {
    let mut local_total = 0u64;
    let mut local_dram = 0u64;
    let mut local_pmem = 0u64;
    let mut processed = 0usize;

    {
        let mut shared = engine.shared().lock().expect("engine mutex poisoned");

        engine.rings().consume_all(|sample| {
            processed += 1;
            local_total += 1;

            if !sample.is_resolved() {
                return;
            }

            let pfn = sample.pfn();
            let tier = engine.topology().tier_of(pfn);
            match tier {
                Tier::Dram => local_dram += 1,
                Tier::Pmem => local_pmem += 1,
            }

            let count = shared.sds.push(pfn);
            let pair = Pair::new(pfn, u64::from(count));

            let heap = match tier {
                Tier::Dram => &mut shared.heaps.demotion,
                Tier::Pmem => &mut shared.heaps.promotion,
            };

            if matches!(heap.insert(pair), Outcome::Rejected) {
                engine.metrics().inc_heap_rejections();
            }
        });

        shared.counters.total_samples += local_total;
        shared.counters.dram_samples += local_dram;
        shared.counters.pmem_samples += local_pmem;
    }

    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{LruControl, MigrationOutcome, MigrationPrimitive};
    use crate::config::Config;
    use crate::sample::Sample;
    use crate::tier::{Tier, TierTopology, WatermarkKind};
    use std::sync::Arc;

    struct SplitTopology;
    impl TierTopology for SplitTopology {
        fn tier_of(&self, pfn: u64) -> Tier {
            if pfn < 1 << 20 {
                Tier::Dram
            } else {
                Tier::Pmem
            }
        }
        fn free_pages(&self, _tier: Tier) -> u64 {
            u64::MAX
        }
        fn watermark(&self, _tier: Tier, _kind: WatermarkKind) -> u64 {
            0
        }
    }

    struct NullMigration;
    impl MigrationPrimitive for NullMigration {
        fn migrate_pages(&self, pfns: &[u64], _target: Tier) -> MigrationOutcome {
            MigrationOutcome {
                succeeded: pfns.len() as u32,
                failed: 0,
            }
        }
    }

    struct AlwaysIsolate;
    impl LruControl for AlwaysIsolate {
        fn try_isolate(&self, _pfn: u64) -> bool {
            true
        }
        fn putback(&self, _pfn: u64) {}
    }

    fn fresh_engine(candidate_size: usize) -> Engine {
        let config = Config {
            candidate_size: Some(candidate_size),
            sds_width: Some(1024),
            ..Config::default()
        };
        Engine::new(
            config,
            1 << 20,
            1 << 20,
            Arc::new(SplitTopology),
            Arc::new(NullMigration),
            Arc::new(AlwaysIsolate),
        )
        .unwrap()
    }

    #[test]
    fn all_dram_samples_fill_only_the_demotion_heap() {
        let engine = fresh_engine(64);
        let ingest = engine.register_producer().unwrap();

        for pfn in 0..100u64 {
            ingest.deliver(Sample::new(1, 1, 0, 0, 1, pfn << crate::sample::PAGE_SHIFT));
        }

        let processed = drain_once(&engine);
        assert_eq!(processed, 100);

        let counters = engine.counters();
        assert_eq!(counters.total_samples, 100);
        assert_eq!(counters.dram_samples, 100);
        assert_eq!(counters.pmem_samples, 0);
        assert!(engine.promotion_heap_len() == 0);
        assert!(engine.demotion_heap_len() > 0);
    }

    #[test]
    fn unresolved_samples_count_toward_total_only() {
        let engine = fresh_engine(64);
        let ingest = engine.register_producer().unwrap();

        ingest.deliver(Sample::new(1, 1, 0, 0, 1, 0));
        ingest.deliver(Sample::new(1, 1, 0, 0, 1, 1 << crate::sample::PAGE_SHIFT));

        drain_once(&engine);
        let counters = engine.counters();
        assert_eq!(counters.total_samples, 2);
        assert_eq!(counters.dram_samples, 1);
    }
}
