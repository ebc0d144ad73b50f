use crate::candidates::{is_filtered, Direction};
use crate::engine::Engine;
use crate::tier::{Tier, WatermarkKind};

/// The result of one `do_migration` call (§4.6, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPass {
    /// The target tier was at or below its `Low` watermark; no pages were
    /// isolated this call.
    Again,
    /// The call ran; `succeeded`/`failed` are the primitive's counts.
    Ran { succeeded: u32, failed: u32 },
}

/// One migration-worker tick (§4.6, steps 1-3): gate on the DRAM hit
/// fraction, then run demotion (if DRAM is short of its promotion
/// watermark) and always run promotion.
pub fn tick(engine: &Engine) {
    let counters = engine.counters();
    let has = counters.dram_hit_percentile();
    if has >= engine.config().target_percentile || has == 0 {
        return;
    }

    if engine.topology().free_pages(Tier::Dram)
        < engine.topology().watermark(Tier::Dram, WatermarkKind::Promo)
    {
        do_migration(engine, Direction::Down);
    }
    do_migration(engine, Direction::Up);
}

/// Isolates up to `batch_size` candidates from the appropriate heap and
/// hands them to the migration primitive (§4.6).
///
/// The target tier is the one pages move *into*: PMEM for `Down`, DRAM for
/// `Up`. A pair popped off the heap's tail is *filtered* (skipped,
/// un-isolated) if it doesn't actually meet its direction's hotness
/// requirement — `pop_back` takes from the array tail, not the heap
/// extreme, so this filter is what gives the batch its correctness, not
/// the pop itself.
pub fn do_migration(engine: &Engine, dir: Direction) -> MigrationPass {
    let target_tier = match dir {
        Direction::Down => Tier::Pmem,
        Direction::Up => Tier::Dram,
    };

    if engine.topology().free_pages(target_tier)
        <= engine.topology().watermark(target_tier, WatermarkKind::Low)
    {
        engine.metrics().inc_again_ticks();
        return MigrationPass::Again;
    }

    let batch_size = engine.config().batch_size;
    let mut isolated = Vec::with_capacity(batch_size.min(4096));
    let mut isolation_failures = 0u64;

    {
        let _lru_guard = engine.lru().scoped_lru_disable();
        let mut shared = engine.shared().lock().expect("engine mutex poisoned");
        let heap = match dir {
            Direction::Down => &mut shared.heaps.demotion,
            Direction::Up => &mut shared.heaps.promotion,
        };

        for _ in 0..batch_size {
            let Some(pair) = heap.pop_back() else {
                break;
            };
            if is_filtered(pair, dir) {
                continue;
            }
            if engine.lru().try_isolate(pair.key) {
                isolated.push(pair.key);
            } else {
                isolation_failures += 1;
            }
        }
    }

    if isolation_failures > 0 {
        engine.metrics().add_isolation_failures(isolation_failures);
    }

    if isolated.is_empty() {
        return MigrationPass::Ran {
            succeeded: 0,
            failed: 0,
        };
    }

    let outcome = engine
        .migration_primitive()
        .migrate_pages(&isolated, target_tier);

    // The primitive reports only aggregate counts, so there is no way to
    // know *which* pfns among `isolated` failed; we putback the tail
    // `outcome.failed` of them, an arbitrary but deterministic choice.
    let failed = outcome.failed as usize;
    for &pfn in isolated.iter().rev().take(failed) {
        engine.lru().putback(pfn);
    }

    match dir {
        Direction::Down => engine.metrics().add_demoted(u64::from(outcome.succeeded)),
        Direction::Up => engine.metrics().add_promoted(u64::from(outcome.succeeded)),
    }
    if outcome.failed > 0 {
        engine.metrics().add_migrations_failed(u64::from(outcome.failed));
    }

    MigrationPass::Ran {
        succeeded: outcome.succeeded,
        failed: outcome.failed,
    }
}
