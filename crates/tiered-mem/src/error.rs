use thiserror::Error;
use tiered_heap::HeapError;
use tiered_ring::ChannelError;
use tiered_sketch::SketchError;

/// Init-time errors (§7 "Allocation failed" class). Never reachable on the
/// hot path — `Engine::new` is the only place these propagate.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sketch construction failed: {0}")]
    Sketch(#[from] SketchError),

    #[error("heap construction failed: {0}")]
    Heap(#[from] HeapError),

    #[error("sample ring registry failed: {0}")]
    Channel(#[from] ChannelError),
}
