mod threaded;

#[cfg(feature = "async")]
mod async_impl;

use std::sync::Arc;

pub use threaded::ThreadedScheduler;

#[cfg(feature = "async")]
pub use async_impl::AsyncScheduler;

use crate::config::SchedulerKind;
use crate::engine::Engine;

/// A running scheduler, dispatching to the adapter named by
/// [`crate::Config::scheduler`] at construction time (§4.8).
pub enum SchedulerHandle {
    Threaded(ThreadedScheduler),
    #[cfg(feature = "async")]
    Async(AsyncScheduler),
}

impl SchedulerHandle {
    /// Starts the adapter `engine.config().scheduler` selects.
    ///
    /// # Panics
    ///
    /// Panics if `engine.config().scheduler` is [`SchedulerKind::Async`] and
    /// this crate was built without the `async` feature.
    #[must_use]
    pub fn start(engine: Arc<Engine>) -> Self {
        match engine.config().scheduler {
            SchedulerKind::Threaded => Self::Threaded(ThreadedScheduler::start(engine)),
            #[cfg(feature = "async")]
            SchedulerKind::Async => Self::Async(AsyncScheduler::start(engine)),
            #[cfg(not(feature = "async"))]
            SchedulerKind::Async => {
                panic!("SchedulerKind::Async requires the `async` feature")
            }
        }
    }

    /// Stops whichever adapter is running, blocking (the `Threaded` case)
    /// or awaiting (the `Async` case) until both of its workers have
    /// returned.
    pub async fn stop(self) {
        match self {
            Self::Threaded(scheduler) => scheduler.stop(),
            #[cfg(feature = "async")]
            Self::Async(scheduler) => scheduler.stop().await,
        }
    }
}
