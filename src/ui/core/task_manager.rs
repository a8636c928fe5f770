use std::future::Future;

use tokio::task::JoinHandle;

/// Generation number of a scheduled transition.
pub type TransitionId = u64;

/// The single pending show/hide timer of a module.
///
/// Scheduling a new transition aborts the previous one, so only the most
/// recent transition ever completes. The generation number lets the
/// completing task confirm it is still the current one.
#[derive(Debug, Default)]
pub struct TransitionSlot {
    handle: Option<JoinHandle<()>>,
    generation: TransitionId,
}

impl TransitionSlot {
    /// Abort any pending transition and reserve a new generation.
    pub fn begin(&mut self) -> TransitionId {
        self.cancel();
        self.generation += 1;
        self.generation
    }

    /// Spawn the task for the generation returned by [`begin`](Self::begin).
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn attach<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle = Some(tokio::spawn(task));
    }

    /// Drop the pending task, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    pub fn is_current(&self, generation: TransitionId) -> bool {
        self.generation == generation
    }

    /// Mark `generation` as completed. Fails when a newer transition has
    /// replaced it.
    pub fn finish(&mut self, generation: TransitionId) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.handle = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TransitionSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
