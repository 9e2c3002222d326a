mod base;
mod transition;

pub use base::ReplayMemory;
pub use transition::Transition;

use crate::env::Environment;

/// Contract for a bounded store of past transitions sampled in minibatches
///
/// Eviction policy and sampling distribution are the implementor's business;
/// the trainer only relies on `sample_batch` returning exactly `batch_size`
/// transitions in unspecified order, or `None` when the store is under-full.
pub trait ReplayStore<E: Environment> {
    /// Record a transition
    fn push(&mut self, transition: Transition<E>);

    /// Draw a batch of `batch_size` transitions
    ///
    /// ### Returns
    /// - `Some(batch)` if `batch_size` is less than or equal to the occupancy
    /// - `None` otherwise
    fn sample_batch(&self, batch_size: usize) -> Option<Vec<Transition<E>>>;

    /// Current occupancy
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
