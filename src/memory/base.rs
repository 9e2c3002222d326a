use rand::{seq::SliceRandom, thread_rng};

use crate::{ds::RingBuffer, env::Environment};

use super::{ReplayStore, Transition};

/// A fixed-capacity replay store with uniform random sampling
///
/// Transitions live in a ring buffer, so the oldest ones are overwritten once
/// the store reaches capacity. Batches are drawn uniformly without
/// replacement.
///
/// ### Type Parameters
/// - `E`: Environment
pub struct ReplayMemory<E: Environment> {
    memory: RingBuffer<Transition<E>>,
}

impl<E: Environment> ReplayMemory<E> {
    pub fn new(capacity: usize) -> Self {
        Self {
            memory: RingBuffer::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }
}

impl<E: Environment> ReplayStore<E> for ReplayMemory<E> {
    fn push(&mut self, transition: Transition<E>) {
        self.memory.push(transition);
    }

    fn sample_batch(&self, batch_size: usize) -> Option<Vec<Transition<E>>> {
        if batch_size <= self.memory.len() {
            Some(
                self.memory
                    .view()
                    .choose_multiple(&mut thread_rng(), batch_size)
                    .cloned()
                    .collect(),
            )
        } else {
            None
        }
    }

    fn len(&self) -> usize {
        self.memory.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::tests::MockEnv;

    use super::*;

    const MEMORY_CAP: usize = 4;
    const BATCH_SIZE: usize = 2;

    fn create_mock_transitions() -> Vec<Transition<MockEnv>> {
        (0..4)
            .map(|i| Transition {
                state: [i as f32, 0.0],
                action: i,
                next_state: [i as f32 + 1.0, 0.0],
                reward: 1.0,
                done: i == 3,
            })
            .collect()
    }

    #[test]
    fn replay_memory_functional() {
        let transitions = create_mock_transitions();
        let mut memory = ReplayMemory::<MockEnv>::new(MEMORY_CAP);

        assert!(
            memory.sample_batch(BATCH_SIZE).is_none(),
            "sample_batch none when too few transitions"
        );

        for transition in transitions {
            memory.push(transition);
        }

        assert_eq!(memory.len(), 4);
        assert!(
            memory
                .sample_batch(BATCH_SIZE)
                .is_some_and(|b| b.len() == BATCH_SIZE),
            "sample_batch returns exactly batch_size transitions"
        );
        assert!(
            memory.sample_batch(MEMORY_CAP + 1).is_none(),
            "sample_batch none when batch exceeds occupancy"
        );
    }

    #[test]
    fn replay_memory_overwrites_oldest() {
        let mut memory = ReplayMemory::<MockEnv>::new(2);
        for i in 0..3 {
            memory.push(Transition {
                state: [i as f32, 0.0],
                action: i,
                next_state: [i as f32 + 1.0, 0.0],
                reward: 0.0,
                done: false,
            });
        }
        assert_eq!(memory.len(), 2, "capacity bounds occupancy");
    }
}
