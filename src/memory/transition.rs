use crate::env::Environment;

/// Represents a single transition in the environment, immutable once recorded
pub struct Transition<E: Environment> {
    /// The state of the environment before taking the action
    pub state: E::State,
    /// The index of the action taken in the given state
    pub action: usize,
    /// The state of the environment after the action was taken
    pub next_state: E::State,
    /// The reward received after taking the action
    pub reward: f32,
    /// Whether `next_state` is terminal
    pub done: bool,
}

impl<E: Environment> Clone for Transition<E> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            action: self.action,
            next_state: self.next_state.clone(),
            reward: self.reward,
            done: self.done,
        }
    }
}
