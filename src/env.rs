/// Represents a discrete-time Markov decision process with a finite,
/// discrete action space, in which an agent can operate.
///
/// Actions are plain indices into the action space, matching the output of a
/// value model that produces one predicted value per action.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    ///
    /// Cloned once per recorded transition, so the implementation should be
    /// lightweight. Ideally `State` is `Copy`.
    type State: Clone;

    /// Reset the environment to an initial state
    fn reset(&mut self) -> Self::State;

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Returns** `(next_state, reward, done)`, where `done` signals that
    /// the episode has reached a terminal state.
    fn step(&mut self, action: usize) -> (Self::State, f32, bool);

    /// Uniformly sample a valid action from the action space
    fn random_action(&self) -> usize;
}
