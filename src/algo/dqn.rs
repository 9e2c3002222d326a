use std::{fmt::Debug, num::NonZeroUsize};

use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{adaptor::OptimizerAdaptor, GradientsParams, Optimizer, Sgd, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use log::debug;

use crate::{
    env::Environment,
    error::ConfigError,
    exploration::{Choice, EpsilonGreedy},
    memory::{ReplayStore, Transition},
    traits::ToTensor,
};

/// A burn module approximating the action-value function
///
/// ### Generics
/// - `B`: A burn backend
pub trait QModel<B: AutodiffBackend>: AutodiffModule<B> {
    /// Forward pass through the model, mapping a state vector to one
    /// predicted value per discrete action
    fn forward(&self, state: Tensor<B, 1>) -> Tensor<B, 1>;
}

/// The mode an episode runs in
///
/// Replaces the ambiguous `(is_train, is_greedy)` flag pair: training is
/// always exploratory and evaluation is always greedy, so the illegal
/// combinations cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EpisodeMode {
    /// Epsilon-greedy action selection; transitions are recorded, the model
    /// is updated every step, and epsilon decays after each non-terminal step
    Train,
    /// Pure exploitation with no learning side effects; the result lands in
    /// the greedy metric history
    GreedyEval,
    /// Pure exploitation with no learning side effects and no recording
    Test,
}

impl EpisodeMode {
    fn is_train(self) -> bool {
        matches!(self, Self::Train)
    }

    fn is_greedy(self) -> bool {
        !self.is_train()
    }
}

/// Summary of one completed episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeResult {
    /// Number of environment steps executed, including the terminating one
    pub steps_taken: usize,
    /// Sum of rewards received over the episode
    pub cumulative_reward: f32,
}

/// Per-episode metrics accumulated by [`DqnTrainer::train`]
///
/// The four sequences are append-only and index-aligned pairwise: entry `i`
/// of `training_steps` and `training_rewards` describe the same episode.
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    pub training_steps: Vec<usize>,
    pub training_rewards: Vec<f32>,
    pub greedy_steps: Vec<usize>,
    pub greedy_rewards: Vec<f32>,
}

impl TrainingHistory {
    fn record_training(&mut self, result: EpisodeResult) {
        self.training_steps.push(result.steps_taken);
        self.training_rewards.push(result.cumulative_reward);
    }

    fn record_greedy(&mut self, result: EpisodeResult) {
        self.greedy_steps.push(result.steps_taken);
        self.greedy_rewards.push(result.cumulative_reward);
    }
}

/// Configuration for the [`DqnTrainer`]
pub struct DqnTrainerConfig {
    /// Hard cap on steps per episode; an episode truncates here if the
    /// environment never signals terminal
    pub max_steps: usize,
    /// Number of transitions drawn from the replay store per learning pass
    pub batch_size: usize,
    /// The discount factor
    pub gamma: f32,
    /// The learning rate for the SGD optimizer
    pub lr: f32,
    /// The epsilon greedy exploration schedule
    pub exploration: EpsilonGreedy,
}

impl Default for DqnTrainerConfig {
    fn default() -> Self {
        Self {
            max_steps: 500,
            batch_size: 32,
            gamma: 0.99,
            lr: 1e-3,
            exploration: EpsilonGreedy::new(1.0, 0.999).unwrap(),
        }
    }
}

impl DqnTrainerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::Zero { name: "max_steps" });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Zero { name: "batch_size" });
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::Range {
                name: "gamma",
                value: self.gamma,
                expected: "[0, 1]",
            });
        }
        Ok(())
    }
}

type SgdOptimizer<M, B> = OptimizerAdaptor<Sgd<<B as AutodiffBackend>::InnerBackend>, M, B>;

/// A Deep Q Network trainer
///
/// Drives the TD(0) control loop: epsilon-greedy action selection against the
/// live model, per-step transition recording into a replay store, and a
/// bootstrapped mean-squared-error update applied one sampled transition at a
/// time with plain SGD. Sequential single-sample gradient steps are part of
/// the training dynamics and are deliberately not fused into one batched
/// loss, which would produce different parameter trajectories.
///
/// ### Generics
/// - `B`: A burn backend
/// - `M`: The [`QModel`] being trained
/// - `E`: The [`Environment`] in which the agent learns
/// - `R`: The [`ReplayStore`] holding past transitions
pub struct DqnTrainer<B, M, E, R>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    E: Environment,
{
    env: E,
    model: Option<M>,
    memory: R,
    optimizer: SgdOptimizer<M, B>,
    loss: MseLoss<B>,
    exploration: EpsilonGreedy,
    gamma: f32,
    lr: f32,
    max_steps: usize,
    batch_size: usize,
    history: TrainingHistory,
    device: &'static B::Device,
}

impl<B, M, E, R> DqnTrainer<B, M, E, R>
where
    B: AutodiffBackend,
    M: QModel<B>,
    E: Environment,
    E::State: ToTensor<B, 1, Float>,
    R: ReplayStore<E>,
    B::IntElem: TryInto<usize, Error: Debug>,
{
    /// Initialize a new `DqnTrainer`
    ///
    /// ### Arguments
    /// - `env` The environment to interact with
    /// - `model` A [`QModel`] to be trained in place
    /// - `memory` A [`ReplayStore`] for the agent's past transitions
    /// - `config` A [`DqnTrainerConfig`] of hyperparameters
    /// - `device` A static reference to the device used for the `model`
    ///
    /// Fails fast with a [`ConfigError`] on invalid hyperparameters.
    pub fn new(
        env: E,
        model: M,
        memory: R,
        config: DqnTrainerConfig,
        device: &'static B::Device,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            env,
            model: Some(model),
            memory,
            optimizer: SgdConfig::new().init(),
            loss: MseLoss::new(),
            exploration: config.exploration,
            gamma: config.gamma,
            lr: config.lr,
            max_steps: config.max_steps,
            batch_size: config.batch_size,
            history: TrainingHistory::default(),
            device,
        })
    }

    /// The current exploration threshold
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon()
    }

    /// The metrics accumulated by [`train`](Self::train) so far
    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// Consume the trainer and return the trained model
    pub fn into_model(mut self) -> M {
        self.model.take().unwrap()
    }

    /// Choose the exploitation action for a state
    ///
    /// Actions are ranked by the *absolute value* of their predicted Q, not
    /// the raw value. Models trained by earlier versions of this loop depend
    /// on the magnitude ranking, so it is kept intact.
    fn greedy_action(&self, state: &E::State) -> usize {
        let input = state.clone().to_tensor(self.device);
        let output = self
            .model
            .as_ref()
            .unwrap()
            .forward(input)
            .abs()
            .argmax(0)
            .into_scalar();
        output.try_into().unwrap()
    }

    /// Invoke the exploration policy to choose an action for a state
    fn act(&self, state: &E::State) -> usize {
        match self.exploration.choose() {
            Choice::Explore => self.env.random_action(),
            Choice::Exploit => self.greedy_action(state),
        }
    }

    /// Perform one learning pass over a sampled minibatch
    ///
    /// Silently skipped while the store holds fewer than `batch_size`
    /// transitions. Each sampled transition gets its own TD target, loss, and
    /// full SGD step, applied sequentially. The non-terminal target
    /// bootstraps from the live model and the backward pass flows through it;
    /// a terminal target is the raw reward.
    fn update_model(&mut self) {
        let Some(batch) = self.memory.sample_batch(self.batch_size) else {
            return;
        };

        let mut model = self.model.take().unwrap();

        for transition in batch {
            let Transition {
                state,
                action,
                next_state,
                reward,
                done,
            } = transition;

            let q = model
                .forward(state.to_tensor(self.device))
                .slice([action..action + 1]);

            let max_next_q = if done {
                Tensor::zeros([1], self.device)
            } else {
                model.forward(next_state.to_tensor(self.device)).max()
            };
            let target = Tensor::<B, 1>::from_floats([reward], self.device)
                + max_next_q * self.gamma;

            let loss = self.loss.forward(q, target, Reduction::Mean);

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = self.optimizer.step(self.lr.into(), model, grads);
        }

        self.model = Some(model);
    }

    /// Drive one episode from reset to termination or the `max_steps` cap
    fn run_episode(&mut self, mode: EpisodeMode) -> EpisodeResult {
        let mut state = self.env.reset();
        let mut cumulative_reward = 0.0;
        let mut steps_taken = 0;

        for _ in 0..self.max_steps {
            let action = if mode.is_greedy() {
                self.greedy_action(&state)
            } else {
                self.act(&state)
            };
            let (next_state, reward, done) = self.env.step(action);
            steps_taken += 1;
            cumulative_reward += reward;

            if mode.is_train() {
                self.memory.push(Transition {
                    state: state.clone(),
                    action,
                    next_state: next_state.clone(),
                    reward,
                    done,
                });
                self.update_model();
            }

            if done {
                break;
            }

            state = next_state;

            // The terminating step never reaches this point, so epsilon
            // decays once per non-terminal training step.
            if mode.is_train() {
                self.exploration.decay_step();
            }
        }

        EpisodeResult {
            steps_taken,
            cumulative_reward,
        }
    }

    /// Run `num_episodes` training episodes, recording each result in the
    /// training metric history
    ///
    /// When `greedy_eval_period` is given, one greedy evaluation episode runs
    /// after every training episode whose index is a multiple of the period
    /// (including episode 0), and its result lands in the greedy metric
    /// history. Evaluation episodes never touch the replay store, the model,
    /// or the exploration schedule.
    pub fn train(&mut self, num_episodes: usize, greedy_eval_period: Option<NonZeroUsize>) {
        for episode in 0..num_episodes {
            let result = self.run_episode(EpisodeMode::Train);
            debug!(
                "episode {episode}: steps = {}, reward = {}, epsilon = {}",
                result.steps_taken,
                result.cumulative_reward,
                self.exploration.epsilon(),
            );
            self.history.record_training(result);

            if let Some(period) = greedy_eval_period {
                if episode % period.get() == 0 {
                    let result = self.run_episode(EpisodeMode::GreedyEval);
                    debug!(
                        "greedy evaluation after episode {episode}: steps = {}, reward = {}",
                        result.steps_taken, result.cumulative_reward,
                    );
                    self.history.record_greedy(result);
                }
            }
        }
    }

    /// Run one greedy episode as a read-only probe of current performance
    ///
    /// Nothing is recorded and no learning side effects occur.
    pub fn run_testing_episode(&mut self) -> EpisodeResult {
        self.run_episode(EpisodeMode::Test)
    }
}
