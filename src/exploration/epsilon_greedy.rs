use rand::{thread_rng, Rng};

use crate::error::ConfigError;

use super::Choice;

/// Epsilon greedy exploration policy with a multiplicative per-step decay
///
/// The epsilon threshold starts at its configured value and shrinks by the
/// factor `decay` on every [`decay_step`](Self::decay_step). There is no
/// enforced lower bound beyond what repeated decay naturally produces.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f32,
    decay: f32,
}

impl EpsilonGreedy {
    /// Initialize the policy from a starting epsilon and a decay factor
    ///
    /// Fails if `epsilon` is not in `[0, 1]` or `decay` is not in `(0, 1]`.
    pub fn new(epsilon: f32, decay: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(ConfigError::Range {
                name: "epsilon",
                value: epsilon,
                expected: "[0, 1]",
            });
        }
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(ConfigError::Range {
                name: "decay",
                value: decay,
                expected: "(0, 1]",
            });
        }
        Ok(Self { epsilon, decay })
    }

    /// The current epsilon threshold
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Invoke the policy for one action selection
    pub fn choose(&self) -> Choice {
        if thread_rng().gen::<f32>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Apply one decay step: `epsilon <- epsilon * decay`
    pub fn decay_step(&mut self) {
        self.epsilon *= self.decay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_on_construction() {
        assert!(EpsilonGreedy::new(1.0, 0.99).is_ok());
        assert!(EpsilonGreedy::new(0.0, 1.0).is_ok());
        assert!(EpsilonGreedy::new(1.1, 0.99).is_err(), "epsilon above 1");
        assert!(EpsilonGreedy::new(-0.1, 0.99).is_err(), "negative epsilon");
        assert!(EpsilonGreedy::new(1.0, 0.0).is_err(), "zero decay");
        assert!(EpsilonGreedy::new(1.0, 1.5).is_err(), "decay above 1");
    }

    #[test]
    fn decay_is_multiplicative() {
        let mut policy = EpsilonGreedy::new(1.0, 0.9).unwrap();
        for _ in 0..3 {
            policy.decay_step();
        }
        assert!((policy.epsilon() - 0.9f32.powi(3)).abs() < 1e-6);
    }

    #[test]
    fn choose_at_epsilon_extremes() {
        let policy = EpsilonGreedy::new(0.0, 0.9).unwrap();
        for _ in 0..20 {
            assert_eq!(policy.choose(), Choice::Exploit, "epsilon 0 never explores");
        }

        let policy = EpsilonGreedy::new(1.0, 0.9).unwrap();
        for _ in 0..20 {
            assert_eq!(policy.choose(), Choice::Explore, "epsilon 1 always explores");
        }
    }
}
