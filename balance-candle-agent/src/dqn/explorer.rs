//! Exploration strategies of DQN.
use crate::util::argmax;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Explorers for DQN.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum DqnExplorer {
    /// Epsilon-greedy action selection.
    EpsilonGreedy(EpsilonGreedy),
}

impl DqnExplorer {
    /// Samples an action index given the Q-values of a single observation.
    pub fn action(&mut self, q: &[f32], rng: &mut impl Rng) -> usize {
        match self {
            Self::EpsilonGreedy(egreedy) => egreedy.action(q, rng),
        }
    }

    /// Current probability of a random action.
    pub fn eps(&self) -> f64 {
        match self {
            Self::EpsilonGreedy(egreedy) => egreedy.eps(),
        }
    }
}

impl Default for DqnExplorer {
    fn default() -> Self {
        Self::EpsilonGreedy(EpsilonGreedy::new())
    }
}

/// Epsilon-greedy explorer.
///
/// Epsilon decreases linearly from `eps_start` to `eps_final` over
/// `final_step` calls of [`EpsilonGreedy::action`] and stays at `eps_final`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Number of actions taken so far.
    pub n_steps: usize,

    /// Epsilon at the beginning.
    pub eps_start: f64,

    /// Epsilon after `final_step` actions.
    pub eps_final: f64,

    /// Step at which epsilon reaches `eps_final`.
    pub final_step: usize,
}

#[allow(clippy::new_without_default)]
impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new() -> Self {
        Self {
            n_steps: 0,
            eps_start: 1.0,
            eps_final: 0.02,
            final_step: 100_000,
        }
    }

    /// Constructs epsilon-greedy explorer wrapped in [`DqnExplorer`].
    pub fn with_final_step(final_step: usize) -> DqnExplorer {
        DqnExplorer::EpsilonGreedy(Self {
            final_step,
            ..Self::new()
        })
    }

    /// Current epsilon.
    pub fn eps(&self) -> f64 {
        if self.final_step == 0 {
            return self.eps_final;
        }
        let d = (self.eps_start - self.eps_final) / (self.final_step as f64);
        (self.eps_start - d * self.n_steps as f64).max(self.eps_final)
    }

    /// Takes a uniformly random action with probability epsilon, the greedy one otherwise.
    pub fn action(&mut self, q: &[f32], rng: &mut impl Rng) -> usize {
        let is_random = rng.gen::<f64>() < self.eps();
        self.n_steps += 1;

        if is_random {
            rng.gen_range(0..q.len())
        } else {
            argmax(q)
        }
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(self, v: f64) -> Self {
        let mut s = self;
        s.eps_final = v;
        s
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(self, v: f64) -> Self {
        let mut s = self;
        s.eps_start = v;
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_linear_schedule() {
        let mut explorer = EpsilonGreedy::new().eps_start(1.0).eps_final(0.1);
        explorer.final_step = 10;
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(explorer.eps(), 1.0);
        for _ in 0..5 {
            explorer.action(&[0.0, 1.0], &mut rng);
        }
        assert!((explorer.eps() - 0.55).abs() < 1e-9);
        for _ in 0..100 {
            explorer.action(&[0.0, 1.0], &mut rng);
        }
        assert_eq!(explorer.eps(), 0.1);
    }

    #[test]
    fn test_greedy_when_eps_is_zero() {
        let mut explorer = EpsilonGreedy::new().eps_start(0.0).eps_final(0.0);
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(explorer.action(&[0.3, -1.0, 2.0], &mut rng), 2);
        }
    }
}
