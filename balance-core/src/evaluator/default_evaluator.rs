//! Default evaluator.
use super::Evaluator;
use crate::{error::CoreError, Env, Policy};
use anyhow::Result;
use log::trace;

/// Averages the undiscounted return of a fixed number of episodes.
///
/// The `ix`-th episode starts from [`Env::reset_with_index`] with `ix`, so two
/// evaluations of a deterministic policy give the same result.
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<f32> {
        let mut total = 0f32;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let mut episode_return = 0f32;

            loop {
                let act = policy.sample(&prev_obs)?;
                let (step, _) = self.env.step(&act)?;
                episode_return += step.reward;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }

            trace!("Evaluation episode {}: return = {}", ix, episode_return);
            total += episode_return;
        }

        Ok(total / self.n_episodes as f32)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs an evaluator on a freshly built environment.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Self::from_env(E::build(config, seed)?, n_episodes)
    }

    /// Constructs an evaluator on the given environment.
    pub fn from_env(env: E, n_episodes: usize) -> Result<Self> {
        if n_episodes == 0 {
            return Err(
                CoreError::InvalidConfig("number of evaluation episodes must be positive".into())
                    .into(),
            );
        }
        Ok(Self { n_episodes, env })
    }
}
