use crate::{error::CoreError, Env, Policy, Spec};
use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::marker::PhantomData;

/// Samples actions uniformly from a discrete action space.
///
/// Used to fill the replay buffer before training starts.
pub struct RandomPolicy<E> {
    n_actions: usize,
    rng: SmallRng,
    phantom: PhantomData<E>,
}

impl<E: Env> RandomPolicy<E> {
    /// Builds the policy for the given action space.
    pub fn build(action_spec: &Spec, seed: u64) -> Result<Self> {
        let n_actions = match action_spec {
            Spec::Discrete { n } if *n > 0 => *n,
            spec => {
                return Err(CoreError::UnsupportedSpec(format!(
                    "random policy expects a non-empty discrete space, got {:?}",
                    spec
                ))
                .into())
            }
        };

        Ok(Self {
            n_actions,
            rng: SmallRng::seed_from_u64(seed),
            phantom: PhantomData,
        })
    }
}

impl<E> Policy<E> for RandomPolicy<E>
where
    E: Env,
    E::Act: From<i64>,
{
    fn sample(&mut self, _obs: &E::Obs) -> Result<E::Act> {
        Ok((self.rng.gen_range(0..self.n_actions) as i64).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{CounterAct, CounterEnv, CounterObs};

    #[test]
    fn test_uniform_over_actions() -> Result<()> {
        let mut policy = RandomPolicy::<CounterEnv>::build(&Spec::Discrete { n: 3 }, 0)?;
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let CounterAct(a) = policy.sample(&CounterObs(0.0))?;
            counts[a as usize] += 1;
        }
        assert!(counts.iter().all(|&c| c > 800));
        Ok(())
    }

    #[test]
    fn test_rejects_box() {
        let spec = Spec::Box {
            shape: vec![1],
            low: vec![0.0],
            high: vec![1.0],
        };
        assert!(RandomPolicy::<CounterEnv>::build(&spec, 0).is_err());
    }
}
