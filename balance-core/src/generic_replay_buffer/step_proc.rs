//! Generic step processor.
use super::{BatchBase, GenericTransitionBatch};
use crate::{Env, Obs, Step, StepProcessor};
use anyhow::{anyhow, Result};
use std::marker::PhantomData;

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug, Default)]
pub struct SimpleStepProcessorConfig {}

/// Produces one-step transitions `(o_t, a_t, o_t+1, r_t)` from [`Step`]s.
///
/// The processor keeps the previous observation; after the end of an episode it
/// switches to the initial observation of the next one, taken from
/// [`Step::init_obs`].
pub struct SimpleStepProcessor<E, O, A> {
    prev_obs: Option<O>,
    phantom: PhantomData<(E, A)>,
}

impl<E, O, A> StepProcessor<E> for SimpleStepProcessor<E, O, A>
where
    E: Env,
    O: BatchBase + From<E::Obs>,
    A: BatchBase + From<E::Act>,
{
    type Config = SimpleStepProcessorConfig;
    type Output = GenericTransitionBatch<O, A>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.into());
    }

    fn process(&mut self, step: Step<E>) -> Result<Self::Output> {
        debug_assert_eq!(step.obs.len(), 1);

        let is_done = step.is_done();
        let next_obs = step.obs.clone().into();
        let obs = self
            .prev_obs
            .replace(step.obs.into())
            .ok_or_else(|| anyhow!("Previous observation is not set, reset() was not called"))?;

        if is_done {
            let init_obs = step
                .init_obs
                .ok_or_else(|| anyhow!("Episode ended without an initial observation"))?;
            self.prev_obs.replace(init_obs.into());
        }

        Ok(GenericTransitionBatch {
            obs,
            act: step.act.into(),
            next_obs,
            reward: vec![step.reward],
            is_terminated: vec![step.is_terminated],
            is_truncated: vec![step.is_truncated],
            ix_sample: None,
        })
    }
}
