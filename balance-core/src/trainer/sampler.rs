//! Experience sampling.
use crate::{
    record::{Record, RecordValue},
    Env, ExperienceBufferBase, Policy, StepProcessor,
};
use anyhow::Result;
use std::time::Instant;

/// Runs a policy on an environment and pushes the transitions into a buffer.
///
/// The environment state is kept between calls, so a run of warm-up steps
/// followed by training steps forms one continuous stream of episodes.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,

    prev_obs: Option<E::Obs>,

    step_processor: P,

    /// Undiscounted return of the ongoing episode.
    episode_return: f32,

    n_env_steps: usize,

    n_env_steps_for_fps: usize,

    timer_for_fps: Instant,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a sampler.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            episode_return: 0.0,
            n_env_steps: 0,
            n_env_steps_for_fps: 0,
            timer_for_fps: Instant::now(),
        }
    }

    /// Samples an action, applies it to the environment and pushes the transition.
    ///
    /// The returned record contains `"episode_return"` when the step ended an episode.
    pub fn sample_and_push<Q, B>(&mut self, policy: &mut Q, buffer: &mut B) -> Result<Record>
    where
        Q: Policy<E>,
        B: ExperienceBufferBase<Item = P::Output>,
    {
        let prev_obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => {
                let obs = self.env.reset()?;
                self.step_processor.reset(obs.clone());
                obs
            }
        };

        let act = policy.sample(&prev_obs)?;
        let (step, mut record) = self.env.step_with_reset(&act)?;
        let is_done = step.is_done();
        self.episode_return += step.reward;
        self.n_env_steps += 1;
        self.n_env_steps_for_fps += 1;

        self.prev_obs = match is_done {
            true => step.init_obs.clone(),
            false => Some(step.obs.clone()),
        };

        let transition = self.step_processor.process(step)?;
        buffer.push(transition)?;

        if is_done {
            record.insert("episode_return", RecordValue::Scalar(self.episode_return));
            self.episode_return = 0.0;
        }

        Ok(record)
    }

    /// Number of environment steps taken so far.
    pub fn n_env_steps(&self) -> usize {
        self.n_env_steps
    }

    /// Environment steps per second since the last call, then resets the counter.
    pub fn env_steps_per_sec(&mut self) -> f32 {
        let secs = self.timer_for_fps.elapsed().as_secs_f32();
        let fps = match secs > 0.0 {
            true => self.n_env_steps_for_fps as f32 / secs,
            false => 0.0,
        };
        self.n_env_steps_for_fps = 0;
        self.timer_for_fps = Instant::now();
        fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{CounterBuffer, CounterConfig, CounterEnv, ParityPolicy, VecBatch},
        generic_replay_buffer::{SimpleReplayBufferConfig, SimpleStepProcessor},
        ReplayBufferBase,
    };

    type StepProc = SimpleStepProcessor<CounterEnv, VecBatch, VecBatch>;

    #[test]
    fn test_transitions_cross_episodes() -> Result<()> {
        let env = CounterEnv::build(&CounterConfig::default().episode_len(3), 0)?;
        let mut sampler = Sampler::new(env, StepProc::build(&Default::default()));
        let mut buffer = CounterBuffer::build(&SimpleReplayBufferConfig::default().capacity(10))?;

        let mut returns = vec![];
        for _ in 0..4 {
            let record = sampler.sample_and_push(&mut ParityPolicy, &mut buffer)?;
            if let Ok(r) = record.get_scalar("episode_return") {
                returns.push(r);
            }
        }
        assert_eq!(buffer.len(), 4);
        assert_eq!(sampler.n_env_steps(), 4);
        assert_eq!(returns, vec![3.0]);

        // The last transition of the first episode ends in the terminal observation,
        // the next one starts from the initial observation of the second episode.
        let last = buffer.get(2).unwrap();
        assert_eq!(last.obs, VecBatch(vec![1002.0]));
        assert_eq!(last.next_obs, VecBatch(vec![1003.0]));
        assert_eq!(last.is_terminated, vec![1]);
        let first = buffer.get(3).unwrap();
        assert_eq!(first.obs, VecBatch(vec![2000.0]));
        Ok(())
    }
}
