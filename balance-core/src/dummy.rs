//! Small deterministic environment, policy and agent used in tests.
use crate::{
    generic_replay_buffer::{BatchBase, SimpleReplayBuffer},
    record::Record,
    Act, Agent, Env, Obs, Policy, ReplayBufferBase, Spec, Step,
};
use anyhow::{bail, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct CounterObs(pub f32);

impl Obs for CounterObs {
    fn len(&self) -> usize {
        1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterAct(pub i64);

impl Act for CounterAct {}

impl From<i64> for CounterAct {
    fn from(a: i64) -> Self {
        Self(a)
    }
}

#[derive(Clone, Debug)]
pub struct CounterConfig {
    pub episode_len: usize,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self { episode_len: 10 }
    }
}

impl CounterConfig {
    pub fn episode_len(mut self, v: usize) -> Self {
        self.episode_len = v;
        self
    }
}

/// Observes `base + t`; every step gives reward 1; terminates after `episode_len` steps.
pub struct CounterEnv {
    episode_len: usize,
    seed: i64,
    base: f32,
    t: usize,
    n_resets: usize,
}

impl Env for CounterEnv {
    type Config = CounterConfig;
    type Obs = CounterObs;
    type Act = CounterAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            episode_len: config.episode_len,
            seed,
            base: 0.0,
            t: 0,
            n_resets: 0,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        if !(0..2).contains(&a.0) {
            bail!("invalid action {}", a.0);
        }
        self.t += 1;
        let is_terminated = (self.t >= self.episode_len) as i8;
        let obs = CounterObs(self.base + self.t as f32);
        let step = Step::new(obs, a.clone(), 1.0, is_terminated, 0, (), None);
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.n_resets += 1;
        self.base = (self.n_resets * 1000) as f32;
        self.t = 0;
        Ok(CounterObs(self.base))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.base = (self.seed * 100 + ix as i64) as f32;
        self.t = 0;
        Ok(CounterObs(self.base))
    }

    fn observation_spec(&self) -> Spec {
        Spec::Box {
            shape: vec![1],
            low: vec![0.0],
            high: vec![f32::MAX],
        }
    }

    fn action_spec(&self) -> Spec {
        Spec::Discrete { n: 2 }
    }
}

/// Picks the parity of the observation.
pub struct ParityPolicy;

impl Policy<CounterEnv> for ParityPolicy {
    fn sample(&mut self, obs: &CounterObs) -> Result<CounterAct> {
        Ok(CounterAct(obs.0 as i64 % 2))
    }
}

/// A column of scalars.
#[derive(Clone, Debug, PartialEq)]
pub struct VecBatch(pub Vec<f32>);

impl BatchBase for VecBatch {
    fn new(capacity: usize) -> Self {
        Self(vec![0.0; capacity])
    }

    fn push(&mut self, ix: usize, data: Self) {
        let capacity = self.0.len();
        for (k, v) in data.0.into_iter().enumerate() {
            self.0[(ix + k) % capacity] = v;
        }
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self(ixs.iter().map(|&ix| self.0[ix]).collect())
    }
}

impl From<CounterObs> for VecBatch {
    fn from(obs: CounterObs) -> Self {
        Self(vec![obs.0])
    }
}

impl From<CounterAct> for VecBatch {
    fn from(act: CounterAct) -> Self {
        Self(vec![act.0 as f32])
    }
}

pub type CounterBuffer = SimpleReplayBuffer<VecBatch, VecBatch>;

/// Counts updates; its loss is the mean reward of the sampled batch.
#[derive(Default)]
pub struct CountingAgent {
    pub n_updates: usize,
    pub n_collect_calls: usize,
}

impl Agent<CounterEnv, CounterBuffer> for CountingAgent {
    type CollectPolicy<'a> = ParityPolicy;
    type GreedyPolicy<'a> = ParityPolicy;

    fn collect_policy(&mut self) -> Self::CollectPolicy<'_> {
        self.n_collect_calls += 1;
        ParityPolicy
    }

    fn policy(&self) -> Self::GreedyPolicy<'_> {
        ParityPolicy
    }

    fn opt_with_record(&mut self, buffer: &mut CounterBuffer) -> Result<Record> {
        let batch = buffer.batch(4)?;
        self.n_updates += 1;
        let loss = batch.reward.iter().sum::<f32>() / batch.reward.len() as f32;
        Ok(Record::from_scalar("loss", loss))
    }

    fn train_step_counter(&self) -> usize {
        self.n_updates
    }
}
