//! DQN agent implemented with candle.
use super::{
    config::DqnConfig, explorer::DqnExplorer, model::DqnModel, DqnCollectPolicy, DqnGreedyPolicy,
};
use crate::{
    model::SubModel1,
    util::{smooth_l1_loss, track, CriticLoss, OutDim},
    DqnError, TensorBatch,
};
use anyhow::Result;
use balance_core::{
    record::{Record, RecordValue},
    Agent, Env, ReplayBufferBase, TransitionBatch,
};
use candle_core::{shape::D, Device, Tensor};
use candle_nn::loss::mse;
use log::trace;
use rand::{rngs::SmallRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// DQN agent.
///
/// The Q-network `Q` maps a batch of observations `[n, obs_dim]` to Q-values
/// `[n, n_actions]`. Transition batches carry observations as
/// [`TensorBatch<f32>`] and action indices as [`TensorBatch<i64>`].
pub struct Dqn<E, Q, R>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    soft_update_interval: usize,
    soft_update_counter: usize,
    batch_size: usize,
    qnet: DqnModel<Q>,
    qnet_tgt: DqnModel<Q>,
    discount_factor: f64,
    tau: f64,
    explorer: DqnExplorer,
    device: Device,
    n_opts: usize,
    critic_loss: CriticLoss,
    rng: SmallRng,
    phantom: PhantomData<(E, R)>,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
    R: ReplayBufferBase,
    R::Batch: TransitionBatch<ObsBatch = TensorBatch<f32>, ActBatch = TensorBatch<i64>>,
{
    /// Constructs DQN agent.
    ///
    /// The target network starts as a copy of the online network.
    pub fn build(config: DqnConfig<Q::Config>) -> Result<Self> {
        if config.batch_size == 0 || config.soft_update_interval == 0 {
            return Err(DqnError::InvalidConfig(
                "batch_size and soft_update_interval must be positive".into(),
            )
            .into());
        }
        let device: Device = config.device.unwrap_or_default().try_into()?;
        let qnet = DqnModel::build(config.model_config.clone(), &device)?;
        let mut qnet_tgt = DqnModel::build(config.model_config, &device)?;
        qnet_tgt.copy_from(&qnet)?;

        Ok(Dqn {
            qnet,
            qnet_tgt,
            soft_update_interval: config.soft_update_interval,
            soft_update_counter: 0,
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            tau: config.tau,
            explorer: config.explorer,
            device,
            n_opts: 0,
            critic_loss: config.critic_loss,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        })
    }

    /// Dimension of observations expected by the Q-network.
    pub fn obs_dim(&self) -> usize {
        self.qnet.in_dim
    }

    /// Number of discrete actions.
    pub fn n_actions(&self) -> usize {
        self.qnet.out_dim
    }

    fn check_batch(
        &self,
        obs: &TensorBatch<f32>,
        act: &TensorBatch<i64>,
        next_obs: &TensorBatch<f32>,
        reward: &[f32],
        is_terminated: &[i8],
    ) -> Result<(), DqnError> {
        let n = reward.len();
        if n == 0 {
            return Err(DqnError::SpecMismatch("empty batch".into()));
        }
        for (name, o) in [("obs", obs), ("next_obs", next_obs)] {
            let dim: usize = o.elem_shape().iter().product();
            if o.len() != n || dim != self.obs_dim() {
                return Err(DqnError::SpecMismatch(format!(
                    "{} has {} rows of dimension {}, expected {} rows of dimension {}",
                    name,
                    o.len(),
                    dim,
                    n,
                    self.obs_dim()
                )));
            }
        }
        if act.len() != n || is_terminated.len() != n {
            return Err(DqnError::SpecMismatch(format!(
                "{} actions and {} flags for {} rewards",
                act.len(),
                is_terminated.len(),
                n
            )));
        }
        if let Some(a) = act
            .as_slice()
            .iter()
            .find(|&&a| a < 0 || a as usize >= self.n_actions())
        {
            return Err(DqnError::SpecMismatch(format!(
                "action {} is out of 0..{}",
                a,
                self.n_actions()
            )));
        }
        Ok(())
    }

    /// Performs one gradient step on a batch of transitions and returns the loss.
    ///
    /// The target is `r + discount_factor * (1 - terminated) * max_a Q_tgt(o', a)`;
    /// truncated transitions still bootstrap from the next observation.
    pub fn train_on_batch(&mut self, batch: R::Batch) -> Result<f32> {
        let (obs, act, next_obs, reward, is_terminated, _is_truncated, _ixs) = batch.unpack();
        self.check_batch(&obs, &act, &next_obs, &reward, &is_terminated)?;
        let n = reward.len();

        let obs = obs.to_tensor(&self.device)?;
        let act = act.to_tensor(&self.device)?.reshape((n, 1))?;
        let next_obs = next_obs.to_tensor(&self.device)?;
        let reward = Tensor::from_slice(&reward[..], (n,), &self.device)?;
        let is_not_terminated = {
            let v = is_terminated
                .iter()
                .map(|&f| (1 - f) as f32)
                .collect::<Vec<_>>();
            Tensor::from_slice(&v[..], (n,), &self.device)?
        };

        let pred = self
            .qnet
            .forward(&obs)?
            .gather(&act, D::Minus1)?
            .squeeze(D::Minus1)?;

        let tgt = {
            let q = self.qnet_tgt.forward(&next_obs)?.max(D::Minus1)?;
            let bootstrap = ((is_not_terminated * self.discount_factor)? * q)?;
            (reward + bootstrap)?.detach()
        };

        let loss = match self.critic_loss {
            CriticLoss::Mse => mse(&pred, &tgt)?,
            CriticLoss::SmoothL1 => smooth_l1_loss(&pred, &tgt)?,
        };
        self.qnet.backward_step(&loss)?;

        self.soft_update_counter += 1;
        if self.soft_update_counter == self.soft_update_interval {
            self.soft_update_counter = 0;
            track(self.qnet_tgt.get_varmap(), self.qnet.get_varmap(), self.tau)?;
        }

        self.n_opts += 1;
        let loss = loss.to_scalar::<f32>()?;
        trace!("opt step {}: loss = {}", self.n_opts, loss);
        Ok(loss)
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    E::Obs: Into<TensorBatch<f32>>,
    E::Act: From<i64>,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
    R: ReplayBufferBase,
    R::Batch: TransitionBatch<ObsBatch = TensorBatch<f32>, ActBatch = TensorBatch<i64>>,
{
    type CollectPolicy<'a>
        = DqnCollectPolicy<'a, E, Q>
    where
        Self: 'a;

    type GreedyPolicy<'a>
        = DqnGreedyPolicy<'a, E, Q>
    where
        Self: 'a;

    fn collect_policy(&mut self) -> Self::CollectPolicy<'_> {
        DqnCollectPolicy {
            qnet: &self.qnet,
            explorer: &mut self.explorer,
            rng: &mut self.rng,
            device: &self.device,
            phantom: PhantomData,
        }
    }

    fn policy(&self) -> Self::GreedyPolicy<'_> {
        DqnGreedyPolicy {
            qnet: &self.qnet,
            device: &self.device,
            phantom: PhantomData,
        }
    }

    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record> {
        let batch = buffer.batch(self.batch_size)?;
        let loss = self.train_on_batch(batch)?;
        Ok(Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss)),
            ("eps", RecordValue::Scalar(self.explorer.eps() as f32)),
        ]))
    }

    fn train_step_counter(&self) -> usize {
        self.n_opts
    }
}
