//! Policies backed by the Q-network of [`Dqn`](super::Dqn).
use super::{DqnExplorer, DqnModel};
use crate::{model::SubModel1, util::argmax, util::OutDim, TensorBatch};
use anyhow::Result;
use balance_core::{Env, Policy};
use candle_core::{Device, Tensor};
use rand::rngs::SmallRng;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

fn q_values<Q>(qnet: &DqnModel<Q>, obs: TensorBatch<f32>, device: &Device) -> Result<Vec<f32>>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    let obs = obs.to_tensor(device)?;
    Ok(qnet.forward(&obs)?.flatten_all()?.to_vec1::<f32>()?)
}

/// Takes the action with the largest Q-value.
pub struct DqnGreedyPolicy<'a, E, Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    pub(super) qnet: &'a DqnModel<Q>,
    pub(super) device: &'a Device,
    pub(super) phantom: PhantomData<E>,
}

impl<E, Q> Policy<E> for DqnGreedyPolicy<'_, E, Q>
where
    E: Env,
    E::Obs: Into<TensorBatch<f32>>,
    E::Act: From<i64>,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let q = q_values(self.qnet, obs.clone().into(), self.device)?;
        Ok((argmax(&q) as i64).into())
    }
}

/// Takes actions chosen by the explorer of the agent.
///
/// Every call advances the exploration schedule.
pub struct DqnCollectPolicy<'a, E, Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim,
{
    pub(super) qnet: &'a DqnModel<Q>,
    pub(super) explorer: &'a mut DqnExplorer,
    pub(super) rng: &'a mut SmallRng,
    pub(super) device: &'a Device,
    pub(super) phantom: PhantomData<E>,
}

impl<E, Q> Policy<E> for DqnCollectPolicy<'_, E, Q>
where
    E: Env,
    E::Obs: Into<TensorBatch<f32>>,
    E::Act: From<i64>,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let q = q_values(self.qnet, obs.clone().into(), self.device)?;
        let a = self.explorer.action(&q, self.rng);
        Ok((a as i64).into())
    }
}
