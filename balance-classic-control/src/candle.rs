//! Conversions into the replay buffer columns of `balance-candle-agent`.
use crate::{CartPoleAct, CartPoleObs};
use balance_candle_agent::TensorBatch;

impl From<CartPoleObs> for TensorBatch<f32> {
    fn from(obs: CartPoleObs) -> Self {
        TensorBatch::from_vec(obs.0.to_vec(), vec![4])
    }
}

impl From<CartPoleAct> for TensorBatch<i64> {
    fn from(act: CartPoleAct) -> Self {
        TensorBatch::from_vec(vec![act.0], vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obs_row() {
        let batch: TensorBatch<f32> = CartPoleObs([0.1, 0.2, 0.3, 0.4]).into();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.elem_shape(), &[4]);
        assert_eq!(batch.as_slice(), &[0.1, 0.2, 0.3, 0.4]);
    }
}
