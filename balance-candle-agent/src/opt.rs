//! Optimizer of the Q-network.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::Optimizer as _;
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam with the default moment coefficients.
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

impl OptimizerConfig {
    /// Builds an optimizer updating `vars`.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        let Self::Adam { lr } = self;
        let params = ParamsAdam {
            lr: *lr,
            ..ParamsAdam::default()
        };
        Ok(Optimizer::Adam(Adam::new(vars, params)?))
    }

    /// Learning rate.
    pub fn lr(&self) -> f64 {
        let Self::Adam { lr } = self;
        *lr
    }

    /// Overrides the learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::Adam { .. } => Self::Adam { lr },
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 1e-3 }
    }
}

/// An optimizer built from [`OptimizerConfig`].
pub enum Optimizer {
    /// Adam.
    Adam(Adam),
}

impl Optimizer {
    /// Computes gradients of `loss` and updates the variables.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::Adam(opt) => Ok(opt.backward_step(loss)?),
        }
    }

    /// Current learning rate.
    pub fn learning_rate(&self) -> f64 {
        match self {
            Self::Adam(opt) => opt.learning_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};

    #[test]
    fn test_learning_rate() {
        let config = OptimizerConfig::default().learning_rate(0.5);
        assert_eq!(config, OptimizerConfig::Adam { lr: 0.5 });
        assert_eq!(config.lr(), 0.5);
    }

    #[test]
    fn test_step_decreases_loss() -> Result<()> {
        let x = Var::zeros(2, DType::F32, &Device::Cpu)?;
        let mut opt = OptimizerConfig::Adam { lr: 0.1 }.build(vec![x.clone()])?;
        assert_eq!(opt.learning_rate(), 0.1);

        let target = Tensor::new(&[1.0f32, -1.0], &Device::Cpu)?;
        let loss = |x: &Var| (x.as_tensor() - &target)?.sqr()?.sum_all();
        let before = loss(&x)?.to_scalar::<f32>()?;
        for _ in 0..10 {
            opt.backward_step(&loss(&x)?)?;
        }
        let after = loss(&x)?.to_scalar::<f32>()?;
        assert!(after < before);
        Ok(())
    }
}
