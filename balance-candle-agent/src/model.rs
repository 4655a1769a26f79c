//! Interface of neural networks used in agents.
use anyhow::Result;
use candle_nn::VarBuilder;

/// Neural network model with a single input, built on a shared [`VarBuilder`].
///
/// Sharing the variable map between sub-models lets a model own a single
/// optimizer; it is also how a target network is built next to the online one.
pub trait SubModel1 {
    /// Configuration from which the model is constructed.
    type Config;

    /// Input of the model.
    type Input;

    /// Output of the model.
    type Output;

    /// Builds the model, registering its variables in `vb`.
    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Forward computation.
    fn forward(&self, input: &Self::Input) -> Result<Self::Output>;
}
