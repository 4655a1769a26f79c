//! Multilayer perceptron.
mod base;
mod config;
pub use base::Mlp;
use candle_core::Tensor;
use candle_nn::{Linear, Module};
pub use config::MlpConfig;

/// Applies the layers with ReLU between them; the last layer is linear.
fn mlp_forward(xs: Tensor, layers: &[Linear]) -> candle_core::Result<Tensor> {
    let n_layers = layers.len();
    let mut xs = xs;

    for layer in layers.iter().take(n_layers.saturating_sub(1)) {
        xs = layer.forward(&xs)?.relu()?;
    }

    match layers.last() {
        Some(layer) => layer.forward(&xs),
        None => Ok(xs),
    }
}
