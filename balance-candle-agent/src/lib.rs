//! DQN agent implemented with [candle](https://crates.io/crates/candle-core).
pub mod dqn;
mod error;
pub mod mlp;
pub mod model;
pub mod opt;
mod tensor_batch;
pub mod util;
pub use error::DqnError;
use serde::{Deserialize, Serialize};
pub use tensor_batch::TensorBatch;

/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum Device {
    /// The main CPU device.
    #[default]
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
