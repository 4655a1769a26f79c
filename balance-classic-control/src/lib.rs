//! Classic control environments simulated natively.
//!
//! [`CartPoleEnv`] implements [`balance_core::Env`] for the cart-pole balancing
//! task of Barto, Sutton and Anderson, with the dynamics, termination bounds
//! and time limits of the `CartPole-v0` and `CartPole-v1` tasks. Frames are
//! rasterised with [`image`].
//!
//! With the `candle` feature, observations and actions convert into the
//! columns of a replay buffer used by `balance-candle-agent`.
mod act;
mod cartpole;
mod config;
mod error;
mod obs;
mod render;
pub use act::CartPoleAct;
pub use cartpole::{CartPoleEnv, CartPoleState};
pub use config::CartPoleConfig;
pub use error::CartPoleError;
pub use obs::CartPoleObs;

#[cfg(feature = "candle")]
pub mod candle;
