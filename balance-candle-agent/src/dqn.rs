//! DQN agent.
//!
//! The agent keeps an online Q-network trained with Adam on the squared TD
//! error and a target network following it by soft updates. Two policies
//! borrow the online network: [`DqnCollectPolicy`] explores with the
//! configured [`DqnExplorer`], [`DqnGreedyPolicy`] always takes the action
//! with the largest Q-value.
mod base;
mod config;
mod explorer;
mod model;
mod policy;
pub use base::Dqn;
pub use config::DqnConfig;
pub use explorer::{DqnExplorer, EpsilonGreedy};
pub use model::{DqnModel, DqnModelConfig};
pub use policy::{DqnCollectPolicy, DqnGreedyPolicy};
