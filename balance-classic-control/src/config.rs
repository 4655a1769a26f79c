//! Configuration of [`CartPoleEnv`](crate::CartPoleEnv).
use crate::CartPoleError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`CartPoleEnv`](crate::CartPoleEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CartPoleConfig {
    /// Registered name of the task.
    pub name: String,

    /// Episodes are truncated after this number of steps.
    pub max_episode_steps: usize,

    /// Average return at which the task is considered solved.
    pub reward_threshold: f32,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            name: "CartPole-v0".to_string(),
            max_episode_steps: 200,
            reward_threshold: 195.0,
        }
    }
}

impl CartPoleConfig {
    /// Resolves a registered task name.
    pub fn from_name(name: &str) -> Result<Self, CartPoleError> {
        let (max_episode_steps, reward_threshold) = match name {
            "CartPole-v0" => (200, 195.0),
            "CartPole-v1" => (500, 475.0),
            _ => return Err(CartPoleError::UnknownEnv(name.to_string())),
        };
        Ok(Self {
            name: name.to_string(),
            max_episode_steps,
            reward_threshold,
        })
    }

    /// Sets the time limit.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Whether an average return reaches the threshold of the task.
    pub fn is_solved(&self, avg_return: f32) -> bool {
        avg_return >= self.reward_threshold
    }

    /// Loads [`CartPoleConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CartPoleConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
