//! Configuration of [`Trainer`](super::Trainer).
use crate::error::CoreError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
///
/// Intervals are counted in optimization steps.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct TrainerConfig {
    /// Number of training iterations, each made of collection and one optimization step.
    pub num_iterations: usize,

    /// Number of environment steps taken with the warm-up policy before training.
    pub initial_collect_steps: usize,

    /// Number of environment steps per training iteration.
    pub collect_steps_per_iteration: usize,

    /// Interval of logging the loss and flushing records.
    pub log_interval: usize,

    /// Interval of evaluation.
    pub eval_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            num_iterations: 20000,
            initial_collect_steps: 1000,
            collect_steps_per_iteration: 1,
            log_interval: 200,
            eval_interval: 1000,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training iterations.
    pub fn num_iterations(mut self, v: usize) -> Self {
        self.num_iterations = v;
        self
    }

    /// Sets the number of warm-up steps.
    pub fn initial_collect_steps(mut self, v: usize) -> Self {
        self.initial_collect_steps = v;
        self
    }

    /// Sets the number of environment steps per iteration.
    pub fn collect_steps_per_iteration(mut self, v: usize) -> Self {
        self.collect_steps_per_iteration = v;
        self
    }

    /// Sets the logging interval.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Sets the evaluation interval.
    pub fn eval_interval(mut self, v: usize) -> Self {
        self.eval_interval = v;
        self
    }

    /// Checks that the intervals are positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, v) in [
            ("log_interval", self.log_interval),
            ("eval_interval", self.eval_interval),
            ("collect_steps_per_iteration", self.collect_steps_per_iteration),
        ] {
            if v == 0 {
                return Err(CoreError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    /// Loads [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_trainer_config() -> Result<()> {
        let config = TrainerConfig::default()
            .num_iterations(100)
            .eval_interval(10)
            .log_interval(5);

        let dir = TempDir::new("trainer_config")?;
        let path = dir.path().join("trainer_config.yaml");
        config.save(&path)?;
        let config_ = TrainerConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_zero_interval() {
        assert!(TrainerConfig::default().validate().is_ok());
        assert!(matches!(
            TrainerConfig::default().eval_interval(0).validate(),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(TrainerConfig::default().log_interval(0).validate().is_err());
    }
}
