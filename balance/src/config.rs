//! Configuration of a training run.
use anyhow::Result;
use balance_candle_agent::{
    dqn::{DqnConfig, DqnExplorer, DqnModelConfig, EpsilonGreedy},
    mlp::MlpConfig,
    opt::OptimizerConfig,
    util::CriticLoss,
    Device,
};
use balance_core::{generic_replay_buffer::SimpleReplayBufferConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`run`](crate::run).
///
/// The default values train a DQN agent on `CartPole-v0` for 20000 iterations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Name of the task, `CartPole-v0` or `CartPole-v1`.
    pub env_name: String,

    /// Number of training iterations.
    pub num_iterations: usize,

    /// Number of environment steps taken with the random policy before training.
    pub initial_collect_steps: usize,

    /// Number of environment steps per training iteration.
    pub collect_steps_per_iteration: usize,

    /// Capacity of the replay buffer.
    pub replay_buffer_max_length: usize,

    /// Number of transitions per optimization step.
    pub batch_size: usize,

    /// Learning rate of Adam.
    pub learning_rate: f64,

    /// Interval of logging the loss, in training steps.
    pub log_interval: usize,

    /// Number of episodes per evaluation.
    pub num_eval_episodes: usize,

    /// Interval of evaluation, in training steps.
    pub eval_interval: usize,

    /// Sizes of the hidden layers of the Q-network.
    pub fc_layer_params: Vec<usize>,

    /// Discount factor.
    pub discount_factor: f64,

    /// Soft update coefficient of the target network.
    pub tau: f64,

    /// Number of optimization steps between target network updates.
    pub soft_update_interval: usize,

    /// Loss on the TD error.
    pub critic_loss: CriticLoss,

    /// Epsilon of the collection policy at the beginning of training.
    pub eps_start: f64,

    /// Epsilon of the collection policy after `eps_final_step` collection steps.
    pub eps_final: f64,

    /// Number of collection steps over which epsilon decreases.
    pub eps_final_step: usize,

    /// Upper limit of the y-axis of the return plot.
    pub plot_y_max: f32,

    /// Directory for the plot, the CSV files and the video.
    pub output_dir: PathBuf,

    /// Width and height of the frames of the video.
    pub display_size: (u32, u32),

    /// Number of episodes in the video.
    pub video_episodes: usize,

    /// Frames per second of the video.
    pub video_fps: u32,

    /// Seed of the training environment.
    pub train_seed: i64,

    /// Seed of the evaluation environment.
    pub eval_seed: i64,

    /// Seed of the replay buffer, the warm-up policy and the agent.
    pub seed: u64,

    /// Device on which the Q-networks live.
    pub device: Device,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            env_name: "CartPole-v0".to_string(),
            num_iterations: 20000,
            initial_collect_steps: 1000,
            collect_steps_per_iteration: 1,
            replay_buffer_max_length: 100000,
            batch_size: 64,
            learning_rate: 1e-3,
            log_interval: 200,
            num_eval_episodes: 10,
            eval_interval: 1000,
            fc_layer_params: vec![100],
            discount_factor: 0.99,
            tau: 0.005,
            soft_update_interval: 1,
            critic_loss: CriticLoss::Mse,
            eps_start: 1.0,
            eps_final: 0.1,
            eps_final_step: 2000,
            plot_y_max: 250.0,
            output_dir: PathBuf::from("data"),
            display_size: (600, 400),
            video_episodes: 5,
            video_fps: 30,
            train_seed: 0,
            eval_seed: 1,
            seed: 42,
            device: Device::Cpu,
        }
    }
}

impl RunConfig {
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

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the logging interval.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Sets the evaluation interval and the number of episodes per evaluation.
    pub fn evaluation(mut self, interval: usize, n_episodes: usize) -> Self {
        self.eval_interval = interval;
        self.num_eval_episodes = n_episodes;
        self
    }

    /// Sets the loss on the TD error.
    pub fn critic_loss(mut self, v: CriticLoss) -> Self {
        self.critic_loss = v;
        self
    }

    /// Sets the output directory.
    pub fn output_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.output_dir = v.into();
        self
    }

    /// Sets the frame size and the number of episodes of the video.
    pub fn video(mut self, display_size: (u32, u32), n_episodes: usize) -> Self {
        self.display_size = display_size;
        self.video_episodes = n_episodes;
        self
    }

    /// Configuration of the training loop.
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig::default()
            .num_iterations(self.num_iterations)
            .initial_collect_steps(self.initial_collect_steps)
            .collect_steps_per_iteration(self.collect_steps_per_iteration)
            .log_interval(self.log_interval)
            .eval_interval(self.eval_interval)
    }

    /// Configuration of the replay buffer.
    pub fn replay_buffer_config(&self) -> SimpleReplayBufferConfig {
        SimpleReplayBufferConfig::default()
            .capacity(self.replay_buffer_max_length)
            .seed(self.seed)
    }

    /// Configuration of the agent for the given observation and action dimensions.
    pub fn dqn_config(&self, obs_dim: usize, n_actions: usize) -> DqnConfig<MlpConfig> {
        let q_config = MlpConfig::new(obs_dim, self.fc_layer_params.clone(), n_actions, false);
        let model_config = DqnModelConfig::default()
            .q_config(q_config)
            .opt_config(OptimizerConfig::Adam {
                lr: self.learning_rate,
            });
        let explorer = DqnExplorer::EpsilonGreedy(
            EpsilonGreedy {
                final_step: self.eps_final_step,
                ..EpsilonGreedy::new()
            }
            .eps_start(self.eps_start)
            .eps_final(self.eps_final),
        );

        DqnConfig::default()
            .model_config(model_config)
            .batch_size(self.batch_size)
            .discount_factor(self.discount_factor)
            .tau(self.tau)
            .soft_update_interval(self.soft_update_interval)
            .explorer(explorer)
            .critic_loss(self.critic_loss.clone())
            .seed(self.seed)
            .device(self.device)
    }

    /// Loads [`RunConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunConfig`] as a YAML file.
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
    fn test_serde_run_config() -> Result<()> {
        let config = RunConfig::default()
            .num_iterations(10)
            .evaluation(5, 2)
            .output_dir("out");

        let dir = TempDir::new("run_config")?;
        let path = dir.path().join("run_config.yaml");
        config.save(&path)?;
        let config_ = RunConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_partial_yaml_uses_defaults() -> Result<()> {
        let dir = TempDir::new("run_config")?;
        let path = dir.path().join("run_config.yaml");
        std::fs::write(&path, "num_iterations: 3000\nenv_name: CartPole-v1\n")?;

        let config = RunConfig::load(&path)?;
        assert_eq!(config.num_iterations, 3000);
        assert_eq!(config.env_name, "CartPole-v1");
        assert_eq!(config.eval_interval, 1000);
        assert_eq!(config.fc_layer_params, vec![100]);
        Ok(())
    }

    #[test]
    fn test_derived_configs() {
        let config = RunConfig::default();
        let trainer_config = config.trainer_config();
        assert_eq!(trainer_config.num_iterations, 20000);
        assert_eq!(trainer_config.initial_collect_steps, 1000);
        assert_eq!(trainer_config.log_interval, 200);
        assert_eq!(trainer_config.eval_interval, 1000);

        let buffer_config = config.replay_buffer_config();
        assert_eq!(buffer_config.capacity, 100000);
        assert_eq!(buffer_config.window, 2);

        let dqn_config = config.dqn_config(4, 2);
        assert_eq!(dqn_config.batch_size, 64);
        assert_eq!(dqn_config.seed, 42);
        assert_eq!(dqn_config.critic_loss, CriticLoss::Mse);
        let DqnExplorer::EpsilonGreedy(explorer) = dqn_config.explorer;
        assert_eq!(explorer.eps_start, 1.0);
        assert_eq!(explorer.eps_final, 0.1);
        assert_eq!(explorer.final_step, 2000);
    }

    #[test]
    fn test_critic_loss_from_yaml() -> Result<()> {
        let dir = TempDir::new("run_config")?;
        let path = dir.path().join("run_config.yaml");
        std::fs::write(&path, "critic_loss: SmoothL1\n")?;

        let config = RunConfig::load(&path)?;
        assert_eq!(config.critic_loss, CriticLoss::SmoothL1);
        assert_eq!(config.dqn_config(4, 2).critic_loss, CriticLoss::SmoothL1);
        Ok(())
    }
}
