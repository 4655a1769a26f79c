use crate::{
    config::RunConfig,
    csv_recorder::CsvRecorder,
    display::HeadlessDisplay,
    report::{create_policy_eval_video, plot_returns},
};
use anyhow::{anyhow, Result};
use balance_candle_agent::{dqn::Dqn, mlp::Mlp, TensorBatch};
use balance_classic_control::{CartPoleConfig, CartPoleEnv};
use balance_core::{
    generic_replay_buffer::{
        SimpleReplayBuffer, SimpleStepProcessor, SimpleStepProcessorConfig,
    },
    Agent, DefaultEvaluator, Env, RandomPolicy, ReplayBufferBase, ReturnSeries, StepProcessor,
    Trainer,
};
use log::info;
use std::{fs, path::PathBuf};

type ObsBatch = TensorBatch<f32>;
type ActBatch = TensorBatch<i64>;
type ReplayBuffer = SimpleReplayBuffer<ObsBatch, ActBatch>;
type StepProc = SimpleStepProcessor<CartPoleEnv, ObsBatch, ActBatch>;
type CartPoleDqn = Dqn<CartPoleEnv, Mlp, ReplayBuffer>;

/// Artefacts and results of [`run`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Average returns of the greedy policy over training.
    pub series: ReturnSeries,

    /// Whether the last average return reached the reward threshold of the task.
    pub solved: bool,

    /// Number of optimization steps taken.
    pub train_steps: usize,

    /// Number of frames in the video.
    pub n_frames: usize,

    /// Path of the return plot.
    pub plot_path: PathBuf,

    /// Path of the CSV file with the average returns.
    pub returns_path: PathBuf,

    /// Path of the CSV file with the training records.
    pub records_path: PathBuf,

    /// Path of the video of the trained policy.
    pub video_path: PathBuf,
}

/// Trains a DQN agent on CartPole and writes the plot, the CSV files and the video.
///
/// The headless display is held until the function returns, whether training
/// succeeds or not. With `video_episodes == 0` no video is written.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let (width, height) = config.display_size;
    let mut display = HeadlessDisplay::start(width, height)?;

    let output_dir = &config.output_dir;
    fs::create_dir_all(output_dir)?;
    config.save(output_dir.join("run_config.yaml"))?;

    let env_config = CartPoleConfig::from_name(&config.env_name)?;
    let train_env = CartPoleEnv::build(&env_config, config.train_seed)?;
    let eval_env = CartPoleEnv::build(&env_config, config.eval_seed)?;

    let obs_dim = train_env.observation_spec().flat_dim();
    let action_spec = train_env.action_spec();
    let n_actions = action_spec
        .n()
        .ok_or_else(|| anyhow!("{} has no discrete action space", config.env_name))?;
    info!(
        "{}: obs_dim = {}, n_actions = {}",
        config.env_name, obs_dim, n_actions
    );

    let mut agent = CartPoleDqn::build(config.dqn_config(obs_dim, n_actions))?;
    let mut buffer = ReplayBuffer::build(&config.replay_buffer_config())?;
    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut warmup_policy = RandomPolicy::<CartPoleEnv>::build(&action_spec, config.seed)?;
    let mut evaluator = DefaultEvaluator::from_env(eval_env, config.num_eval_episodes)?;
    let records_path = output_dir.join("records.csv");
    let mut recorder = CsvRecorder::create(&records_path)?;
    let mut trainer = Trainer::build(config.trainer_config())?;

    let series = trainer.train(
        train_env,
        step_proc,
        &mut warmup_policy,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut evaluator,
    )?;

    let solved = match series.last() {
        Some((_, avg_return)) => env_config.is_solved(avg_return),
        None => false,
    };
    info!(
        "{} {} (threshold {})",
        config.env_name,
        if solved { "solved" } else { "not solved" },
        env_config.reward_threshold
    );

    let plot_path = output_dir.join("trained-agent.png");
    plot_returns(&series, &plot_path, config.plot_y_max)?;

    let video_path = output_dir.join("trained-agent.gif");
    let n_frames = match config.video_episodes {
        0 => 0,
        n_episodes => {
            let mut video_env = CartPoleEnv::build(&env_config, config.eval_seed)?;
            create_policy_eval_video(
                &mut video_env,
                &mut agent.policy(),
                &mut display,
                &video_path,
                n_episodes,
                config.video_fps,
            )?
        }
    };

    Ok(RunSummary {
        series,
        solved,
        train_steps: agent.train_step_counter(),
        n_frames,
        returns_path: plot_path.with_extension("csv"),
        plot_path,
        records_path,
        video_path,
    })
}
