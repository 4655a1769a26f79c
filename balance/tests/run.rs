use anyhow::Result;
use balance::{run, RunConfig};
use balance_candle_agent::util::CriticLoss;
use tempdir::TempDir;

fn small_config(dir: &TempDir) -> RunConfig {
    RunConfig::default()
        .initial_collect_steps(100)
        .batch_size(8)
        .log_interval(5)
        .evaluation(10, 2)
        .output_dir(dir.path())
        .video((60, 40), 1)
}

#[test]
fn test_run_without_training() -> Result<()> {
    let dir = TempDir::new("run")?;
    let config = small_config(&dir).num_iterations(0);
    let summary = run(&config)?;

    assert_eq!(summary.series.len(), 1);
    assert_eq!(summary.series.iterations(), vec![0]);
    assert_eq!(summary.train_steps, 0);
    assert!(!summary.solved);
    assert!(summary.plot_path.exists());
    assert!(summary.returns_path.exists());
    assert!(summary.video_path.exists());
    assert!(summary.n_frames >= 2);
    assert!(dir.path().join("run_config.yaml").exists());
    Ok(())
}

#[test]
fn test_short_run() -> Result<()> {
    let dir = TempDir::new("run")?;
    let config = small_config(&dir).num_iterations(20);
    let summary = run(&config)?;

    assert_eq!(summary.series.iterations(), vec![0, 10, 20]);
    assert_eq!(summary.train_steps, 20);
    for avg_return in summary.series.returns() {
        assert!((1.0..=200.0).contains(&avg_return));
    }

    let returns = std::fs::read_to_string(&summary.returns_path)?;
    assert_eq!(returns.lines().count(), 4);
    assert!(returns.starts_with("iteration,average_return"));

    let records = std::fs::read_to_string(&summary.records_path)?;
    assert!(records.contains(",loss_mean,"));
    assert!(records.contains(",eval_return,"));
    Ok(())
}

#[test]
fn test_run_with_smooth_l1_loss() -> Result<()> {
    let dir = TempDir::new("run")?;
    let config = small_config(&dir)
        .num_iterations(10)
        .critic_loss(CriticLoss::SmoothL1);
    let summary = run(&config)?;
    assert_eq!(summary.train_steps, 10);

    let records = std::fs::read_to_string(&summary.records_path)?;
    assert!(records.contains(",loss_mean,"));
    let config_ = RunConfig::load(dir.path().join("run_config.yaml"))?;
    assert_eq!(config_.critic_loss, CriticLoss::SmoothL1);
    Ok(())
}

#[test]
fn test_run_saves_config() -> Result<()> {
    let dir = TempDir::new("run")?;
    let config = small_config(&dir).num_iterations(10);
    let summary = run(&config)?;
    assert_eq!(summary.series.len(), 2);

    let config_ = RunConfig::load(dir.path().join("run_config.yaml"))?;
    assert_eq!(config, config_);
    Ok(())
}

#[test]
fn test_unknown_env() -> Result<()> {
    let dir = TempDir::new("run")?;
    let mut config = small_config(&dir).num_iterations(0);
    config.env_name = "MountainCar-v0".to_string();
    assert!(run(&config).is_err());
    Ok(())
}
