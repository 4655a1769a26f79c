use anyhow::Result;
use balance::{run, RunConfig};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Train a DQN agent on CartPole
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the run configuration, defaults are used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the plot, the records and the video
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Overrides the number of training iterations
    #[arg(short, long)]
    num_iterations: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(output_dir) = args.output_dir {
        config = config.output_dir(output_dir);
    }
    if let Some(num_iterations) = args.num_iterations {
        config = config.num_iterations(num_iterations);
    }

    let summary = run(&config)?;
    if let Some((step, avg_return)) = summary.series.last() {
        info!(
            "Final average return at step {}: {} (solved: {})",
            step, avg_return, summary.solved
        );
    }
    info!("Saved {:?}, {:?}, {:?}", summary.plot_path, summary.returns_path, summary.video_path);

    Ok(())
}
