//! Trains a DQN agent to balance a pole on a cart.
//!
//! [`run`] wires the pieces of the workspace into one training run:
//!
//! 1. A [`HeadlessDisplay`] is acquired for the whole run.
//! 2. Training and evaluation environments are built from
//!    [`RunConfig::env_name`] with separate seeds.
//! 3. The replay buffer is filled with a random policy, then the
//!    [`Trainer`](balance_core::Trainer) alternates collection with the
//!    exploratory policy and optimization of the Q-network, evaluating the
//!    greedy policy every [`RunConfig::eval_interval`] steps.
//! 4. The average returns are plotted to `trained-agent.png` (with a CSV file
//!    next to it) and episodes of the greedy policy are recorded to
//!    `trained-agent.gif` in [`RunConfig::output_dir`].
//!
//! ```no_run
//! use balance::{run, RunConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = RunConfig::default().num_iterations(5000).output_dir("out");
//! let summary = run(&config)?;
//! println!("{:?}", summary.series.last());
//! # Ok(())
//! # }
//! ```
mod config;
mod csv_recorder;
mod display;
pub mod report;
mod run;
pub use config::RunConfig;
pub use csv_recorder::CsvRecorder;
pub use display::HeadlessDisplay;
pub use run::{run, RunSummary};
