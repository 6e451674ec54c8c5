use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "costmap",
    about = "Inspect and optimize costmap layer action plans",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the actions in a plan
    Inspect(InspectArgs),
    /// Keep only the actions that write into one grid
    Filter(FilterArgs),
    /// Merge nearby actions on the same grid
    Optimize(OptimizeArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    pub plan: PathBuf,
}

#[derive(Args)]
pub struct FilterArgs {
    pub plan: PathBuf,
    #[arg(short, long)]
    pub grid: u64,
}

#[derive(Args)]
pub struct OptimizeArgs {
    pub plan: PathBuf,
    /// Largest gap, in cells, that still merges two regions
    #[arg(short, long)]
    pub tolerance: Option<u32>,
    /// Never absorb true-overwrite actions into a merged region
    #[arg(long)]
    pub protect_true_overwrite: bool,
    /// TOML file with `tolerance` and `guard` keys
    #[arg(long)]
    pub config: Option<PathBuf>,
}
