use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ntc", version, about = "Dichotomy search for cross-border exchange limits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one dichotomy search against the simulated oracle
    Search(SearchArgs),
    /// Sweep several simulated secure limits in parallel
    Batch(BatchArgs),
}

/// Search-step policy selectable on the command line or in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Bisect the remaining interval
    RangeDivision,
    /// Walk from one bound in fixed increments, bisect once bracketed
    Steps,
    /// Walk outward from a start value, bisect once bracketed
    Bidirectional,
    /// Like bidirectional, with infeasible-shift levels tightening the bounds
    Reference,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// TOML file with search parameters; explicit flags win over it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lower search bound (MW)
    #[arg(long)]
    pub min: Option<f64>,

    /// Upper search bound (MW)
    #[arg(long)]
    pub max: Option<f64>,

    /// Target precision (MW)
    #[arg(long)]
    pub precision: Option<f64>,

    /// Search-step policy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Step size for the stepping strategies (MW)
    #[arg(long)]
    pub step_size: Option<f64>,

    /// First exchange level tested by the bidirectional strategies (MW)
    #[arg(long)]
    pub start: Option<f64>,

    /// Reference exchange for the reference strategy (MW)
    #[arg(long)]
    pub reference: Option<f64>,

    /// Exchange level at which the simulated network stops being secure (MW)
    #[arg(long)]
    pub secure_limit: Option<f64>,

    /// Lowest exchange the simulated shifter can realise (MW)
    #[arg(long)]
    pub glsk_min: Option<f64>,

    /// Highest exchange the simulated shifter can realise (MW)
    #[arg(long)]
    pub glsk_max: Option<f64>,

    /// Oracle-call budget for the whole search
    #[arg(long)]
    pub max_iterations: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Simulated secure limit to sweep (MW); repeat for each job
    #[arg(long = "limit", required = true)]
    pub limits: Vec<f64>,

    /// Directory receiving the batch manifest
    #[arg(long, default_value = "ntc-batch-out")]
    pub out: PathBuf,

    /// Worker threads; 0 auto-detects the CPU count
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Lower search bound (MW)
    #[arg(long, default_value_t = 0.0)]
    pub min: f64,

    /// Upper search bound (MW)
    #[arg(long, default_value_t = 1000.0)]
    pub max: f64,

    /// Target precision (MW)
    #[arg(long, default_value_t = 10.0)]
    pub precision: f64,
}
