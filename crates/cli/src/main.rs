//! Cloud instance cost optimizer CLI
//!
//! Inspects instance catalogs, searches for the cheapest configuration
//! covering a requirement, and checks a footprint's capacity.

mod commands;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use commands::{catalog, check, optimize};
use optimizer_lib::{FitnessPolicy, Strategy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Cloud instance cost optimizer CLI
#[derive(Parser)]
#[command(name = "ccopt")]
#[command(
    author,
    version,
    about = "Find the cheapest cloud instance mix for a workload",
    long_about = None
)]
pub struct Cli {
    /// Instance catalog JSON export (can also be set via CCOPT_CATALOG env var)
    #[arg(long, global = true, env = "CCOPT_CATALOG", default_value = "catalogs/t3.json")]
    pub catalog: PathBuf,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the instance types in the catalog
    Catalog,

    /// Search for the cheapest configuration and compare it to the current one
    Optimize(OptimizeArgs),

    /// Compare current capacity with a requirement without pricing
    Check(CheckArgs),
}

/// Required resources, given directly or derived from utilization
#[derive(Args, Debug)]
pub struct RequirementArgs {
    /// Required vCPUs
    #[arg(long, requires = "memory", conflicts_with_all = ["cpu_util", "mem_util"])]
    pub vcpus: Option<u32>,

    /// Required memory in GiB
    #[arg(long, requires = "vcpus")]
    pub memory: Option<f64>,

    /// Observed CPU utilization of the current configuration, in percent
    #[arg(long, requires = "mem_util", conflicts_with = "memory")]
    pub cpu_util: Option<f64>,

    /// Observed memory utilization of the current configuration, in percent
    #[arg(long, requires = "cpu_util")]
    pub mem_util: Option<f64>,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub requirement: RequirementArgs,

    /// Current deployment as TYPE=COUNT, repeatable
    #[arg(long, value_parser = commands::parse_instance_count)]
    pub current: Vec<(String, u32)>,

    /// Search strategy
    #[arg(long, default_value = "genetic")]
    pub strategy: StrategyArg,

    /// Seed for a reproducible search
    #[arg(long)]
    pub seed: Option<u64>,

    /// Population size
    #[arg(long)]
    pub pop_size: Option<usize>,

    /// Number of generations
    #[arg(long)]
    pub generations: Option<u32>,

    /// Per-child mutation probability
    #[arg(long)]
    pub mutation_rate: Option<f64>,

    /// Upper bound on units per instance type in initial configurations
    #[arg(long)]
    pub max_count: Option<u32>,

    /// Fitness scoring policy
    #[arg(long, default_value = "inverse-cost")]
    pub fitness: FitnessArg,

    /// Hourly savings a downgrade must exceed
    #[arg(long)]
    pub threshold: Option<f64>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub requirement: RequirementArgs,

    /// Current deployment as TYPE=COUNT, repeatable
    #[arg(long, value_parser = commands::parse_instance_count)]
    pub current: Vec<(String, u32)>,

    /// Spare units in either dimension beyond which a downgrade is suggested
    #[arg(long, default_value_t = optimizer_lib::DEFAULT_HEADROOM)]
    pub headroom: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Evolutionary search over instance mixes
    Genetic,
    /// Cheapest single instance that covers the requirement
    Direct,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Genetic => Strategy::Evolutionary,
            StrategyArg::Direct => Strategy::DirectPricing,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FitnessArg {
    InverseCost,
    SurplusPenalized,
}

impl From<FitnessArg> for FitnessPolicy {
    fn from(arg: FitnessArg) -> Self {
        match arg {
            FitnessArg::InverseCost => FitnessPolicy::InverseCost,
            FitnessArg::SurplusPenalized => FitnessPolicy::SurplusPenalized,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog = commands::load_catalog(&cli.catalog)?;

    match cli.command {
        Commands::Catalog => catalog::show_catalog(&catalog, cli.format)?,
        Commands::Optimize(args) => optimize::run_optimize(&catalog, args, cli.format)?,
        Commands::Check(args) => check::run_check(&catalog, args, cli.format)?,
    }

    Ok(())
}
