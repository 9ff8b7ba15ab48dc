use clap::{Args, Parser, Subcommand};
use fieldsched::engine::config::SearchStrategy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "fieldsched contributors",
    version,
    about = "fieldsched - Assigns league games and practices to weekly time slots, honoring hard constraints and minimizing weighted soft penalties.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to expand search nodes.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for the best schedules of a problem file.
    Solve(SolveArgs),
    /// Parse a problem file, apply its partial assignments and print statistics without searching.
    Check(CheckArgs),
}

/// Arguments for the `solve` subcommand.
#[derive(Args, Debug)]
pub struct SolveArgs {
    // --- Core Arguments ---
    /// Path to the problem description file.
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// The eight weights and penalties in positional order:
    /// minFilledWeight prefWeight pairWeight secDiffWeight gameMinPen practiceMinPen notPairedPen sectionPen.
    /// Overrides the `[weights]` table of the config file.
    #[arg(value_name = "WEIGHTS", num_args = 0..=8, allow_negative_numbers = true)]
    pub weights: Vec<String>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the best schedule here instead of standard output.
    /// Further solutions are written next to it with a numeric suffix.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Search Overrides ---
    /// Frontier strategy: branch-and-bound, breadth-first or depth-first.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<SearchStrategy>,

    /// Number of best solutions to keep.
    #[arg(short, long, value_name = "INT")]
    pub num_solutions: Option<usize>,

    /// Stop after expanding this many search nodes.
    #[arg(long, value_name = "INT")]
    pub max_nodes: Option<u64>,

    /// Stop after this many seconds of search.
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<f64>,

    /// Number of nodes expanded in parallel per round.
    #[arg(long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Print the raw and weighted contribution of each penalty term.
    #[arg(long)]
    pub breakdown: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.num-solutions=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the problem description file.
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,
}
