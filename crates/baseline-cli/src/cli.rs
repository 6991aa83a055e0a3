//! CLI argument parsing for compare-baselines.
//!
//! Dimension arguments are parsed through their `FromStr` impls, so unknown
//! tests, kernels or codenames are rejected before anything is read.
//! Flags override every other configuration source.

use baseline_types::{
    CpuModel, Direction, GuestOs, KernelVersion, MachineConfig, Metric, TestFamily,
};
use clap::{Args, Parser, Subcommand};

/// Performance baseline comparison
///
/// Compares recorded performance baselines across CPU models, directories
/// or git revisions and writes a JSON report.
#[derive(Parser, Debug)]
#[command(name = "compare-baselines")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/perf-baselines/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Selection and output flags shared by the comparison commands.
///
/// Empty lists fall back to the configured defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Test families to compare
    #[arg(long, num_args = 1..)]
    pub tests: Vec<TestFamily>,

    /// Host kernel versions to compare
    #[arg(long, num_args = 1..)]
    pub kernels: Vec<KernelVersion>,

    /// CPU codenames; for `cpu` the first one is the basis
    #[arg(long, num_args = 1..)]
    pub codenames: Vec<CpuModel>,

    /// Path of the report file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Include raw per-side values and document metadata
    #[arg(short, long)]
    pub auxiliary: bool,
}

/// Comparison commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare CPU models within one baseline directory
    Cpu {
        /// Directory containing baseline JSON files
        #[arg(short, long)]
        directory: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Compare two baseline directories
    Directory {
        /// Source (basis) directory
        #[arg(short, long)]
        source: String,

        /// Target directory
        #[arg(short, long)]
        target: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Compare the baselines of two git revisions
    Commit {
        /// Source (basis) revision
        #[arg(short, long)]
        source: String,

        /// Target revision
        #[arg(short, long, default_value = "HEAD")]
        target: String,

        /// Baseline directory inside the repository
        #[arg(short, long)]
        directory: Option<String>,

        /// Git repository (default from config)
        #[arg(long)]
        repo: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Compare the working tree baselines against the latest commit
    Latest {
        /// Baseline directory inside the repository
        #[arg(short, long)]
        directory: Option<String>,

        /// Git repository (default from config)
        #[arg(long)]
        repo: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Collect baseline targets of one configuration across git revisions
    History(HistoryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Revisions to collect, oldest first
    #[arg(short, long, num_args = 1.., required = true)]
    pub revisions: Vec<String>,

    /// Test family
    #[arg(long, default_value = "network_tcp_throughput")]
    pub test: TestFamily,

    /// Host kernel selecting the baseline file
    #[arg(long)]
    pub host_kernel: KernelVersion,

    /// Guest kernel (defaults to the host kernel)
    #[arg(long)]
    pub guest_kernel: Option<KernelVersion>,

    /// CPU codename
    #[arg(long)]
    pub codename: CpuModel,

    /// Guest OS
    #[arg(long, default_value = "ubuntu-18.04")]
    pub guest_os: GuestOs,

    /// Machine configuration
    #[arg(long, default_value = "2vcpu_1024mb")]
    pub machine_config: MachineConfig,

    /// Only collect test cases of this direction (g2h, h2g, bd)
    #[arg(long)]
    pub direction: Option<Direction>,

    /// Metrics to collect (default: all)
    #[arg(long, num_args = 1..)]
    pub metrics: Vec<Metric>,

    /// Baseline directory inside the repository
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Git repository (default from config)
    #[arg(long)]
    pub repo: Option<String>,

    /// Path of the history file
    #[arg(short, long)]
    pub output: Option<String>,
}
