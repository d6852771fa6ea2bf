//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Bounded-concurrency task runner
#[derive(Parser, Debug)]
#[command(name = "pool-runner")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Run async jobs with bounded concurrency and early abort")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(short = 'C', long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a synthetic job plan through the pool
    Run(RunArgs),

    /// List failure policies
    Policies,

    /// Show a report saved with `run --output <file>.json`
    Report(ReportArgs),

    /// Manage configuration files
    Config(ConfigArgs),
}

/// Arguments for run command
///
/// Unset options fall back to the config file and environment.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Number of jobs to generate
    #[arg(short, long)]
    pub items: Option<u32>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub concurrency: Option<String>,

    /// Failure policy (continue, abort, log)
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Probability of a job failing (0.0-1.0)
    #[arg(long)]
    pub fail_rate: Option<f64>,

    /// Maximum delay per job in milliseconds
    #[arg(long)]
    pub max_delay_ms: Option<u64>,

    /// Seed for a reproducible job plan
    #[arg(long)]
    pub seed: Option<u64>,

    /// Feed jobs through an asynchronous stream
    #[arg(long)]
    pub stream: bool,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Export the report to a file (.json or .csv)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Saved JSON report
    pub file: String,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for config management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./pool-runner.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variables instead
        #[arg(short, long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the discovered config file)
        file: Option<String>,
    },
}
