//! Pool Runner CLI
//!
//! Drives the bounded-concurrency pool with a synthetic, seeded job plan.
//!
//! ## Usage
//!
//! ```bash
//! # Run 100 jobs on 8 workers, stopping at the first failure
//! pool-runner run --items 100 --concurrency 8 --policy abort
//!
//! # Reproducible run fed from an async stream, exported to CSV
//! pool-runner run --seed 42 --stream --output report.csv
//!
//! # Re-render a saved report
//! pool-runner report report.json --format summary
//!
//! # Write an example config file
//! pool-runner config init
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use tracing::info;

mod cli;

use cli::Args;
use pool_runner::config::{print_env_help, AppConfig, ConfigFile, EnvConfig};
use pool_runner::demo::{execute_job, JobPlan};
use pool_runner::models::RunReport;
use pool_runner::output::{OutputFormat, ReportFormatter};
use pool_runner::results::{export_report, load_report};
use pool_runner::utils::{init_logger, LogLevel, Timer};
use pool_runner::{Concurrency, FailurePolicy, Pool};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    init_logger(LogLevel::from_verbose(
        args.verbose || env.verbose.unwrap_or(false),
    ));

    match args.command {
        cli::Command::Run(run_args) => {
            let config = AppConfig::resolve(args.config.as_deref(), &env)?;
            run_jobs(run_args, config).await?;
        }
        cli::Command::Policies => {
            list_policies();
        }
        cli::Command::Report(report_args) => {
            show_report(report_args)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, args.config.as_deref(), &env)?;
        }
    }

    Ok(())
}

async fn run_jobs(args: cli::RunArgs, config: AppConfig) -> Result<()> {
    let concurrency: Concurrency = match &args.concurrency {
        Some(value) => value.parse()?,
        None => Concurrency::try_from(config.concurrency)?,
    };
    let policy = args.policy.unwrap_or(config.failure_policy);
    let format_name = args.format.unwrap_or(config.format);
    let format: OutputFormat = format_name.parse().map_err(anyhow::Error::msg)?;

    let plan = JobPlan::new(args.items.unwrap_or(config.items))
        .fail_rate(args.fail_rate.unwrap_or(config.fail_rate))
        .max_delay_ms(args.max_delay_ms.unwrap_or(config.max_delay_ms))
        .seed(args.seed.or(config.seed));
    let stream = args.stream || config.stream;

    info!(
        "Running job plan with {} workers, policy '{}'{}",
        concurrency,
        policy,
        if stream { " (streamed)" } else { "" }
    );

    let builder = Pool::builder()
        .operation(execute_job)
        .concurrency(concurrency)
        .failure_policy(&policy);
    let builder = if stream {
        builder.input(plan.stream())
    } else {
        builder.input_iter(plan.generate())
    };

    let started_at = Utc::now();
    let outcome = builder.run().await.context("Pool run failed")?;
    let report = RunReport::from_outcome(&outcome, started_at, concurrency.get(), policy);

    let mut formatter = ReportFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_report(&report));

    if let Some(output) = args.output {
        export_report(&report, &output)?;
        println!("Report saved to {output}");
    }

    Ok(())
}

fn show_report(args: cli::ReportArgs) -> Result<()> {
    let report = load_report(&args.file)?;
    let format: OutputFormat = args.format.parse().map_err(anyhow::Error::msg)?;

    let mut formatter = ReportFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_report(&report));
    Ok(())
}

fn list_policies() {
    println!("\nFailure Policies\n");
    for policy in FailurePolicy::all() {
        let description = match policy {
            FailurePolicy::Continue => "Record the failure and keep processing",
            FailurePolicy::Abort => "Stop dispatching new items after the first failure",
            FailurePolicy::Log => "Log the failure as a warning and keep processing",
        };
        println!("  {:10} {}", policy.name(), description);
    }
    println!();
}

fn manage_config(args: cli::ConfigArgs, path: Option<&str>, env: &EnvConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            ConfigFile::example().save(path)?;
            println!("✓ Configuration file created: {output}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { env: show_env, format } => {
            if show_env {
                env.print_summary();
                if !env.has_any() {
                    println!();
                    print_env_help();
                }
            } else {
                let file = ConfigFile {
                    app: AppConfig::resolve(path, env)?,
                    ..ConfigFile::default()
                };
                let output = if format == "json" {
                    serde_json::to_string_pretty(&file)?
                } else {
                    serde_yaml::to_string(&file)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file.or_else(|| path.map(str::to_string)).unwrap_or_else(|| {
                ConfigFile::find()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "./pool-runner.yaml".to_string())
            });

            let timer = Timer::start("config validation");
            match ConfigFile::load(&path) {
                Ok(_) => {
                    println!(
                        "✓ Configuration file is valid: {path} ({}ms)",
                        timer.elapsed_ms()
                    );
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e:#}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
