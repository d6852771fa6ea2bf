//! Configuration module
//!
//! Handles loading and managing configuration. Values are layered:
//! built-in defaults, then a config file, then `POOL_RUNNER_*` environment
//! variables, then command-line flags.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::executor::{Concurrency, FailurePolicy};
use crate::output::OutputFormat;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of concurrent workers
    pub concurrency: usize,

    /// Failure policy name (continue, abort, log)
    pub failure_policy: String,

    /// Number of demo jobs to generate
    pub items: u32,

    /// Probability of a demo job failing
    pub fail_rate: f64,

    /// Upper bound for a demo job's delay
    pub max_delay_ms: u64,

    /// Seed for the job plan; random when absent
    pub seed: Option<u64>,

    /// Feed jobs through an asynchronous stream
    pub stream: bool,

    /// Output format
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            concurrency: Concurrency::DEFAULT,
            failure_policy: FailurePolicy::Continue.name().to_string(),
            items: 20,
            fail_rate: 0.1,
            max_delay_ms: 50,
            seed: None,
            stream: false,
            format: "table".to_string(),
        }
    }
}

impl AppConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        Concurrency::try_from(self.concurrency)?;
        self.failure_policy.parse::<FailurePolicy>()?;

        if !(0.0..=1.0).contains(&self.fail_rate) {
            anyhow::bail!(
                "Invalid fail_rate {}. Valid range: 0.0-1.0",
                self.fail_rate
            );
        }

        self.format
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)?;

        Ok(())
    }

    /// Resolve settings from a config file and the environment
    ///
    /// The file is `path`, else `POOL_RUNNER_CONFIG`, else the first one
    /// found in the standard locations. The merged result is validated, so
    /// bad environment overrides are rejected like bad file values.
    pub fn resolve(path: Option<&str>, env: &EnvConfig) -> Result<Self> {
        let file = match path.or(env.config_file.as_deref()) {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::load_default()?,
        };

        let mut app = file.app;
        app.apply_env(env);
        app.validate()
            .context("Invalid settings from environment overrides")?;
        Ok(app)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(concurrency) = env.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(policy) = &env.policy {
            self.failure_policy = policy.clone();
        }
        if let Some(items) = env.items {
            self.items = items;
        }
        if let Some(fail_rate) = env.fail_rate {
            self.fail_rate = fail_rate;
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
    }
}
