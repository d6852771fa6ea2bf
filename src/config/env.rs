//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "POOL_RUNNER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Worker count from POOL_RUNNER_CONCURRENCY
    pub concurrency: Option<usize>,
    /// Failure policy from POOL_RUNNER_POLICY
    pub policy: Option<String>,
    /// Demo job count from POOL_RUNNER_ITEMS
    pub items: Option<u32>,
    /// Demo failure probability from POOL_RUNNER_FAIL_RATE
    pub fail_rate: Option<f64>,
    /// Output format from POOL_RUNNER_FORMAT
    pub format: Option<String>,
    /// Config file from POOL_RUNNER_CONFIG
    pub config_file: Option<String>,
    /// Verbose from POOL_RUNNER_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            concurrency: get_env_parse("CONCURRENCY"),
            policy: get_env("POLICY"),
            items: get_env_parse("ITEMS"),
            fail_rate: get_env_parse("FAIL_RATE"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.concurrency.is_some()
            || self.policy.is_some()
            || self.items.is_some()
            || self.fail_rate.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_CONCURRENCY: {:?}", ENV_PREFIX, self.concurrency);
        println!("  {}_POLICY:      {:?}", ENV_PREFIX, self.policy);
        println!("  {}_ITEMS:       {:?}", ENV_PREFIX, self.items);
        println!("  {}_FAIL_RATE:   {:?}", ENV_PREFIX, self.fail_rate);
        println!("  {}_FORMAT:      {:?}", ENV_PREFIX, self.format);
        println!("  {}_CONFIG:      {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_VERBOSE:     {:?}", ENV_PREFIX, self.verbose);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all POOL_RUNNER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_CONCURRENCY  Number of concurrent workers");
    println!("  {ENV_PREFIX}_POLICY       Failure policy (continue, abort, log)");
    println!("  {ENV_PREFIX}_ITEMS        Number of demo jobs");
    println!("  {ENV_PREFIX}_FAIL_RATE    Demo job failure probability (0.0-1.0)");
    println!("  {ENV_PREFIX}_FORMAT       Output format (table, json, csv, summary)");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE      Enable verbose output (true/false)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_CONCURRENCY=8");
    println!("  export {ENV_PREFIX}_POLICY=abort");
    println!("  pool-runner run --items 100");
}
