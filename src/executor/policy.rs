//! Named failure policies
//!
//! Lets configuration files and the command line pick a failure handler
//! by name instead of supplying a closure.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::error::PoolError;
use super::outcome::HandlerOutcome;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep going
    #[default]
    Continue,
    /// Stop dispatching new items after the first failure
    Abort,
    /// Log the failure at warn level and keep going
    Log,
}

impl FailurePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            FailurePolicy::Continue => "continue",
            FailurePolicy::Abort => "abort",
            FailurePolicy::Log => "log",
        }
    }

    pub fn all() -> Vec<FailurePolicy> {
        vec![
            FailurePolicy::Continue,
            FailurePolicy::Abort,
            FailurePolicy::Log,
        ]
    }

    /// Decide what to do about one failed item
    pub fn decide(&self, error: &dyn fmt::Display) -> HandlerOutcome {
        match self {
            FailurePolicy::Continue => HandlerOutcome::Continue,
            FailurePolicy::Abort => HandlerOutcome::Abort,
            FailurePolicy::Log => {
                warn!("Item failed: {}", error);
                HandlerOutcome::Continue
            }
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" | "stop" | "fail-fast" => Ok(FailurePolicy::Abort),
            "log" => Ok(FailurePolicy::Log),
            _ => Err(PoolError::InvalidHandler(s.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
