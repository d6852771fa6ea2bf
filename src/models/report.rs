//! Run report model
//!
//! Captures the outcome of one pool invocation in a form that can be
//! printed, serialized or exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::executor::PoolOutcome;

/// A failed item and the error it raised
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub item: String,
    pub error: String,
}

/// Summary of one pool invocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run ID
    pub id: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Worker count
    pub concurrency: usize,

    /// Failure policy name
    pub policy: String,

    /// Items pulled from the source
    pub consumed: usize,

    /// Successful results, in completion order
    pub results: Vec<String>,

    /// Failures, in completion order
    pub failures: Vec<FailureRecord>,

    /// Whether a failure handler stopped the run
    pub stopped_prematurely: bool,

    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    /// Build a report from a finished pool outcome
    pub fn from_outcome<T, R, E>(
        outcome: &PoolOutcome<T, R, E>,
        started_at: DateTime<Utc>,
        concurrency: usize,
        policy: impl Into<String>,
    ) -> Self
    where
        T: fmt::Display,
        R: fmt::Display,
        E: fmt::Display,
    {
        Self {
            id: generate_run_id(started_at),
            started_at,
            completed_at: Utc::now(),
            concurrency,
            policy: policy.into(),
            consumed: outcome.consumed,
            results: outcome.results.iter().map(ToString::to_string).collect(),
            failures: outcome
                .failures()
                .map(|(error, item)| FailureRecord {
                    item: item.to_string(),
                    error: error.to_string(),
                })
                .collect(),
            stopped_prematurely: outcome.stopped_prematurely,
            duration_ms: outcome.elapsed.as_millis() as u64,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Success rate in percent over recorded outcomes
    pub fn success_rate(&self) -> f64 {
        let total = self.succeeded() + self.failed();
        if total > 0 {
            (self.succeeded() as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Generate unique run ID
fn generate_run_id(started_at: DateTime<Utc>) -> String {
    let timestamp = started_at.format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}
