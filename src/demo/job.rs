//! Demo jobs
//!
//! Job definitions, seeded plan generation and the job operation.

use futures::stream::{self, Stream, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// One unit of synthetic work
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoJob {
    pub id: u32,
    pub delay_ms: u64,
    pub fail: bool,
}

impl fmt::Display for DemoJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.id)
    }
}

/// Output of a successful job
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutput {
    pub id: u32,
    pub delay_ms: u64,
}

impl fmt::Display for JobOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{} done in {}ms", self.id, self.delay_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("job-{id} failed after {delay_ms}ms")]
pub struct JobError {
    pub id: u32,
    pub delay_ms: u64,
}

/// Builder for a reproducible list of jobs
#[derive(Clone, Debug)]
pub struct JobPlan {
    items: u32,
    fail_rate: f64,
    max_delay_ms: u64,
    seed: Option<u64>,
}

impl JobPlan {
    pub fn new(items: u32) -> Self {
        Self {
            items,
            fail_rate: 0.0,
            max_delay_ms: 0,
            seed: None,
        }
    }

    /// Probability of a job failing, clamped to 0.0..=1.0
    pub fn fail_rate(mut self, rate: f64) -> Self {
        self.fail_rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self
    }

    pub fn max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Generate the jobs
    pub fn generate(&self) -> Vec<DemoJob> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        (1..=self.items)
            .map(|id| DemoJob {
                id,
                delay_ms: rng.random_range(0..=self.max_delay_ms),
                fail: rng.random_bool(self.fail_rate),
            })
            .collect()
    }

    /// Generate the jobs as a lazily produced stream
    ///
    /// Each job is released after a short pause, so workers wait on the
    /// source as well as on the jobs themselves.
    pub fn stream(&self) -> impl Stream<Item = DemoJob> + Send + 'static {
        stream::iter(self.generate()).then(|job| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            job
        })
    }
}

/// Run one job
pub async fn execute_job(job: DemoJob) -> Result<JobOutput, JobError> {
    debug!("Running {} ({}ms)", job, job.delay_ms);
    tokio::time::sleep(Duration::from_millis(job.delay_ms)).await;

    if job.fail {
        Err(JobError {
            id: job.id,
            delay_ms: job.delay_ms,
        })
    } else {
        Ok(JobOutput {
            id: job.id,
            delay_ms: job.delay_ms,
        })
    }
}
