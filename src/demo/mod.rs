//! Synthetic workload for exercising the pool
//!
//! A job plan is generated up front from a seed so that a run can be
//! reproduced: each job sleeps for its planned delay and then either
//! succeeds or fails.

mod job;

pub use job::{execute_job, DemoJob, JobError, JobOutput, JobPlan};
