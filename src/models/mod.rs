//! Data models for pool runs
//!
//! Serializable summaries of a pool invocation.

mod report;

pub use report::{FailureRecord, RunReport};
