//! Pool execution engine
//!
//! Runs an asynchronous operation over a sequence of items with bounded
//! concurrency and cooperative early termination.

mod concurrency;
mod error;
mod outcome;
mod policy;
mod pool;

pub use concurrency::Concurrency;
pub use error::{PoolError, Result};
pub use outcome::{HandlerOutcome, PoolOutcome};
pub use policy::FailurePolicy;
pub use pool::{run, Pool, PoolBuilder};
