//! Pool Runner - bounded-concurrency async task execution
//!
//! Runs an asynchronous operation over a finite or streamed sequence of
//! items with at most N operations in flight, collecting successes and
//! failures separately. A failure handler can stop the pool early; work
//! already in flight always finishes and is recorded.
//!
//! ## Usage
//!
//! ```no_run
//! use pool_runner::{HandlerOutcome, Pool};
//!
//! # async fn example() -> Result<(), pool_runner::PoolError> {
//! let outcome = Pool::builder()
//!     .input_iter(vec![1u32, 2, 3])
//!     .operation(|n| async move {
//!         if n == 2 { Err(format!("bad item {n}")) } else { Ok(n * 10) }
//!     })
//!     .concurrency(2)
//!     .on_failure(|_err, _item| async { HandlerOutcome::Abort })
//!     .run()
//!     .await?;
//!
//! println!("{} ok, {} failed", outcome.results.len(), outcome.errors.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod demo;
pub mod executor;
pub mod models;
pub mod output;
pub mod results;
pub mod utils;

pub use executor::{
    run, Concurrency, FailurePolicy, HandlerOutcome, Pool, PoolBuilder, PoolError, PoolOutcome,
};
