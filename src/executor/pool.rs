//! Bounded-concurrency pool runner
//!
//! A fixed number of workers pull items from one shared cursor, run the
//! caller's operation on each, and record successes and failures
//! separately. A failure handler may abort the pool, which stops new
//! dispatch but never preempts operations already in flight.
//!
//! Validation happens in [`PoolBuilder::run`] before any worker is spawned
//! or the source is polled. A panic inside the operation or the failure
//! handler fails that worker and stops dispatch like an abort; the call
//! waits for the operations still in flight and then returns
//! [`PoolError::WorkerPanicked`].
//!
//! There is no timeout: an operation or handler that never completes keeps
//! the whole call from completing.

use futures::future::{join_all, BoxFuture};
use futures::stream::{self, BoxStream, Fuse, Stream, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::concurrency::Concurrency;
use super::error::{PoolError, Result};
use super::outcome::{HandlerOutcome, PoolOutcome};
use super::policy::FailurePolicy;
use crate::utils::Timer;

type Operation<T, R, E> =
    Arc<dyn Fn(T) -> BoxFuture<'static, std::result::Result<R, E>> + Send + Sync>;
type FailureHandler<T, E> =
    Arc<dyn Fn(&E, &T) -> BoxFuture<'static, HandlerOutcome> + Send + Sync>;

/// Entry point for configuring a pool run
pub struct Pool;

impl Pool {
    pub fn builder<T, R, E>() -> PoolBuilder<T, R, E>
    where
        T: Clone + Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
    {
        PoolBuilder::new()
    }
}

/// Builder for one pool invocation
///
/// Setters never fail; the first invalid argument is reported by
/// [`run`](PoolBuilder::run).
pub struct PoolBuilder<T, R, E> {
    input: Option<BoxStream<'static, T>>,
    operation: Option<Operation<T, R, E>>,
    concurrency: Result<Concurrency>,
    on_failure: Option<FailureHandler<T, E>>,
    handler_error: Option<PoolError>,
}

impl<T, R, E> Default for PoolBuilder<T, R, E>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R, E> PoolBuilder<T, R, E>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            input: None,
            operation: None,
            concurrency: Ok(Concurrency::default()),
            on_failure: None,
            handler_error: None,
        }
    }

    /// Use an asynchronous stream as the input source
    pub fn input<S>(mut self, source: S) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        self.input = Some(source.boxed());
        self
    }

    /// Use a synchronous iterator as the input source
    pub fn input_iter<I>(self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        self.input(stream::iter(items))
    }

    /// Set the per-item operation
    pub fn operation<F, Fut>(mut self, operation: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        self.operation = Some(Arc::new(move |item: T| operation(item).boxed()));
        self
    }

    /// Set the number of workers (default 2)
    pub fn concurrency<C>(mut self, concurrency: C) -> Self
    where
        C: TryInto<Concurrency>,
        C::Error: Into<PoolError>,
    {
        self.concurrency = concurrency.try_into().map_err(Into::into);
        self
    }

    /// Set the failure handler
    ///
    /// Called once per failed item, after the failure is recorded. The
    /// worker that hit the failure waits for the returned future before
    /// pulling its next item. Returning [`HandlerOutcome::Abort`] stops
    /// the pool.
    pub fn on_failure<H, Fut>(mut self, handler: H) -> Self
    where
        H: Fn(&E, &T) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Into<HandlerOutcome>,
    {
        self.on_failure = Some(Arc::new(move |error: &E, item: &T| {
            let verdict = handler(error, item);
            async move {
                let outcome: HandlerOutcome = verdict.await.into();
                outcome
            }
            .boxed()
        }));
        self.handler_error = None;
        self
    }

    /// Run the pool to completion
    pub async fn run(self) -> Result<PoolOutcome<T, R, E>> {
        let input = self.input.ok_or(PoolError::MissingInput)?;
        let operation = self.operation.ok_or(PoolError::MissingOperation)?;
        let concurrency = self.concurrency?;
        if let Some(err) = self.handler_error {
            return Err(err);
        }

        execute(input, operation, concurrency, self.on_failure).await
    }
}

impl<T, R, E> PoolBuilder<T, R, E>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    /// Set the failure handler from a named [`FailurePolicy`]
    pub fn failure_policy(self, name: &str) -> Self {
        match name.parse::<FailurePolicy>() {
            Ok(policy) => self.policy(policy),
            Err(err) => {
                let mut builder = self;
                builder.on_failure = None;
                builder.handler_error = Some(err);
                builder
            }
        }
    }

    /// Set the failure handler to a [`FailurePolicy`]
    pub fn policy(self, policy: FailurePolicy) -> Self {
        self.on_failure(move |error: &E, _item: &T| {
            let outcome = policy.decide(error);
            async move { outcome }
        })
    }
}

/// Run `operation` over `items` with `concurrency` workers and no failure handler
pub async fn run<I, T, R, E, F, Fut>(
    items: I,
    operation: F,
    concurrency: usize,
) -> Result<PoolOutcome<T, R, E>>
where
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
    T: Clone + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
{
    Pool::builder()
        .input_iter(items)
        .operation(operation)
        .concurrency(concurrency)
        .run()
        .await
}

/// Shared cursor over the input source
struct Cursor<T> {
    source: Fuse<BoxStream<'static, T>>,
    consumed: usize,
}

struct Accumulator<T, R, E> {
    results: Vec<R>,
    errors: Vec<E>,
    failed_items: Vec<T>,
    suppressed: usize,
}

impl<T, R, E> Default for Accumulator<T, R, E> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
            failed_items: Vec::new(),
            suppressed: 0,
        }
    }
}

/// State shared by all workers of one invocation
struct Shared<T, R, E> {
    cursor: tokio::sync::Mutex<Cursor<T>>,
    aborted: AtomicBool,
    accumulator: Mutex<Accumulator<T, R, E>>,
    operation: Operation<T, R, E>,
    on_failure: Option<FailureHandler<T, E>>,
}

impl<T, R, E> Shared<T, R, E> {
    fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    /// Pull the next item unless the pool was aborted or the source is done
    ///
    /// The abort flag is read while holding the cursor lock, both before
    /// polling the source and after it yields. An item that arrives once
    /// the flag is set counts as consumed but is never started.
    async fn next_item(&self) -> Option<T> {
        let mut cursor = self.cursor.lock().await;
        if self.is_aborted() {
            return None;
        }
        let item = cursor.source.next().await?;
        cursor.consumed += 1;
        if self.is_aborted() {
            debug!("Dropping item pulled after abort");
            return None;
        }
        Some(item)
    }

    fn accumulator(&self) -> MutexGuard<'_, Accumulator<T, R, E>> {
        self.accumulator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_success(&self, result: R) {
        let mut acc = self.accumulator();
        if self.is_aborted() {
            acc.suppressed += 1;
        } else {
            acc.results.push(result);
        }
    }

    fn record_failure(&self, error: E, item: T) {
        let mut acc = self.accumulator();
        acc.errors.push(error);
        acc.failed_items.push(item);
    }
}

async fn execute<T, R, E>(
    input: BoxStream<'static, T>,
    operation: Operation<T, R, E>,
    concurrency: Concurrency,
    on_failure: Option<FailureHandler<T, E>>,
) -> Result<PoolOutcome<T, R, E>>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    let timer = Timer::start("pool run");

    // No point spawning more workers than the source can ever yield.
    let workers = match input.size_hint() {
        (_, Some(upper)) => concurrency.get().min(upper),
        (_, None) => concurrency.get(),
    };

    info!(
        "Starting pool with {} workers (max {} concurrent)",
        workers, concurrency
    );

    let shared = Arc::new(Shared {
        cursor: tokio::sync::Mutex::new(Cursor {
            source: input.fuse(),
            consumed: 0,
        }),
        aborted: AtomicBool::new(false),
        accumulator: Mutex::new(Accumulator::default()),
        operation,
        on_failure,
    });

    let handles: Vec<_> = (0..workers)
        .map(|id| {
            let shared = shared.clone();
            tokio::spawn(async move {
                let outcome = AssertUnwindSafe(worker_loop(id, shared.clone()))
                    .catch_unwind()
                    .await;
                // A panicking worker stops dispatch for everyone else.
                if outcome.is_err() {
                    shared.abort();
                }
                outcome
            })
        })
        .collect();

    // Every worker is joined, including after an abort, so in-flight
    // outcomes are recorded before the result is built.
    let joined = join_all(handles).await;

    let mut failure = None;
    for (worker, result) in joined.into_iter().enumerate() {
        let message = match result {
            Ok(Ok(())) => continue,
            Ok(Err(payload)) => panic_message(payload),
            Err(err) if err.is_panic() => panic_message(err.into_panic()),
            Err(err) => err.to_string(),
        };
        warn!("Worker {} failed: {}", worker, message);
        if failure.is_none() {
            failure = Some(PoolError::WorkerPanicked { worker, message });
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }

    let consumed = shared.cursor.lock().await.consumed;
    let acc = std::mem::take(&mut *shared.accumulator());
    let stopped_prematurely = shared.is_aborted();
    let elapsed = timer.stop();

    if acc.suppressed > 0 {
        debug!(
            "Suppressed {} results that completed after abort",
            acc.suppressed
        );
    }

    info!(
        "Pool completed in {}ms - consumed: {}, succeeded: {}, failed: {}{}",
        elapsed.as_millis(),
        consumed,
        acc.results.len(),
        acc.errors.len(),
        if stopped_prematurely { " (aborted)" } else { "" }
    );

    Ok(PoolOutcome {
        results: acc.results,
        errors: acc.errors,
        failed_items: acc.failed_items,
        stopped_prematurely,
        consumed,
        elapsed,
    })
}

async fn worker_loop<T, R, E>(id: usize, shared: Arc<Shared<T, R, E>>)
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    debug!("Worker {} started", id);
    let mut handled = 0usize;

    while let Some(item) = shared.next_item().await {
        handled += 1;

        match (shared.operation)(item.clone()).await {
            Ok(result) => shared.record_success(result),
            Err(error) => {
                let verdict = shared
                    .on_failure
                    .as_ref()
                    .map(|handler| handler(&error, &item));

                shared.record_failure(error, item);

                if let Some(verdict) = verdict {
                    if verdict.await.is_abort() && !shared.is_aborted() {
                        warn!("Worker {} aborting pool after failure", id);
                        shared.abort();
                    }
                }
            }
        }
    }

    debug!("Worker {} finished after {} items", id, handled);
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time::sleep;

    #[derive(Clone, Debug, PartialEq)]
    enum Value {
        Number(i64),
        Text(&'static str),
    }

    #[tokio::test]
    async fn test_completeness_without_abort() {
        let outcome = Pool::builder()
            .input_iter(0..50u32)
            .operation(|n| async move {
                if n % 7 == 0 {
                    Err(anyhow!("multiple of seven: {n}"))
                } else {
                    Ok(n * 2)
                }
            })
            .concurrency(3)
            .run()
            .await
            .unwrap();

        assert_eq!(outcome.results.len() + outcome.errors.len(), 50);
        assert_eq!(outcome.failed_items.len(), outcome.errors.len());
        assert_eq!(outcome.errors.len(), 8);
        assert_eq!(outcome.consumed, 50);
        assert!(!outcome.stopped_prematurely);
    }

    #[tokio::test]
    async fn test_concurrency_bound() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outcome = {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            Pool::builder()
                .input_iter(0..20u32)
                .operation(move |n| {
                    let in_flight = in_flight.clone();
                    let peak = peak.clone();
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        sleep(Duration::from_millis(5)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, anyhow::Error>(n)
                    }
                })
                .concurrency(4)
                .run()
                .await
                .unwrap()
        };

        assert_eq!(outcome.results.len(), 20);
        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 4, "observed {peak} concurrent operations");
        assert!(peak >= 1);
    }

    #[tokio::test]
    async fn test_stream_input() {
        let source = stream::unfold(vec!["b", "a"], |mut pending| async move {
            tokio::task::yield_now().await;
            pending.pop().map(|item| (item, pending))
        });

        let outcome = Pool::builder()
            .input(source)
            .operation(|s: &'static str| async move { Ok::<_, anyhow::Error>(s.to_uppercase()) })
            .run()
            .await
            .unwrap();

        let mut results = outcome.results;
        results.sort();
        assert_eq!(results, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_error_capture() {
        let outcome = Pool::builder()
            .input_iter(vec![
                Value::Number(1),
                Value::Text("error"),
                Value::Number(3),
            ])
            .operation(|value| async move {
                match value {
                    Value::Text(_) => Err(anyhow!("Boom")),
                    Value::Number(n) => Ok(n),
                }
            })
            .run()
            .await
            .unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].to_string(), "Boom");
        assert_eq!(outcome.failed_items, vec![Value::Text("error")]);
    }

    #[tokio::test]
    async fn test_abort_on_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = {
            let calls = calls.clone();
            Pool::builder()
                .input_iter(vec![1, 2, 3])
                .operation(move |_n: i32| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Err::<(), _>(anyhow!("always fails")) }
                })
                .concurrency(1)
                .on_failure(|_err, _item| async { HandlerOutcome::Abort })
                .run()
                .await
                .unwrap()
        };

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outcome.stopped_prematurely);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.failed_items, vec![1]);
        assert_eq!(outcome.consumed, 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let outcome = run(Vec::<u32>::new(), |n| async move { Ok::<_, String>(n) }, 2)
            .await
            .unwrap();

        assert!(outcome.results.is_empty());
        assert!(outcome.errors.is_empty());
        assert!(outcome.failed_items.is_empty());
        assert!(!outcome.stopped_prematurely);
        assert_eq!(outcome.consumed, 0);
    }

    #[tokio::test]
    async fn test_async_handler_completes_before_return() {
        let flag = Arc::new(AtomicBool::new(false));

        let outcome = {
            let flag = flag.clone();
            Pool::builder()
                .input_iter(vec![1u8])
                .operation(|_n| async { Err::<(), _>("nope") })
                .on_failure(move |_err, _item| {
                    let flag = flag.clone();
                    async move {
                        sleep(Duration::from_millis(20)).await;
                        flag.store(true, Ordering::SeqCst);
                    }
                })
                .run()
                .await
                .unwrap()
        };

        assert!(flag.load(Ordering::SeqCst));
        assert!(!outcome.stopped_prematurely);
        assert_eq!(outcome.errors, vec!["nope"]);
    }

    fn counting_source(pulled: Arc<AtomicUsize>) -> impl Stream<Item = u32> + Send + 'static {
        stream::iter(0..10u32).inspect(move |_| {
            pulled.fetch_add(1, Ordering::SeqCst);
        })
    }

    async fn echo(n: u32) -> std::result::Result<u32, String> {
        Ok(n)
    }

    #[tokio::test]
    async fn test_validation_rejects_before_any_work() {
        let pulled = Arc::new(AtomicUsize::new(0));

        let missing_input = Pool::builder::<u32, u32, String>()
            .operation(echo)
            .run()
            .await;
        assert_eq!(missing_input.unwrap_err(), PoolError::MissingInput);

        let missing_operation = Pool::builder::<u32, u32, String>()
            .input(counting_source(pulled.clone()))
            .run()
            .await;
        assert_eq!(missing_operation.unwrap_err(), PoolError::MissingOperation);

        for bad in ["0", "-1", "abc"] {
            let err = Pool::builder()
                .input(counting_source(pulled.clone()))
                .operation(echo)
                .concurrency(bad)
                .run()
                .await
                .unwrap_err();
            assert_eq!(err, PoolError::InvalidConcurrency(bad.to_string()));
        }

        let zero = Pool::builder()
            .input(counting_source(pulled.clone()))
            .operation(echo)
            .concurrency(0)
            .run()
            .await;
        assert!(matches!(zero, Err(PoolError::InvalidConcurrency(_))));

        let bad_handler = Pool::builder()
            .input(counting_source(pulled.clone()))
            .operation(echo)
            .failure_policy("explode")
            .run()
            .await;
        assert_eq!(
            bad_handler.unwrap_err().to_string(),
            "failure handler 'explode' is not a known policy"
        );

        assert_eq!(pulled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_in_flight_failures_recorded_after_abort() {
        let outcome = Pool::builder()
            .input_iter(vec![30u64, 0, 0, 0])
            .operation(|delay| async move {
                sleep(Duration::from_millis(delay)).await;
                Err::<(), _>(format!("failed after {delay}ms"))
            })
            .concurrency(2)
            .on_failure(|_err, item: &u64| {
                let outcome = if *item == 0 {
                    HandlerOutcome::Abort
                } else {
                    HandlerOutcome::Continue
                };
                async move { outcome }
            })
            .run()
            .await
            .unwrap();

        assert!(outcome.stopped_prematurely);
        assert_eq!(outcome.consumed, 2);
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.failed_items, vec![0, 30]);
    }

    #[tokio::test]
    async fn test_results_after_abort_are_suppressed() {
        let outcome = Pool::builder()
            .input_iter(vec![Value::Number(30), Value::Text("fail"), Value::Number(1)])
            .operation(|value| async move {
                match value {
                    Value::Number(ms) => {
                        sleep(Duration::from_millis(ms as u64)).await;
                        Ok(ms)
                    }
                    Value::Text(msg) => Err(msg),
                }
            })
            .concurrency(2)
            .policy(FailurePolicy::Abort)
            .run()
            .await
            .unwrap();

        assert!(outcome.stopped_prematurely);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.errors, vec!["fail"]);
        assert_eq!(outcome.consumed, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_item_dispatched_once() {
        let outcome = Pool::builder()
            .input_iter(0..200u32)
            .operation(|n| async move {
                tokio::task::yield_now().await;
                Ok::<_, String>(n)
            })
            .concurrency(8)
            .run()
            .await
            .unwrap();

        let mut results = outcome.results;
        results.sort_unstable();
        assert_eq!(results, (0..200).collect::<Vec<_>>());
        assert_eq!(outcome.consumed, 200);
    }

    #[tokio::test]
    async fn test_handler_called_once_per_failure() {
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = {
            let calls = calls.clone();
            Pool::builder()
                .input_iter(1..=12u32)
                .operation(|n| async move {
                    if n % 3 == 0 {
                        Err(format!("{n} is divisible by three"))
                    } else {
                        Ok(n)
                    }
                })
                .concurrency(4)
                .on_failure(move |err: &String, item: &u32| {
                    assert!(err.starts_with(&item.to_string()));
                    calls.fetch_add(1, Ordering::SeqCst);
                    async {}
                })
                .run()
                .await
                .unwrap()
        };

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(outcome.errors.len(), 4);
        assert!(!outcome.stopped_prematurely);
    }

    #[tokio::test]
    async fn test_panicking_handler_fails_call() {
        let result = Pool::builder()
            .input_iter(vec![1u32, 2, 3])
            .operation(|_n| async { Err::<(), _>("bad") })
            .concurrency(1)
            .on_failure(|_err, _item| async {
                panic!("handler exploded") as ()
            })
            .run()
            .await;

        match result {
            Err(PoolError::WorkerPanicked { worker, message }) => {
                assert_eq!(worker, 0);
                assert_eq!(message, "handler exploded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_item_started_after_abort_with_slow_source() {
        let started = Arc::new(AtomicUsize::new(0));

        let source = stream::iter(vec![1u32, 2, 3]).then(|n| async move {
            if n > 1 {
                sleep(Duration::from_millis(50)).await;
            }
            n
        });

        let outcome = {
            let started = started.clone();
            Pool::builder()
                .input(source)
                .operation(move |n| {
                    started.fetch_add(1, Ordering::SeqCst);
                    async move {
                        sleep(Duration::from_millis(10)).await;
                        Err::<(), _>(format!("item {n} failed"))
                    }
                })
                .concurrency(2)
                .on_failure(|_err, _item| async { HandlerOutcome::Abort })
                .run()
                .await
                .unwrap()
        };

        // Item 2 arrives after the abort; it is consumed but never started.
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.consumed, 2);
        assert_eq!(outcome.failed_items, vec![1]);
        assert!(outcome.stopped_prematurely);
    }

    #[tokio::test]
    async fn test_worker_panic_stops_dispatch() {
        let invoked = Arc::new(AtomicUsize::new(0));

        let pending = {
            let invoked = invoked.clone();
            Pool::builder()
                .input_iter(0..2000u32)
                .operation(move |_n| {
                    invoked.fetch_add(1, Ordering::SeqCst);
                    async {
                        sleep(Duration::from_millis(1)).await;
                        Err::<(), _>("failed")
                    }
                })
                .concurrency(2)
                .on_failure(|_err, item: &u32| {
                    if *item == 0 {
                        panic!("handler exploded on first item");
                    }
                    async {}
                })
                .run()
        };

        let result = tokio::time::timeout(Duration::from_millis(500), pending)
            .await
            .expect("pool kept dispatching after a worker panicked");

        match result {
            Err(PoolError::WorkerPanicked { message, .. }) => {
                assert_eq!(message, "handler exploded on first item");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(invoked.load(Ordering::SeqCst) < 10);
    }

    #[test]
    fn test_run_from_blocking_context() {
        let outcome = tokio_test::block_on(run(
            vec![1, 2, 3],
            |n: i32| async move { Ok::<_, String>(n + 1) },
            2,
        ))
        .unwrap();

        let mut results = outcome.results;
        results.sort();
        assert_eq!(results, vec![2, 3, 4]);
    }
}
