//! Pool outcome types

use std::time::Duration;

/// Verdict returned by a failure handler
///
/// `Abort` stops dispatch of new items; operations already in flight run
/// to completion. Handlers returning `()` are treated as `Continue`.
/// Nothing else converts into a verdict:
///
/// ```compile_fail
/// let _: pool_runner::HandlerOutcome = true.into();
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HandlerOutcome {
    #[default]
    Continue,
    Abort,
}

impl HandlerOutcome {
    pub fn is_abort(self) -> bool {
        self == HandlerOutcome::Abort
    }
}

impl From<()> for HandlerOutcome {
    fn from(_: ()) -> Self {
        HandlerOutcome::Continue
    }
}

/// Everything a pool invocation produced
///
/// The three sequences are in completion order, not input order.
/// `errors[i]` was raised by `failed_items[i]`.
#[derive(Clone, Debug)]
pub struct PoolOutcome<T, R, E> {
    /// Successful results
    pub results: Vec<R>,

    /// One error per failed item
    pub errors: Vec<E>,

    /// Items whose operation failed
    pub failed_items: Vec<T>,

    /// Whether the run ended through a handler abort rather than exhaustion
    pub stopped_prematurely: bool,

    /// Items pulled from the input source
    pub consumed: usize,

    /// Wall time of the invocation
    pub elapsed: Duration,
}

impl<T, R, E> Default for PoolOutcome<T, R, E> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
            failed_items: Vec::new(),
            stopped_prematurely: false,
            consumed: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl<T, R, E> PoolOutcome<T, R, E> {
    /// Items whose outcome was recorded
    pub fn processed(&self) -> usize {
        self.results.len() + self.errors.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Pairs of (error, failed item) in completion order
    pub fn failures(&self) -> impl Iterator<Item = (&E, &T)> {
        self.errors.iter().zip(self.failed_items.iter())
    }

    /// Success rate in percent over recorded outcomes
    pub fn success_rate(&self) -> f64 {
        let processed = self.processed();
        if processed == 0 {
            0.0
        } else {
            (self.results.len() as f64 / processed as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_outcome_conversions() {
        assert_eq!(HandlerOutcome::from(()), HandlerOutcome::Continue);
        assert!(HandlerOutcome::Abort.is_abort());
        assert!(!HandlerOutcome::default().is_abort());
    }

    #[test]
    fn test_outcome_counts() {
        let outcome: PoolOutcome<u32, u32, String> = PoolOutcome {
            results: vec![1, 2, 3],
            errors: vec!["bad".to_string()],
            failed_items: vec![4],
            consumed: 4,
            ..Default::default()
        };

        assert_eq!(outcome.processed(), 4);
        assert!(outcome.has_failures());
        assert_eq!(outcome.success_rate(), 75.0);
        assert_eq!(
            outcome.failures().collect::<Vec<_>>(),
            vec![(&"bad".to_string(), &4)]
        );
    }
}
