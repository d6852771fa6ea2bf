//! Validated worker count

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use super::error::PoolError;

/// Number of workers a pool runs, always at least one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Concurrency(NonZeroUsize);

impl Concurrency {
    /// Worker count used when none is configured
    pub const DEFAULT: usize = 2;

    pub fn new(workers: usize) -> Option<Self> {
        NonZeroUsize::new(workers).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Concurrency {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(Self::DEFAULT - 1))
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NonZeroUsize> for Concurrency {
    fn from(n: NonZeroUsize) -> Self {
        Self(n)
    }
}

impl TryFrom<usize> for Concurrency {
    type Error = PoolError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n).ok_or_else(|| PoolError::InvalidConcurrency(n.to_string()))
    }
}

impl TryFrom<u32> for Concurrency {
    type Error = PoolError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| PoolError::InvalidConcurrency(n.to_string()))
    }
}

impl TryFrom<i32> for Concurrency {
    type Error = PoolError;

    fn try_from(n: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(n))
    }
}

impl TryFrom<i64> for Concurrency {
    type Error = PoolError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        usize::try_from(n)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| PoolError::InvalidConcurrency(n.to_string()))
    }
}

impl TryFrom<f64> for Concurrency {
    type Error = PoolError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if !n.is_finite() || n.fract() != 0.0 || n < 1.0 || n > usize::MAX as f64 {
            return Err(PoolError::InvalidConcurrency(n.to_string()));
        }
        Self::try_from(n as usize)
    }
}

impl TryFrom<&str> for Concurrency {
    type Error = PoolError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Concurrency {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| PoolError::InvalidConcurrency(s.to_string()))
    }
}
