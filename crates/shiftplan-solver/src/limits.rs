//! Search limits
//!
//! A wall-clock budget and an external interrupt flag. Solvers poll a
//! [`SearchBudget`] between units of work; neither limit is ever checked
//! mid-step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::SolverError;

/// Limits for one solve
#[derive(Clone, Debug, Default)]
pub struct SolveLimits {
    pub time_limit: Option<Duration>,
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl SolveLimits {
    /// No limits
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stop the search once `flag` is set
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }
}

/// Running clock against a set of limits
#[derive(Debug)]
pub struct SearchBudget<'a> {
    limits: &'a SolveLimits,
    started: Instant,
}

impl<'a> SearchBudget<'a> {
    pub fn start(limits: &'a SolveLimits) -> Self {
        Self {
            limits,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before the limit, `None` if unlimited
    pub fn remaining(&self) -> Option<Duration> {
        self.limits
            .time_limit
            .map(|limit| limit.saturating_sub(self.elapsed()))
    }

    pub fn is_interrupted(&self) -> bool {
        self.limits
            .interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn is_exhausted(&self) -> bool {
        self.check().is_err()
    }

    /// Error if either limit has been hit
    pub fn check(&self) -> Result<(), SolverError> {
        if self.is_interrupted() {
            return Err(SolverError::Interrupted);
        }
        match self.limits.time_limit {
            Some(limit) if self.elapsed() >= limit => Err(SolverError::LimitReached(limit)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_stops() {
        let limits = SolveLimits::unlimited();
        let budget = SearchBudget::start(&limits);
        assert!(budget.check().is_ok());
        assert_eq!(budget.remaining(), None);
    }

    #[test]
    fn zero_budget_is_immediately_exhausted() {
        let limits = SolveLimits::unlimited().with_time_limit(Duration::ZERO);
        let budget = SearchBudget::start(&limits);
        assert_eq!(budget.check(), Err(SolverError::LimitReached(Duration::ZERO)));
        assert_eq!(budget.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn interrupt_flag_stops() {
        let flag = Arc::new(AtomicBool::new(false));
        let limits = SolveLimits::unlimited().with_interrupt(Arc::clone(&flag));
        let budget = SearchBudget::start(&limits);
        assert!(!budget.is_exhausted());
        flag.store(true, Ordering::Relaxed);
        assert_eq!(budget.check(), Err(SolverError::Interrupted));
    }
}
