//! Circuit breaker for provider rate limiting and IP bans.
//!
//! HTTP 403 trips the breaker immediately; repeated 429/5xx responses trip it
//! after `failure_threshold` consecutive failures. While open, every request is
//! refused until the cooldown has elapsed.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open { tripped_at: Instant },
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
}

/// Shared across providers that hit the same upstream.
#[derive(Debug)]
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// 30-minute cooldown, trips after 3 consecutive failures.
    pub fn default_provider() -> Self {
        Self::new(Duration::from_secs(30 * 60), 3)
    }

    // The guarded data is two plain fields; a panic elsewhere cannot leave it
    // half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if requests are allowed, closing the breaker once the cooldown expires.
    pub fn is_allowed(&self) -> bool {
        let mut inner = self.lock();
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open { tripped_at } if tripped_at.elapsed() >= self.cooldown => {
                inner.state = BreakerState::Closed;
                inner.consecutive_failures = 0;
                tracing::info!("circuit breaker cooldown elapsed, closing");
                true
            }
            BreakerState::Open { .. } => false,
        }
    }

    pub fn record_success(&self) {
        self.lock().consecutive_failures = 0;
    }

    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold {
            tracing::warn!(
                failures = inner.consecutive_failures,
                "circuit breaker tripped after repeated failures"
            );
            inner.state = BreakerState::Open {
                tripped_at: Instant::now(),
            };
        }
    }

    /// Trip immediately (403 Forbidden / IP ban).
    pub fn trip(&self) {
        tracing::warn!("circuit breaker tripped");
        self.lock().state = BreakerState::Open {
            tripped_at: Instant::now(),
        };
    }

    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// Remaining cooldown (zero when closed).
    pub fn remaining_cooldown(&self) -> Duration {
        match self.lock().state {
            BreakerState::Closed => Duration::ZERO,
            BreakerState::Open { tripped_at } => {
                self.cooldown.saturating_sub(tripped_at.elapsed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        assert!(cb.is_allowed());
        assert_eq!(cb.remaining_cooldown(), Duration::ZERO);
    }

    #[test]
    fn trips_after_threshold_failures() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        cb.record_failure();
        cb.record_failure();
        assert!(cb.is_allowed());
        cb.record_failure();
        assert!(!cb.is_allowed());
        assert!(cb.remaining_cooldown() > Duration::ZERO);
    }

    #[test]
    fn success_resets_the_count() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 2);
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        assert!(cb.is_allowed());
    }

    #[test]
    fn immediate_trip_and_recovery() {
        let cb = CircuitBreaker::new(Duration::ZERO, 3);
        cb.trip();
        assert!(matches!(cb.state(), BreakerState::Open { .. }));
        // zero cooldown: the next check closes it again
        assert!(cb.is_allowed());
        assert_eq!(cb.state(), BreakerState::Closed);
    }
}
