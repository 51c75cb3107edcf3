use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use tracing::info;

use crate::errors::NewRelicError;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Remembers when each named operation last went out and rejects repeats
/// inside the window. Advisory only: it guards this client instance, not the
/// account.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    last_calls: Mutex<HashMap<String, Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, operation: &str) -> Result<(), NewRelicError> {
        self.check_at(operation, Instant::now())
    }

    pub(crate) fn check_at(&self, operation: &str, now: Instant) -> Result<(), NewRelicError> {
        let mut last_calls = self
            .last_calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = last_calls.get(operation) {
            let elapsed = now.saturating_duration_since(*previous);
            if elapsed <= self.window {
                let retry_after_secs = self.window.as_secs().saturating_sub(elapsed.as_secs());
                info!(operation, retry_after_secs, "rate limit window still open");
                return Err(NewRelicError::RateLimited { retry_after_secs });
            }
        }

        last_calls.insert(operation.to_string(), now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_passes() {
        let limiter = RateLimiter::default();
        assert!(limiter.check("get_metric_names").is_ok());
    }

    #[test]
    fn call_inside_window_is_rejected_with_remaining_seconds() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("foobar", start).expect("first call");

        let err = limiter
            .check_at("foobar", start + Duration::from_secs(59))
            .expect_err("second call should be limited");
        assert!(matches!(err, NewRelicError::RateLimited { retry_after_secs: 1 }));
    }

    #[test]
    fn call_outside_window_passes_and_restarts_it() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("foobar", start).expect("first call");

        let later = start + Duration::from_secs(61);
        limiter.check_at("foobar", later).expect("window elapsed");

        let err = limiter
            .check_at("foobar", later + Duration::from_secs(10))
            .expect_err("new window should apply");
        assert!(matches!(err, NewRelicError::RateLimited { retry_after_secs: 50 }));
    }

    #[test]
    fn exactly_one_window_later_is_still_limited() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("foobar", start).expect("first call");

        let err = limiter
            .check_at("foobar", start + Duration::from_secs(60))
            .expect_err("boundary is inside the window");
        assert!(matches!(err, NewRelicError::RateLimited { retry_after_secs: 0 }));
    }

    #[test]
    fn operations_are_tracked_independently() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        limiter.check_at("get_metric_names", start).expect("first op");
        limiter
            .check_at("get_metric_data", start + Duration::from_secs(1))
            .expect("other op has its own window");
    }

    #[test]
    fn rejected_call_does_not_extend_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("foobar", start).expect("first call");
        let _ = limiter.check_at("foobar", start + Duration::from_secs(30));

        limiter
            .check_at("foobar", start + Duration::from_secs(61))
            .expect("window measured from the accepted call");
    }
}
