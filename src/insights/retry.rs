//! Exponential backoff with jitter for collaborator calls

use log::{debug, warn};
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    /// Fraction of each delay randomized in either direction, within `[0, 1]`
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(8),
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based), before jitter
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else if capped > 0.0 {
            self.max_delay
        } else {
            Duration::ZERO
        }
    }

    /// Backoff with jitter applied, never above `max_delay`
    pub fn delay_for(&self, retry: u32) -> Duration {
        let delay = self.backoff(retry);
        let jitter = self.jitter.clamp(0.0, 1.0);
        if jitter == 0.0 || delay.is_zero() {
            return delay;
        }

        let factor = 1.0 + rand::thread_rng().gen_range(-jitter..=jitter);
        delay.mul_f64(factor).min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error, or
    /// the retry budget is spent. The attempt number (0-based) is passed in.
    pub async fn run<T, E, F, Fut, R>(&self, mut operation: F, is_retryable: R) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 0;
        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("Succeeded after {} retries", attempt);
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    warn!(
                        "Attempt {} failed: {}. Retrying in {:?} ({}/{})",
                        attempt, e, delay, attempt, self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fixed_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_millis(1_000),
            jitter: 0.0,
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = fixed_policy(5);
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(5), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(60), Duration::from_millis(1_000));
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let policy = RetryPolicy {
            jitter: 0.5,
            ..fixed_policy(3)
        };

        for _ in 0..200 {
            let delay = policy.delay_for(2);
            assert!(delay >= Duration::from_millis(100), "too short: {:?}", delay);
            assert!(delay <= Duration::from_millis(300), "too long: {:?}", delay);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, String> = fixed_policy(3)
            .run(
                |_| {
                    let previous = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if previous < 2 {
                            Err("busy".to_string())
                        } else {
                            Ok("done")
                        }
                    }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = fixed_policy(2)
            .run(
                |attempt| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Err(format!("failure {}", attempt)) }
                },
                |_| true,
            )
            .await;

        assert_eq!(result, Err("failure 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_stops_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = fixed_policy(5)
            .run(
                |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err("unauthorized".to_string()) }
                },
                |e| e != "unauthorized",
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_between_attempts() {
        let start = tokio::time::Instant::now();
        let _: Result<(), String> = fixed_policy(2)
            .run(|_| async { Err("busy".to_string()) }, |_| true)
            .await;

        // 100ms + 200ms of backoff
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
