//! Retry with exponential backoff, independent of any particular client.
//!
//! Calls to the hosted language model are rate limited; callers wrap the
//! request in [`with_retry`] or [`with_retry_if`] and get either the value or
//! a [`RetryError`] describing how the attempts ended.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backoff schedule for [`with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackoffPolicy {
    /// Total attempts including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each attempt after.
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay.
    pub max_backoff_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
        }
    }
}

impl BackoffPolicy {
    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63);
        let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

/// How the retry loop waits between attempts.
pub trait Sleeper {
    fn sleep(&mut self, delay: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Why a retried operation gave up.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    #[error("attempt {attempt} failed with a non-retryable error: {error}")]
    Aborted { attempt: u32, error: E },
}

impl<E> RetryError<E> {
    /// The error from the final attempt.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Aborted { error, .. } => error,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Aborted { attempt, .. } => *attempt,
        }
    }
}

/// Retry `operation` on any error, sleeping on the current thread.
///
/// `operation` receives the 1-based attempt number.
pub fn with_retry<T, E, F>(policy: &BackoffPolicy, operation: F) -> Result<T, RetryError<E>>
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    with_retry_if(policy, &mut ThreadSleeper, |_| true, operation)
}

/// Retry `operation` while `should_retry` accepts the error.
pub fn with_retry_if<T, E, F, P, S>(
    policy: &BackoffPolicy,
    sleeper: &mut S,
    should_retry: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
    P: Fn(&E) -> bool,
    S: Sleeper + ?Sized,
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match operation(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if !should_retry(&err) => {
                return Err(RetryError::Aborted {
                    attempt,
                    error: err,
                })
            }
            Err(err) if attempt >= attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: err,
                })
            }
            Err(err) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying"
                );
                sleeper.sleep(delay);
                attempt += 1;
            }
        }
    }
}
