//! Tests for retry with exponential backoff.

use std::time::Duration;

use availability_engine::retry::{with_retry, with_retry_if, BackoffPolicy, RetryError, Sleeper};

/// Records requested delays instead of sleeping.
#[derive(Default)]
struct RecordingSleeper {
    delays: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, delay: Duration) {
        self.delays.push(delay);
    }
}

#[derive(Debug, PartialEq)]
enum ApiError {
    RateLimited,
    BadRequest,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::RateLimited => f.write_str("429 Too Many Requests"),
            ApiError::BadRequest => f.write_str("400 Bad Request"),
        }
    }
}

fn policy(max_attempts: u32) -> BackoffPolicy {
    BackoffPolicy {
        max_attempts,
        initial_backoff_ms: 1000,
        max_backoff_ms: 30_000,
    }
}

#[test]
fn first_success_needs_no_sleep() {
    let mut sleeper = RecordingSleeper::default();
    let result: Result<&str, RetryError<ApiError>> =
        with_retry_if(&policy(5), &mut sleeper, |_| true, |_| Ok("done"));

    assert_eq!(result.unwrap(), "done");
    assert!(sleeper.delays.is_empty());
}

#[test]
fn succeeds_after_rate_limits_with_doubling_delays() {
    let mut sleeper = RecordingSleeper::default();
    let mut calls = Vec::new();

    let result = with_retry_if(
        &policy(5),
        &mut sleeper,
        |e: &ApiError| *e == ApiError::RateLimited,
        |attempt| {
            calls.push(attempt);
            if attempt < 4 {
                Err(ApiError::RateLimited)
            } else {
                Ok(attempt)
            }
        },
    );

    assert_eq!(result.unwrap(), 4);
    assert_eq!(calls, vec![1, 2, 3, 4]);
    assert_eq!(
        sleeper.delays,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
        ]
    );
}

#[test]
fn exhausting_attempts_returns_last_error() {
    let mut sleeper = RecordingSleeper::default();
    let result: Result<(), _> = with_retry_if(
        &policy(3),
        &mut sleeper,
        |_| true,
        |_| Err(ApiError::RateLimited),
    );

    let err = result.unwrap_err();
    assert_eq!(err.attempts(), 3);
    assert_eq!(err.to_string(), "gave up after 3 attempts: 429 Too Many Requests");
    assert_eq!(err.into_inner(), ApiError::RateLimited);
    // No sleep after the final attempt.
    assert_eq!(sleeper.delays.len(), 2);
}

#[test]
fn non_retryable_error_aborts_immediately() {
    let mut sleeper = RecordingSleeper::default();
    let mut calls = 0;
    let result: Result<(), _> = with_retry_if(
        &policy(5),
        &mut sleeper,
        |e: &ApiError| *e == ApiError::RateLimited,
        |_| {
            calls += 1;
            Err(ApiError::BadRequest)
        },
    );

    assert_eq!(
        result.unwrap_err(),
        RetryError::Aborted {
            attempt: 1,
            error: ApiError::BadRequest
        }
    );
    assert_eq!(calls, 1);
    assert!(sleeper.delays.is_empty());
}

#[test]
fn zero_attempts_still_calls_once() {
    let mut calls = 0;
    let result: Result<(), RetryError<ApiError>> = with_retry(&BackoffPolicy::immediate(0), |_| {
        calls += 1;
        Err(ApiError::RateLimited)
    });
    assert_eq!(result.unwrap_err().attempts(), 1);
    assert_eq!(calls, 1);
}

#[test]
fn delays_are_capped() {
    let p = BackoffPolicy {
        max_attempts: 10,
        initial_backoff_ms: 1000,
        max_backoff_ms: 5000,
    };
    assert_eq!(p.delay_after(1), Duration::from_millis(1000));
    assert_eq!(p.delay_after(3), Duration::from_millis(4000));
    assert_eq!(p.delay_after(4), Duration::from_millis(5000));
    assert_eq!(p.delay_after(200), Duration::from_millis(5000));
}

#[test]
fn default_policy_matches_documented_values() {
    let p = BackoffPolicy::default();
    assert_eq!(p.max_attempts, 5);
    assert_eq!(p.initial_backoff_ms, 1000);
}
