// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry with exponential backoff and jitter for a single remote call.
//!
//! The executor knows nothing about operations or conflicts. It runs a
//! zero-argument async call, asks the policy whether a failure is worth
//! retrying, and waits between attempts:
//!
//! ```text
//! delay(n) = min(max_retry_delay, retry_delay * multiplier^(n-1)) * (1 ± jitter)
//! ```
//!
//! Waits race a [`CancellationToken`] so a connectivity drop abandons the
//! retry instead of backing off into a dead network.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Status codes retried by the default policy.
pub const RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Authentication failures belong to the token-refresh path and are never retried.
pub const UNAUTHORIZED: u16 = 401;

/// How a failed call failed, as far as retrying is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// No response reached us.
    Network,
    /// The remote answered with a status code.
    Status(u16),
    /// A failure no retry can fix (e.g. a version conflict).
    Fatal,
}

/// Errors the executor can reason about.
pub trait Classify {
    fn classify(&self) -> FailureClass;
}

/// Backoff configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt (`retries + 1` attempts in total).
    pub retries: u32,
    /// Delay before the first retry.
    pub retry_delay: Duration,
    /// Growth factor between consecutive retries.
    pub retry_delay_multiplier: f64,
    /// Cap on the nominal delay.
    pub max_retry_delay: Duration,
    /// Fraction (0–1) by which a delay is randomly perturbed either way.
    pub retry_delay_jitter: f64,
    /// Retry 4xx responses other than 401 and the always-retried codes.
    pub retry_on_4xx: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            retries: 3,
            retry_delay: Duration::from_millis(1000),
            retry_delay_multiplier: 2.0,
            max_retry_delay: Duration::from_millis(30_000),
            retry_delay_jitter: 0.1,
            retry_on_4xx: false,
        }
    }
}

impl RetryConfig {
    /// Nominal delay before retry `retry` (starting at 1), without jitter.
    pub fn nominal_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.retry_delay.as_secs_f64() * self.retry_delay_multiplier.powi(exponent);
        let capped = secs.min(self.max_retry_delay.as_secs_f64()).max(0.0);
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_retry_delay)
    }

    /// Delay before retry `retry`, perturbed by up to `±retry_delay_jitter`.
    pub fn jittered_delay<R: Rng + ?Sized>(&self, retry: u32, rng: &mut R) -> Duration {
        let nominal = self.nominal_delay(retry);
        let jitter = self.retry_delay_jitter.min(1.0);
        if jitter.is_nan() || jitter <= 0.0 {
            return nominal;
        }
        let factor = 1.0 + rng.gen_range(-jitter..=jitter);
        Duration::try_from_secs_f64(nominal.as_secs_f64() * factor).unwrap_or(nominal)
    }

    /// The default retry predicate.
    pub fn is_retryable(&self, class: FailureClass) -> bool {
        match class {
            FailureClass::Network => true,
            FailureClass::Status(UNAUTHORIZED) => false,
            FailureClass::Status(code) if RETRYABLE_STATUS_CODES.contains(&code) => true,
            FailureClass::Status(code) if (400..500).contains(&code) => self.retry_on_4xx,
            FailureClass::Status(_) | FailureClass::Fatal => false,
        }
    }
}

/// Custom retry predicate: `(error, attempt) -> retry?`.
pub type RetryCondition<E> = Arc<dyn Fn(&E, u32) -> bool + Send + Sync>;

/// Observer called before each wait with `(retry number, delay)`.
pub type RetryObserver = Arc<dyn Fn(u32, Duration) + Send + Sync>;

/// Final failure of an executed call. The inner error is returned unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every allowed attempt failed with a retryable error.
    #[error("{error} (gave up after {attempts} attempts)")]
    Exhausted { error: E, attempts: u32 },

    /// The policy declined to retry this error.
    #[error("{error}")]
    Rejected { error: E, attempts: u32 },

    /// The wait before the next attempt was cancelled.
    #[error("{error} (retry cancelled after {attempts} attempts)")]
    Cancelled { error: E, attempts: u32 },
}

impl<E> RetryError<E> {
    /// Number of calls made.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. }
            | RetryError::Rejected { attempts, .. }
            | RetryError::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// The last error the call returned.
    pub fn error(&self) -> &E {
        match self {
            RetryError::Exhausted { error, .. }
            | RetryError::Rejected { error, .. }
            | RetryError::Cancelled { error, .. } => error,
        }
    }

    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { error, .. }
            | RetryError::Rejected { error, .. }
            | RetryError::Cancelled { error, .. } => error,
        }
    }
}

/// Backoff configuration plus the pluggable retry predicate.
pub struct RetryPolicy<E> {
    config: RetryConfig,
    condition: Option<RetryCondition<E>>,
    on_retry: Option<RetryObserver>,
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        RetryPolicy {
            config: self.config.clone(),
            condition: self.condition.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> std::fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .field("condition", &self.condition.as_ref().map(|_| "<fn>"))
            .field("on_retry", &self.on_retry.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl<E> RetryPolicy<E> {
    pub fn new(config: RetryConfig) -> Self {
        RetryPolicy {
            config,
            condition: None,
            on_retry: None,
        }
    }

    /// Replace the default predicate. 401 is still never retried.
    pub fn with_condition(mut self, condition: impl Fn(&E, u32) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn with_observer(mut self, observer: impl Fn(u32, Duration) + Send + Sync + 'static) -> Self {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl<E: Classify> RetryPolicy<E> {
    /// Decide whether `error`, returned by attempt `attempt`, is worth retrying.
    pub fn should_retry(&self, error: &E, attempt: u32) -> bool {
        let class = error.classify();
        if class == FailureClass::Status(UNAUTHORIZED) {
            return false;
        }
        match &self.condition {
            Some(condition) => condition(error, attempt),
            None => self.config.is_retryable(class),
        }
    }

    fn next_delay(&self, retry: u32) -> Duration {
        self.config.jittered_delay(retry, &mut rand::thread_rng())
    }

    /// Run `call` until it succeeds, the policy gives up, or `cancel` fires
    /// during a wait.
    pub async fn execute<T, F, Fut>(
        &self,
        mut call: F,
        cancel: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0u32;

        loop {
            attempt = attempt.saturating_add(1);

            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !self.should_retry(&error, attempt) {
                return Err(RetryError::Rejected {
                    error,
                    attempts: attempt,
                });
            }

            if attempt > self.config.retries {
                return Err(RetryError::Exhausted {
                    error,
                    attempts: attempt,
                });
            }

            let delay = self.next_delay(attempt);
            tracing::debug!(
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "call failed, retrying"
            );
            if let Some(observer) = &self.on_retry {
                observer(attempt, delay);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(RetryError::Cancelled {
                        error,
                        attempts: attempt,
                    });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
