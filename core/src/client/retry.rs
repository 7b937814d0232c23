//! Capped exponential backoff with full jitter.

use std::time::Duration;

use rand::Rng;

use crate::error::ApiError;
use crate::method::RestMethod;

/// Retry policy applied by [`ApiClient`](crate::client::ApiClient).
///
/// ## Retry Strategy
///
/// - Only errors where [`ApiError::is_retryable`] holds are retried: 5xx
///   server faults, throttling, and transient network failures.
/// - A network failure on a non-idempotent method (`POST`, `PATCH`) is
///   retried only when the request provably never left the client.
/// - Attempt `n` (1-based) waits a random duration in
///   `0..=min(max_delay, base_delay * 2^(n-1))` ("full jitter").
/// - A `Retry-After` hint from the service raises the wait to at least the
///   hint, still capped at `max_delay`.
/// - `max_attempts` bounds the total number of attempts, first one included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(20),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn no_retries() -> Self {
        Self::default().with_max_attempts(1)
    }

    /// Sets the total attempt budget. Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Disables jitter so delays are exactly the capped exponential value.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// The uncapped-then-capped exponential delay after `attempt` failures.
    fn ceiling(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1_u32 << exponent)
            .min(self.max_delay)
    }

    /// Delay before the attempt following failed attempt number `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let ceiling = self.ceiling(attempt);
        if !self.jitter || ceiling.is_zero() {
            return ceiling;
        }
        let millis = ceiling.as_millis().min(u64::MAX as u128) as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=millis))
    }

    /// Delay before retrying after `error`, honouring any retry-after hint.
    pub fn delay_for(&self, attempt: u32, error: &ApiError) -> Duration {
        let backoff = self.backoff(attempt);
        match error {
            ApiError::Service(service) => match service.retry_after {
                Some(hint) => backoff.max(hint).min(self.max_delay),
                None => backoff,
            },
            _ => backoff,
        }
    }

    /// Returns `true` if another attempt of a `method` request should
    /// follow failed attempt number `attempt` (1-based).
    pub fn should_retry(&self, attempt: u32, method: RestMethod, error: &ApiError) -> bool {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return false;
        }
        match error {
            ApiError::Network(network) if !method.is_idempotent() => network.is_unsent(),
            _ => true,
        }
    }
}
