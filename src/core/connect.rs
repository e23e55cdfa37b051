//! Startup connection retry.
//!
//! Both binaries refuse to do any work until the document store
//! answers. Failed attempts are logged and retried after a fixed
//! delay, forever unless a maximum is configured.

use std::future::Future;
use std::time::Duration;

use crate::core::config::RetryConfig;
use crate::core::error::Result;

/// Delay between loader connection attempts
pub const LOADER_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Delay between API server connection attempts
pub const SERVER_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Fixed-interval retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever with `delay` between attempts
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Build a policy from configuration, using `default_delay` when
    /// no delay is configured
    pub fn from_config(retry: &RetryConfig, default_delay: Duration) -> Self {
        Self {
            delay: retry.delay_or(default_delay),
            max_attempts: retry.max_attempts,
        }
    }
}

/// Run `connect` until it succeeds
///
/// The same routine is invoked on every attempt. Only connection
/// errors are retried; any other error is returned at once, as is
/// the last error when `policy.max_attempts` is reached.
pub async fn connect_with_retry<T, F, Fut>(
    label: &str,
    policy: RetryPolicy,
    mut connect: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match connect().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("{} connected after {} attempts", label, attempt);
                }
                return Ok(value);
            }
            Err(e) if !e.is_connection_error() => {
                tracing::error!("Error connecting {}: {}", label, e);
                return Err(e);
            }
            Err(e) => {
                if policy.max_attempts.is_some_and(|max| attempt >= max) {
                    tracing::error!("{} giving up after {} attempts: {}", label, attempt, e);
                    return Err(e);
                }

                tracing::warn!(
                    attempt,
                    "Error connecting {}, retrying in {} msec: {}",
                    label,
                    policy.delay.as_millis(),
                    e
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
