//! Rate-limit handling for remote status APIs
//!
//! A provider throttling signal never ends a load. The call is paused for a
//! fixed interval and then repeated from the same cursor.

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::DomainError;

/// Twitter and Mastodon both reset their windows every 15 minutes
pub const DEFAULT_RATE_LIMIT_PAUSE: Duration = Duration::from_secs(15 * 60);

/// How to react to a rate-limit signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pause: Duration,
    max_retries: Option<u32>,
}

impl RetryPolicy {
    pub fn new(pause: Duration) -> Self {
        Self {
            pause,
            max_retries: None,
        }
    }

    /// Give up after `max_retries` consecutive rate-limit signals
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT_PAUSE)
    }
}

/// Clock used to wait out rate limits
#[async_trait]
pub trait Sleeper: Send + Sync + Debug {
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Run `call`, pausing and repeating it while the provider rate-limits.
///
/// Any other error is returned unchanged.
pub async fn retry_on_rate_limit<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    operation: &str,
    mut call: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut retries = 0u32;

    loop {
        match call().await {
            Err(e) if e.is_rate_limited() => {
                if policy.max_retries.is_some_and(|max| retries >= max) {
                    return Err(e);
                }

                retries += 1;
                warn!(
                    operation,
                    retries,
                    pause_secs = policy.pause.as_secs(),
                    "Rate limit reached, pausing"
                );
                sleeper.sleep(policy.pause).await;
            }
            other => return other,
        }
    }
}
