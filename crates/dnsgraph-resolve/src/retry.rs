use crate::error::{FetchError, ResolveError};
use std::future::Future;
use std::time::Duration;

/// Retry behaviour for rate-limited upstream requests.
///
/// A 429 is retried after the upstream's `Retry-After`, or `default_delay`
/// when it gives none. Any other failure is returned immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub default_delay: Duration,
    /// Retries allowed before giving up with `UpstreamRateLimited`; `None` retries forever.
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            default_delay: Duration::from_secs(2),
            max_retries: None,
        }
    }
}

impl RetryPolicy {
    pub async fn run<T, F, Fut>(&self, link: &str, mut attempt: F) -> Result<T, ResolveError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut retries: u32 = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(FetchError::RateLimited { retry_after }) => {
                    if self.max_retries.is_some_and(|max| retries >= max) {
                        return Err(ResolveError::UpstreamRateLimited {
                            link: link.to_string(),
                            attempts: retries + 1,
                        });
                    }
                    let delay = retry_after.unwrap_or(self.default_delay);
                    tracing::debug!(link, ?delay, retries, "rate limited, retrying");
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Err(err) => return Err(ResolveError::unavailable(link, err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_retry_after() {
        let calls = &AtomicU32::new(0);
        let start = tokio::time::Instant::now();
        let result = RetryPolicy::default()
            .run("/zones", || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FetchError::RateLimited {
                        retry_after: Some(Duration::from_secs(1)),
                    })
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_delay_without_header() {
        let calls = &AtomicU32::new(0);
        let start = tokio::time::Instant::now();
        let _ = RetryPolicy::default()
            .run("/zones", || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FetchError::RateLimited { retry_after: None })
                } else {
                    Ok(())
                }
            })
            .await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_retries_give_up() {
        let policy = RetryPolicy {
            max_retries: Some(2),
            ..RetryPolicy::default()
        };
        let result: Result<(), _> = policy
            .run("/domains/example.com", || async move {
                Err(FetchError::RateLimited { retry_after: None })
            })
            .await;
        assert_eq!(
            result,
            Err(ResolveError::UpstreamRateLimited {
                link: "/domains/example.com".into(),
                attempts: 3
            })
        );
    }

    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::default()
            .run("/domains/example.com", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::Status { status: 500 })
            })
            .await;
        assert!(matches!(result, Err(ResolveError::UpstreamUnavailable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
