// Retry with exponential backoff

use std::time::Duration;

use futures::Future;
use tokio::time::sleep;
use tracing::warn;

/// Run `operation` until it succeeds or `max_retries` retries have failed.
/// The wait doubles after every failure, starting at `base_delay` and capped
/// at 32x.
pub async fn with_retry<F, Fut, T, E>(
    mut operation: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if attempt >= max_retries {
                    return Err(error);
                }

                let delay = base_delay * 2u32.pow(attempt.min(5));
                attempt += 1;
                warn!(attempt, max_retries, error = %error, "Operation failed, retrying in {:?}", delay);
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = &AtomicU32::new(0);
        let result: Result<u32, String> = with_retry(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(format!("failure {}", n))
                } else {
                    Ok(n)
                }
            },
            3,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), &str> = with_retry(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down")
            },
            2,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result, Err("down"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_retries_is_a_single_attempt() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), &str> = tokio_test::block_on(with_retry(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down")
            },
            0,
            Duration::from_millis(1),
        ));
        tokio_test::assert_err!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
