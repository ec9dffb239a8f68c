//! Retry with exponential back-off and jitter for ranking calls.
//!
//! Only [`AdapterError::RankingUpstream`] is retried; every other error is
//! returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use scout_core::AdapterError;

pub(crate) fn is_retriable(err: &AdapterError) -> bool {
    matches!(err, AdapterError::RankingUpstream(_))
}

/// Runs `operation`, retrying upstream failures up to `max_retries` times.
///
/// The n-th retry sleeps `backoff_base_ms * 2^(n-1)`, capped at
/// [`MAX_BACKOFF_MS`], scaled by a random factor in `[0.75, 1.25)`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, AdapterError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AdapterError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && retries < max_retries => err,
            Err(err) => return Err(err),
        };
        retries += 1;
        let delay_ms = backoff_delay_ms(backoff_base_ms, retries);
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms,
            error = %err,
            "ranking oracle unavailable, backing off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

const MAX_BACKOFF_MS: u64 = 60_000;

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn backoff_delay_ms(base_ms: u64, retry: u32) -> u64 {
    let exponent = retry.saturating_sub(1).min(10);
    let capped = base_ms.saturating_mul(1u64 << exponent).min(MAX_BACKOFF_MS);
    let jitter = rand::random::<f64>() * 0.5 + 0.75;
    (capped as f64 * jitter) as u64
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn only_upstream_errors_are_retriable() {
        assert!(is_retriable(&AdapterError::RankingUpstream("503".to_owned())));
        assert!(!is_retriable(&AdapterError::RankingParse("prose".to_owned())));
        assert!(!is_retriable(&AdapterError::StoreUnavailable("db".to_owned())));
    }

    #[test]
    fn backoff_doubles_within_jitter_and_caps() {
        for _ in 0..20 {
            let first = backoff_delay_ms(1_000, 1);
            assert!((750..1_250).contains(&first), "first retry: {first}");
            let third = backoff_delay_ms(1_000, 3);
            assert!((3_000..5_000).contains(&third), "third retry: {third}");
            let late = backoff_delay_ms(1_000, 30);
            assert!(late < 75_000, "capped: {late}");
        }
        assert_eq!(backoff_delay_ms(0, 4), 0);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(AdapterError::RankingUpstream("timeout".to_owned()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<u32, _> = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(AdapterError::RankingUpstream("down".to_owned()))
            }
        })
        .await;
        assert!(matches!(result, Err(AdapterError::RankingUpstream(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "1 attempt + 2 retries");
    }

    #[tokio::test]
    async fn does_not_retry_parse_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<u32, _> = retry_with_backoff(5, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(AdapterError::RankingParse("no list".to_owned()))
            }
        })
        .await;
        assert!(matches!(result, Err(AdapterError::RankingParse(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
