//! Bounded retry of optimistic-concurrency conflicts.

use std::future::Future;

use crate::error::LifecycleResult;

/// Run `attempt` until it succeeds, fails with a non-retryable error, or
/// has been retried `max_retries` times.
///
/// Each attempt must start a fresh unit of work; state read by a failed
/// attempt is stale.
pub async fn retry_on_conflict<T, F, Fut>(
    max_retries: u32,
    operation: &'static str,
    mut attempt: F,
) -> LifecycleResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LifecycleResult<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if err.is_retryable() && retries < max_retries => {
                retries += 1;
                tracing::debug!(operation, retries, error = %err, "optimistic conflict, retrying");
                tokio::task::yield_now().await;
            }
            Err(err) if err.is_retryable() => {
                tracing::warn!(
                    operation,
                    retries,
                    error = %err,
                    "optimistic conflict, retries exhausted"
                );
                return Err(err);
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use stockyard_core::DomainError;

    use crate::error::LifecycleError;

    fn conflict() -> LifecycleError {
        DomainError::concurrent("stale").into()
    }

    #[tokio::test]
    async fn retries_conflicts_until_success() {
        let calls = &AtomicU32::new(0);
        let result = retry_on_conflict(3, "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(conflict())
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = &AtomicU32::new(0);
        let result: LifecycleResult<()> = retry_on_conflict(2, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(conflict())
        })
        .await;

        assert!(result.unwrap_err().is_retryable());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn business_errors_are_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: LifecycleResult<()> = retry_on_conflict(5, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::validation("bad").into())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
