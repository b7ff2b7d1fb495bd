use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// Races a data fetch against the request's cancellation token.
///
/// A token that is already cancelled wins before the fetch is polled.
pub async fn guarded<T>(
    cancel: &CancellationToken,
    fetch: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = fetch => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_passes_result_through_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let result = guarded(&cancel, async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_fetch() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = guarded(&cancel, async { Ok(7) }).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_fetch() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result: AppResult<()> = guarded(&cancel, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
    }
}
