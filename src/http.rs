//! 共通HTTPヘルパー

use crate::error::Result;
use std::future::Future;
use std::time::Duration;

/// 初回リトライまでの待ち時間
const BASE_DELAY: Duration = Duration::from_millis(200);

/// 一時的なエラーの場合に指数バックオフでリトライする
///
/// `max_retries` は初回を含まない回数。
pub async fn with_retry<F, Fut, T>(mut f: F, max_retries: u32) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_retries && e.is_retryable() => {
                let delay = BASE_DELAY * 2u32.pow(attempt);
                tracing::warn!(
                    error = %e,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
