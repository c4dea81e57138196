//! 重试策略
//!
//! 以显式对象描述重试行为（最大尝试次数、固定间隔、可重试判断），
//! 由调用方包裹在单次请求外层执行。

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::api_constants::service_config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
use crate::error::{Result, TranslationError};

/// 默认判断：任何错误都重试
fn always_retry(_: &TranslationError) -> bool {
    true
}

/// 固定间隔重试策略
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: usize,
    delay: Duration,
    retry_if: fn(&TranslationError) -> bool,
}

impl RetryPolicy {
    /// 创建重试策略，`max_attempts` 包含首次请求，至少为1
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            retry_if: always_retry,
        }
    }

    /// 只重试满足条件的错误，其余错误立即返回
    pub fn retry_if(mut self, predicate: fn(&TranslationError) -> bool) -> Self {
        self.retry_if = predicate;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 执行操作，失败时按策略重试
    ///
    /// `operation` 接收当前尝试序号（从1开始）。重试耗尽后返回的
    /// 是最后一次尝试的错误，之前的错误只记录日志。
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("✅ 第 {} 次尝试成功", attempt);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    if attempt >= self.max_attempts || !(self.retry_if)(&e) {
                        return Err(e);
                    }

                    warn!("❌ 请求失败 (尝试 {}/{}): {}", attempt, self.max_attempts, e);
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation_error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_last_error() {
        let policy = RetryPolicy::default();
        let calls = AtomicUsize::new(0);
        let started_at = Mutex::new(Vec::new());

        let result: Result<()> = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                started_at.lock().unwrap().push(Instant::now());
                async move { Err(translation_error!(network, format!("attempt {}", attempt))) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(TranslationError::Network { message, .. }) => assert_eq!(message, "attempt 3"),
            other => panic!("unexpected result: {:?}", other),
        }

        let started_at = started_at.lock().unwrap();
        for pair in started_at.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures() {
        let policy = RetryPolicy::default();
        let calls = AtomicUsize::new(0);

        let result = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(translation_error!(remote, "busy", 429))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_first_success() {
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let result = policy.run(|_| async { Ok::<_, TranslationError>(1) }).await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_predicate_stops_retrying() {
        let policy = RetryPolicy::default()
            .retry_if(|e| matches!(e, TranslationError::Network { .. }));
        let calls = AtomicUsize::new(0);

        let result: Result<()> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(translation_error!(protocol, "bad body")) }
            })
            .await;

        assert!(matches!(result, Err(TranslationError::Protocol { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }
}
