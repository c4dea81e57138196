//! 共享工作池
//!
//! 用信号量限制同时在途的翻译请求数量。`WorkerPool` 可以廉价克隆，
//! 所有克隆共享同一组许可，超出容量的任务排队等待。

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::api_constants::service_config::DEFAULT_WORKER_POOL_SIZE;
use crate::error::{Result, TranslationError};

/// 有界工作池句柄
#[derive(Debug, Clone)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    /// 创建指定容量的工作池，容量至少为1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// 工作池容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前空闲的执行槽数量
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// 提交任务
    ///
    /// 任务立即被调度，但只有拿到许可后才开始执行，执行结束时归还许可。
    /// 丢弃返回的 `JoinHandle` 不会取消任务。
    pub fn spawn<T, Fut>(&self, task: Fut) -> JoinHandle<Result<T>>
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|e| TranslationError::Internal {
                source: anyhow::Error::new(e).context("工作池已关闭"),
            })?;
            task.await
        })
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_POOL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_tasks_bounded_by_capacity() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                // 通过克隆句柄提交，验证许可是共享的
                pool.clone().spawn(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(results, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_dropped_handle_still_runs_task() {
        let pool = WorkerPool::new(1);
        let (tx, rx) = tokio::sync::oneshot::channel();

        drop(pool.spawn(async move {
            let _ = tx.send("finished");
            Ok(())
        }));

        assert_eq!(rx.await.unwrap(), "finished");
    }

    #[test]
    fn test_capacity_at_least_one() {
        assert_eq!(WorkerPool::new(0).capacity(), 1);
        assert_eq!(WorkerPool::default().capacity(), 10);
    }
}
