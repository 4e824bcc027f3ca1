use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 文字輸入用的防抖：只有在靜止 `delay` 之後仍是最新一次的呼叫才會放行
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 等待靜止期，回傳這次呼叫是否仍是最新的
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if self.delay.is_zero() {
            return true;
        }
        tokio::time::sleep(self.delay).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_in_burst_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(300));

        let (first, second, third) = tokio::join!(debouncer.settle(), debouncer.settle(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            debouncer.settle().await
        });

        assert!(!first);
        assert!(!second);
        assert!(third);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_calls_both_settle() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        assert!(debouncer.settle().await);
        assert!(debouncer.settle().await);
    }

    #[tokio::test]
    async fn test_zero_delay_passes_through() {
        let debouncer = Debouncer::new(Duration::ZERO);
        assert!(debouncer.settle().await);
    }
}
