use std::time::Duration;

/// 重试间隔的倍增系数，固定为 2
pub const BACKOFF_MULTIPLIER: u32 = 2;

/// 重试策略：最大尝试次数与首次重试前的等待时间
///
/// `max_attempts` 含首次请求，最小为 1；为 1 时无论失败与否都不重试
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(initial_delay_ms),
        }
    }

    /// 第 retry_index 次重试前的等待时间: d, 2d, 4d, ...
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        self.initial_delay
            .saturating_mul(BACKOFF_MULTIPLIER.saturating_pow(retry_index))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_sequence_doubles() {
        let policy = RetryPolicy::new(5, 100);
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_zero_initial_delay() {
        let policy = RetryPolicy::new(3, 0);
        assert_eq!(policy.delay_for(0), Duration::ZERO);
        assert_eq!(policy.delay_for(5), Duration::ZERO);
    }

    #[test]
    fn test_max_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, 1000);
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.initial_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_large_retry_index_saturates() {
        let policy = RetryPolicy::new(100, u64::MAX);
        // 不应 panic，只会饱和
        let _ = policy.delay_for(64);
    }
}
