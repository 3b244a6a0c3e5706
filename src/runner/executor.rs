use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::http::client::Transport;
use crate::http::request::RequestDescriptor;
use crate::runner::retry::RetryPolicy;
use crate::runner::types::RequestOutcome;

/// 带重试的请求执行器
///
/// 传输层一旦成功就立即返回，不论状态码是多少；
/// 传输层失败则按策略等待后重试，间隔逐次翻倍
pub struct Executor<T: Transport> {
    transport: T,
}

impl<T: Transport> Executor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub async fn execute(
        &self,
        request: &RequestDescriptor,
        policy: &RetryPolicy,
    ) -> RequestOutcome {
        // 计时从第一次尝试开始，重试不会重置
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            match self.transport.send(request).await {
                Ok(response) => {
                    debug!(
                        status = response.status.code(),
                        attempt = attempts + 1,
                        "request completed"
                    );
                    return RequestOutcome::Success {
                        response,
                        elapsed: started.elapsed(),
                    };
                }
                Err(err) => {
                    attempts += 1;
                    if attempts >= policy.max_attempts {
                        error!(attempts, error = %err, "request failed, retry budget exhausted");
                        return RequestOutcome::Failure {
                            error: err,
                            attempts,
                            elapsed: started.elapsed(),
                        };
                    }

                    let delay = policy.delay_for(attempts - 1);
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
