use std::time::Duration;

use crate::http::client::TransportError;
use crate::http::response::ResponseData;

/// 一次完整重试序列的最终结果
///
/// 只有传输层失败在耗尽重试预算后才产生 Failure；
/// 任何 HTTP 状态码（包括 4xx/5xx）都作为 Success 返回。
/// `elapsed` 从第一次尝试开始计量，到首次成功或最终失败为止
#[derive(Debug)]
pub enum RequestOutcome {
    Success {
        response: ResponseData,
        elapsed: Duration,
    },
    Failure {
        error: TransportError,
        attempts: u32,
        elapsed: Duration,
    },
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success { .. })
    }

    pub fn response(&self) -> Option<&ResponseData> {
        match self {
            RequestOutcome::Success { response, .. } => Some(response),
            RequestOutcome::Failure { .. } => None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            RequestOutcome::Success { elapsed, .. }
            | RequestOutcome::Failure { elapsed, .. } => *elapsed,
        }
    }
}
