use reqwest::header::HeaderMap;

use crate::Result;
use crate::http::types::Status;

/// 响应数据：状态码、响应头与原始 body 文本
///
/// 任何状态码（包括 4xx/5xx）都会产生一个 ResponseData，
/// 断言层需要看到真实的状态码
#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status: Status,
    pub headers: HeaderMap,
    pub body: String,
}

impl ResponseData {
    pub fn new(status: u16, headers: HeaderMap, body: String) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            headers,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// 将 body 解析为 JSON 值
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
