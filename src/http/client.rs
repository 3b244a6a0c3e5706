use std::future::Future;
use std::time::Duration;

use crate::Result;
use crate::http::request::RequestDescriptor;
use crate::http::response::ResponseData;
use crate::http::types::Method;

/// 传输层错误，重试逻辑只处理这一层的失败
///
/// HTTP 错误状态码不属于传输层错误
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// 执行器依赖的抽象 HTTP 传输
pub trait Transport {
    /// 发送一次请求，返回响应或传输层错误
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = std::result::Result<ResponseData, TransportError>> + Send;
}

impl<T: Transport + Sync> Transport for &T {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = std::result::Result<ResponseData, TransportError>> + Send {
        (**self).send(request)
    }
}

/// 基于 reqwest 的生产实现，带单次请求超时
#[derive(Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = std::result::Result<ResponseData, TransportError>> + Send {
        async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
                Method::Patch => reqwest::Method::PATCH,
                Method::Head => reqwest::Method::HEAD,
                Method::Options => reqwest::Method::OPTIONS,
            };

            let mut req = self
                .inner
                .request(method, request.url.as_str())
                .headers(request.headers.clone());

            if let Some(body) = &request.body {
                req = req.json(body);
            }

            let response = req.send().await.map_err(map_error)?;

            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.text().await.map_err(map_error)?;

            ResponseData::new(status, headers, body)
                .map_err(|e| TransportError::InvalidResponse(e.to_string()))
        }
    }
}

/// 将 reqwest 错误归类到传输层错误
fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
