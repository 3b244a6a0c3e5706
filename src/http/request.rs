use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::http::types::{Method, Url};
use crate::{Result, RuprobeError};

/// 不可变的请求描述：方法、URL、请求头与可选的 JSON body
///
/// 由调用方一次性构建，执行器开始后不再修改
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: &str, url: &str) -> Result<Self> {
        Ok(Self {
            method: method.parse()?,
            url: Url::parse(url)?,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    fn insert_header(&mut self, name: &str, value: &str) -> Result<()> {
        let header_name: HeaderName = name
            .parse()
            .map_err(|_| RuprobeError::InvalidHeader(name.to_string()))?;
        let header_value: HeaderValue = value
            .parse()
            .map_err(|_| RuprobeError::InvalidHeader(format!("{}: {}", name, value)))?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        self.insert_header(name, value)?;
        Ok(self)
    }

    /// 附加已解析的 JSON body，同时声明 Content-Type
    pub fn with_json_body(mut self, body: Value) -> Self {
        if !self.headers.contains_key(reqwest::header::CONTENT_TYPE) {
            self.headers.insert(
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        self.body = Some(body);
        self
    }
}
