use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuprobeError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("无效的 URL: {0}")]
    InvalidUrl(String),

    #[error("无效的请求头: {0}")]
    InvalidHeader(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("断言声明无效: {0}")]
    AssertionError(#[from] crate::assertion::AssertError),

    #[error("HTTP 客户端错误: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for RuprobeError {
    fn from(err: anyhow::Error) -> Self {
        RuprobeError::Other(err.to_string())
    }
}

/// Result type for ruprobe crate
pub type Result<T> = std::result::Result<T, RuprobeError>;
