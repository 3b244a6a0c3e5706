use std::fmt;
use std::str::FromStr;

use base64::Engine;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

use crate::error::{Result, RuprobeError};

/// 支持的认证模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    None,
    Bearer,
    Basic,
    ApiKey,
}

impl FromStr for AuthMode {
    type Err = RuprobeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(AuthMode::None),
            "bearer" => Ok(AuthMode::Bearer),
            "basic" => Ok(AuthMode::Basic),
            "api-key" => Ok(AuthMode::ApiKey),
            _ => Err(RuprobeError::ParseError(format!(
                "Unknown auth mode: {} (expected none, bearer, basic or api-key)",
                s
            ))),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMode::None => "none",
            AuthMode::Bearer => "bearer",
            AuthMode::Basic => "basic",
            AuthMode::ApiKey => "api-key",
        };
        write!(f, "{}", name)
    }
}

/// 根据认证模式生成要附加的请求头
///
/// - `bearer`: `Authorization: Bearer <token>`
/// - `basic`: 凭据形如 `user:pass`，base64 编码后 `Authorization: Basic <encoded>`
/// - `api-key`: `X-API-Key: <token>`
///
/// `none` 模式不产生任何请求头；其余模式缺少凭据时报配置错误
pub fn auth_header(
    mode: AuthMode,
    credential: Option<&str>,
) -> Result<Option<(HeaderName, HeaderValue)>> {
    let (name, value) = match (mode, credential) {
        (AuthMode::None, _) => return Ok(None),
        (AuthMode::Bearer, Some(token)) => (AUTHORIZATION, format!("Bearer {}", token)),
        (AuthMode::Basic, Some(credential)) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(credential.as_bytes());
            (AUTHORIZATION, format!("Basic {}", encoded))
        }
        (AuthMode::ApiKey, Some(token)) => {
            (HeaderName::from_static("x-api-key"), token.to_string())
        }
        (_, None) => {
            return Err(RuprobeError::ConfigError(format!(
                "{} auth requires a credential (--token)",
                mode
            )));
        }
    };

    let value = HeaderValue::from_str(&value)
        .map_err(|e| RuprobeError::InvalidHeader(format!("{}: {}", name, e)))?;

    Ok(Some((name, value)))
}
