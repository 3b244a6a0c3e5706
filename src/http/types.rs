use std::fmt;
use std::str::FromStr;

use crate::{Result, RuprobeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl FromStr for Method {
    type Err = RuprobeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(RuprobeError::ParseError(format!(
                "Invalid HTTP method: {}",
                s
            ))),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// 该方法是否通常携带请求体
    pub fn supports_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch | Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 请求地址，支持若干 localhost 简写形式:
/// - ":3000" -> "http://localhost:3000"
/// - "localhost:3000" -> "http://localhost:3000"
/// - "example.com/path" -> "http://example.com/path"
/// - "https://:8080" -> "https://localhost:8080"
#[derive(Debug, Clone)]
pub struct Url(url::Url);

impl Url {
    const DEFAULT_HOST: &'static str = "localhost";
    const DEFAULT_SCHEME: &'static str = "http";

    pub fn parse(s: &str) -> Result<Self> {
        let normalized = Self::normalize(s.trim());
        let parsed = url::Url::parse(&normalized)?;

        if parsed.host().is_none() {
            return Err(RuprobeError::InvalidUrl(s.to_string()));
        }

        Ok(Self(parsed))
    }

    fn normalize(input: &str) -> String {
        if input.starts_with(':') {
            // 纯端口号格式: ":3000" 或 ":3000/path"
            format!("{}://{}{}", Self::DEFAULT_SCHEME, Self::DEFAULT_HOST, input)
        } else if let Some(pos) = input.find("://") {
            // 处理 "scheme://:port" 格式 (空 host)
            let after_scheme = &input[pos + 3..];
            if after_scheme.starts_with(':') {
                format!("{}://{}{}", &input[..pos], Self::DEFAULT_HOST, after_scheme)
            } else {
                input.to_string()
            }
        } else {
            // 无协议格式: "localhost:3000" 或 "example.com/path"
            format!("{}://{}", Self::DEFAULT_SCHEME, input)
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn host(&self) -> String {
        self.0
            .host()
            .map(|h| h.to_string())
            .unwrap_or_else(|| Self::DEFAULT_HOST.to_string())
    }

    pub fn port(&self) -> u16 {
        self.0.port_or_known_default().unwrap_or(80)
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Self(code))
        } else {
            Err(RuprobeError::ParseError(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_redirect(&self) -> bool {
        (300..=399).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..=499).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..=599).contains(&self.0)
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str() {
        assert_eq!(Method::parse("get").unwrap(), Method::Get);
        assert_eq!(Method::parse("POST").unwrap(), Method::Post);
        assert_eq!(Method::parse("Delete").unwrap(), Method::Delete);
        assert!(Method::parse("FETCH").is_err());
    }

    #[test]
    fn test_method_supports_body() {
        assert!(Method::Post.supports_body());
        assert!(Method::Put.supports_body());
        assert!(!Method::Get.supports_body());
        assert!(!Method::Head.supports_body());
    }

    #[test]
    fn test_parse_full_url() {
        let url = Url::parse("https://api.example.com:8443/v1/users?id=1").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host(), "api.example.com");
        assert_eq!(url.port(), 8443);
        assert_eq!(url.path(), "/v1/users");
    }

    #[test]
    fn test_parse_url_without_scheme() {
        let url = Url::parse("example.com/api/users").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.port(), 80);
        assert_eq!(url.path(), "/api/users");
    }

    #[test]
    fn test_parse_url_known_default_ports() {
        assert_eq!(Url::parse("http://example.com/").unwrap().port(), 80);
        assert_eq!(Url::parse("https://example.com/").unwrap().port(), 443);
    }

    #[test]
    fn test_parse_localhost_with_port() {
        let url = Url::parse("localhost:3000").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host(), "localhost");
        assert_eq!(url.port(), 3000);
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn test_parse_port_only() {
        let url = Url::parse(":8080").unwrap();
        assert_eq!(url.host(), "localhost");
        assert_eq!(url.port(), 8080);
    }

    #[test]
    fn test_parse_port_with_path() {
        let url = Url::parse(":8080/health").unwrap();
        assert_eq!(url.host(), "localhost");
        assert_eq!(url.port(), 8080);
        assert_eq!(url.path(), "/health");
    }

    #[test]
    fn test_parse_port_with_scheme() {
        let url = Url::parse("https://:8080").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host(), "localhost");
        assert_eq!(url.port(), 8080);
    }

    #[test]
    fn test_parse_url_with_whitespace() {
        let url = Url::parse("  http://example.com/path  ").unwrap();
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.path(), "/path");
    }

    #[test]
    fn test_parse_ip_address() {
        let url = Url::parse("127.0.0.1:8080/test").unwrap();
        assert_eq!(url.host(), "127.0.0.1");
        assert_eq!(url.port(), 8080);
        assert_eq!(url.path(), "/test");
    }

    #[test]
    fn test_status_validation() {
        assert!(Status::new(200).is_ok());
        assert!(Status::new(599).is_ok());
        assert!(Status::new(99).is_err());
        assert!(Status::new(600).is_err());
    }

    #[test]
    fn test_status_classes() {
        assert!(Status::new(204).unwrap().is_success());
        assert!(Status::new(302).unwrap().is_redirect());
        assert!(Status::new(404).unwrap().is_client_error());
        assert!(Status::new(503).unwrap().is_server_error());
    }

    #[test]
    fn test_status_reason_phrase() {
        assert_eq!(Status::new(200).unwrap().reason_phrase(), "OK");
        assert_eq!(Status::new(404).unwrap().reason_phrase(), "Not Found");
        assert_eq!(Status::new(418).unwrap().reason_phrase(), "Unknown");
    }
}
