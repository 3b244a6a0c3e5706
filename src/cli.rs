use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use ruprobe::assertion::{AssertionReport, AssertionSpec, HeaderExpectation, evaluate};
use ruprobe::auth::{AuthMode, auth_header};
use ruprobe::config::{ConfigLoader, ProbeConfig, resolve_env_vars};
use ruprobe::error::{Result, RuprobeError};
use ruprobe::expectations::{load_body_expectations, load_schema};
use ruprobe::http::{HttpTransport, RequestDescriptor};
use ruprobe::reporter::Reporter;
use ruprobe::runner::{Executor, RequestOutcome, RetryPolicy};

/// 退出码：全部检查通过
pub const EXIT_OK: u8 = 0;
/// 退出码：拿到响应但有检查失败
pub const EXIT_ASSERTIONS_FAILED: u8 = 1;
/// 退出码：重试耗尽仍未拿到响应
pub const EXIT_REQUEST_FAILED: u8 = 2;
/// 退出码：配置或检查声明无效
pub const EXIT_CONFIG_ERROR: u8 = 3;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 目标 URL（支持 :3000、example.com:8080 等简写）
    pub url: String,

    /// HTTP 方法
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// 附加请求头，可重复（NAME:VALUE）
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// JSON 请求体
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// 认证模式（none/bearer/basic/api-key）
    #[arg(long, value_name = "MODE")]
    pub auth: Option<AuthMode>,

    /// 认证凭据，支持 ${VAR} 环境变量引用
    #[arg(long)]
    pub token: Option<String>,

    /// 最大尝试次数，含首次请求
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// 首次重试前的等待毫秒数，此后逐次翻倍
    #[arg(long, value_name = "MS")]
    pub retry_delay: Option<u64>,

    /// 单次请求超时（秒）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// 期望的响应状态码
    #[arg(long, value_name = "CODE")]
    pub expect_status: Option<u16>,

    /// 期望的响应头（NAME:VALUE）
    #[arg(long, value_name = "NAME:VALUE")]
    pub expect_header: Option<String>,

    /// 校验响应体的 JSON Schema 文件
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// body 取值期望文件（JSON 对象：路径 -> 期望值）
    #[arg(long, value_name = "FILE")]
    pub expect_body: Option<PathBuf>,

    /// 配置文件路径（默认逐级向上查找 ruprobe.toml）
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 显示响应头与响应体
    #[arg(short, long)]
    pub verbose: bool,
}

pub async fn run(cli: Cli) -> Result<u8> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_path(path)?,
        None => ConfigLoader::find_and_load().unwrap_or_default(),
    };

    let request = build_descriptor(&cli, &config)?;
    let spec = build_assertion_spec(&cli)?;
    let (policy, timeout) = build_policy(&cli, &config);

    let transport = HttpTransport::new(timeout)?;
    let executor = Executor::new(transport);
    let reporter = Reporter::new(cli.verbose);

    reporter.print_request(&request, &policy);
    let outcome = executor.execute(&request, &policy).await;

    // 声明无效时在输出结果前就报错退出
    let report = evaluate(&outcome, &spec)?;

    reporter.print_outcome(&outcome);
    // 没有声明任何检查时不渲染断言表格
    if !spec.is_empty() {
        reporter.print_report(&report);
    }

    Ok(exit_code(&outcome, &report))
}

fn exit_code(outcome: &RequestOutcome, report: &AssertionReport) -> u8 {
    if !outcome.is_success() {
        EXIT_REQUEST_FAILED
    } else if !report.passed() {
        EXIT_ASSERTIONS_FAILED
    } else {
        EXIT_OK
    }
}

/// 重试策略与单次请求超时，CLI 参数优先于配置文件
fn build_policy(cli: &Cli, config: &ProbeConfig) -> (RetryPolicy, Duration) {
    let policy = RetryPolicy::new(
        cli.retries.or(config.max_attempts).unwrap_or(1),
        cli.retry_delay.or(config.retry_delay_ms).unwrap_or(1000),
    );
    let timeout = Duration::from_secs(cli.timeout.or(config.timeout_secs).unwrap_or(30));
    (policy, timeout)
}

/// 合成请求描述
/// 请求头优先级：配置文件 < CLI -H < 认证头
fn build_descriptor(cli: &Cli, config: &ProbeConfig) -> Result<RequestDescriptor> {
    let mut request = RequestDescriptor::new(&cli.method, &cli.url)?;

    for (name, value) in &config.headers {
        request = request.with_header(name, &resolve_env_vars(value))?;
    }
    for raw in &cli.headers {
        let (name, value) = split_header(raw)?;
        request = request.with_header(&name, &value)?;
    }

    if let Some(data) = &cli.data {
        let body: serde_json::Value = serde_json::from_str(data).map_err(|e| {
            RuprobeError::ConfigError(format!("Request body is not valid JSON: {}", e))
        })?;
        if !request.method.supports_body() {
            tracing::warn!(method = %request.method, "Sending a body with a method that normally has none");
        }
        request = request.with_json_body(body);
    }

    let auth_mode = match (&cli.auth, &config.auth) {
        (Some(mode), _) => *mode,
        (None, Some(name)) => name.parse()?,
        (None, None) => AuthMode::default(),
    };
    let token = cli
        .token
        .clone()
        .or_else(|| config.token.clone())
        .map(|t| resolve_env_vars(&t));
    if let Some((name, value)) = auth_header(auth_mode, token.as_deref())? {
        request.headers.insert(name, value);
    }

    Ok(request)
}

fn build_assertion_spec(cli: &Cli) -> Result<AssertionSpec> {
    let header = match &cli.expect_header {
        Some(raw) => {
            let (name, value) = split_header(raw)?;
            Some(HeaderExpectation { name, value })
        }
        None => None,
    };

    let schema = match &cli.schema {
        Some(path) => Some(load_schema(path)?),
        None => None,
    };

    let body_values = match &cli.expect_body {
        Some(path) => load_body_expectations(path)?,
        None => Vec::new(),
    };

    Ok(AssertionSpec {
        status: cli.expect_status,
        header,
        schema,
        body_values,
    })
}

/// 解析 "NAME: VALUE" 形式的请求头参数
fn split_header(raw: &str) -> Result<(String, String)> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| {
            RuprobeError::ConfigError(format!("Invalid header '{}', expected NAME:VALUE", raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruprobe::assertion::{CheckKind, CheckResult};
    use ruprobe::http::{ResponseData, TransportError};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("ruprobe").chain(args.iter().copied()))
    }

    #[test]
    fn test_split_header() {
        assert_eq!(
            split_header("Content-Type: application/json").unwrap(),
            ("Content-Type".to_string(), "application/json".to_string())
        );
        assert_eq!(
            split_header("X-Key:value:with:colons").unwrap(),
            ("X-Key".to_string(), "value:with:colons".to_string())
        );
        assert!(split_header("no-separator").is_err());
    }

    #[test]
    fn test_exit_code_mapping() {
        let success = RequestOutcome::Success {
            response: ResponseData::new(200, Default::default(), String::new()).unwrap(),
            elapsed: Duration::from_millis(1),
        };
        let failure = RequestOutcome::Failure {
            error: TransportError::Connect("refused".to_string()),
            attempts: 2,
            elapsed: Duration::from_millis(10),
        };

        let passing = AssertionReport::default();
        let failing = AssertionReport {
            checks: vec![CheckResult::failure(
                CheckKind::Status,
                "status".to_string(),
                "200".to_string(),
                "500".to_string(),
                "Expected status to be 200, but got 500".to_string(),
            )],
        };

        assert_eq!(exit_code(&success, &passing), EXIT_OK);
        assert_eq!(exit_code(&success, &failing), EXIT_ASSERTIONS_FAILED);
        assert_eq!(exit_code(&failure, &failing), EXIT_REQUEST_FAILED);
    }

    #[test]
    fn test_build_assertion_spec_from_flags_and_files() {
        let mut schema_file = NamedTempFile::new().unwrap();
        schema_file
            .write_all(br#"{"type": "object", "required": ["user"]}"#)
            .unwrap();
        schema_file.flush().unwrap();

        let mut body_file = NamedTempFile::new().unwrap();
        body_file
            .write_all(br#"{"user.name": "John Doe"}"#)
            .unwrap();
        body_file.flush().unwrap();

        let cli = parse(&[
            "http://localhost:3000/api",
            "--expect-status",
            "200",
            "--expect-header",
            "Content-Type: application/json",
            "--schema",
            schema_file.path().to_str().unwrap(),
            "--expect-body",
            body_file.path().to_str().unwrap(),
        ]);

        let spec = build_assertion_spec(&cli).unwrap();
        assert_eq!(spec.status, Some(200));
        assert_eq!(spec.header.as_ref().unwrap().name, "Content-Type");
        assert_eq!(spec.schema.as_ref().unwrap()["required"], json!(["user"]));
        assert_eq!(spec.body_values.len(), 1);
        assert_eq!(spec.body_values[0].path, "user.name");
    }

    #[test]
    fn test_build_assertion_spec_empty_by_default() {
        let cli = parse(&["http://localhost:3000"]);
        let spec = build_assertion_spec(&cli).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_build_policy_flags_override_config() {
        let config = ProbeConfig {
            max_attempts: Some(5),
            retry_delay_ms: Some(50),
            timeout_secs: Some(3),
            ..Default::default()
        };

        let cli = parse(&[
            "http://localhost:3000",
            "--retries",
            "2",
            "--retry-delay",
            "10",
        ]);
        let (policy, timeout) = build_policy(&cli, &config);

        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.initial_delay, Duration::from_millis(10));
        // 未被 CLI 覆盖的字段仍来自配置文件
        assert_eq!(timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_build_policy_defaults() {
        let cli = parse(&["http://localhost:3000"]);
        let (policy, timeout) = build_policy(&cli, &ProbeConfig::default());

        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.initial_delay, Duration::from_millis(1000));
        assert_eq!(timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_build_descriptor_cli_headers_override_config() {
        let mut config = ProbeConfig::default();
        config
            .headers
            .insert("X-Api-Version".to_string(), "1".to_string());
        config
            .headers
            .insert("X-Source".to_string(), "config".to_string());

        let cli = parse(&["http://localhost:3000", "-H", "X-Api-Version: 2"]);
        let request = build_descriptor(&cli, &config).unwrap();

        assert_eq!(request.headers.get("x-api-version").unwrap(), "2");
        assert_eq!(request.headers.get("x-source").unwrap(), "config");
    }

    #[test]
    fn test_build_descriptor_bearer_auth() {
        let cli = parse(&[
            "http://localhost:3000",
            "--auth",
            "bearer",
            "--token",
            "secret",
        ]);
        let request = build_descriptor(&cli, &ProbeConfig::default()).unwrap();

        assert_eq!(
            request.headers.get("authorization").unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn test_build_descriptor_auth_from_config() {
        let config = ProbeConfig {
            auth: Some("api-key".to_string()),
            token: Some("k-123".to_string()),
            ..Default::default()
        };

        let cli = parse(&["http://localhost:3000"]);
        let request = build_descriptor(&cli, &config).unwrap();

        assert_eq!(request.headers.get("x-api-key").unwrap(), "k-123");
    }

    #[test]
    fn test_build_descriptor_rejects_non_json_body() {
        let cli = parse(&["http://localhost:3000", "-X", "POST", "-d", "not json"]);
        let result = build_descriptor(&cli, &ProbeConfig::default());
        assert!(matches!(result, Err(RuprobeError::ConfigError(_))));
    }

    #[test]
    fn test_build_descriptor_json_body_and_method() {
        let cli = parse(&[
            "http://localhost:3000",
            "-X",
            "POST",
            "-d",
            r#"{"name": "foo"}"#,
        ]);
        let request = build_descriptor(&cli, &ProbeConfig::default()).unwrap();

        assert_eq!(request.method.as_str(), "POST");
        assert_eq!(request.body, Some(json!({"name": "foo"})));
        assert_eq!(
            request.headers.get("content-type").unwrap(),
            "application/json"
        );
    }
}
