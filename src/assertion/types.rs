use std::fmt;

use serde_json::Value;

/// 断言声明错误
///
/// 表示声明本身是坏的（配置错误），与"响应不符合期望"的断言失败是两回事
#[derive(Debug, thiserror::Error)]
pub enum AssertError {
    #[error("Invalid schema document: {0}")]
    InvalidSchema(String),

    #[error("Invalid body path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// 一组可选的响应期望，每项独立评估，未声明的直接跳过
#[derive(Debug, Clone, Default)]
pub struct AssertionSpec {
    pub status: Option<u16>,
    pub header: Option<HeaderExpectation>,
    pub schema: Option<Value>,
    pub body_values: Vec<BodyExpectation>,
}

impl AssertionSpec {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.header.is_none()
            && self.schema.is_none()
            && self.body_values.is_empty()
    }
}

/// 期望的响应头，名称匹配不区分大小写
#[derive(Debug, Clone)]
pub struct HeaderExpectation {
    pub name: String,
    pub value: String,
}

/// body 路径上的期望值：标量逐值比较，数组做子集检查
#[derive(Debug, Clone)]
pub struct BodyExpectation {
    pub path: String,
    pub expected: Value,
}

/// 检查类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// 请求本身失败（传输层耗尽重试）
    Request,
    Status,
    Header,
    Schema,
    BodyValue,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Request => "request",
            CheckKind::Status => "status",
            CheckKind::Header => "header",
            CheckKind::Schema => "schema",
            CheckKind::BodyValue => "body",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单项检查结果
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// 检查类别
    pub kind: CheckKind,

    /// 被检查对象的描述，如 "status"、"header content-type"、"body user.name"
    pub subject: String,

    /// 是否通过
    pub passed: bool,

    /// 期望描述
    pub expected: String,

    /// 实际值（字符串表示）
    pub actual: Option<String>,

    /// 失败消息
    pub message: Option<String>,
}

impl CheckResult {
    /// 创建通过的检查结果
    pub fn success(kind: CheckKind, subject: String, expected: String, actual: String) -> Self {
        Self {
            kind,
            subject,
            passed: true,
            expected,
            actual: Some(actual),
            message: None,
        }
    }

    /// 创建失败的检查结果
    pub fn failure(
        kind: CheckKind,
        subject: String,
        expected: String,
        actual: String,
        message: String,
    ) -> Self {
        Self {
            kind,
            subject,
            passed: false,
            expected,
            actual: Some(actual),
            message: Some(message),
        }
    }
}

/// 全部检查的汇总报告，顺序与评估顺序一致
#[derive(Debug, Clone, Default)]
pub struct AssertionReport {
    pub checks: Vec<CheckResult>,
}

impl AssertionReport {
    /// 所有已声明检查都通过时为 true；没有任何检查时也为 true
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
