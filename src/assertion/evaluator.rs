use serde_json::Value;

use crate::assertion::path::BodyPath;
use crate::assertion::schema::validate_schema;
use crate::assertion::types::{
    AssertError, AssertionReport, AssertionSpec, CheckKind, CheckResult, HeaderExpectation,
};
use crate::http::response::ResponseData;
use crate::runner::types::RequestOutcome;

/// 对请求结果评估所有已声明的检查
///
/// 评估顺序固定：status → header → schema → body 路径。
/// 检查之间互不影响，前面的失败不会阻止后面的检查继续执行，
/// 调用方能一次看到全部失败。
///
/// Failure 结果只产生一条 "request" 检查，不再做逐项检查；
/// 声明本身无效（schema 编译失败、路径语法错误）时返回配置错误
pub fn evaluate(
    outcome: &RequestOutcome,
    spec: &AssertionSpec,
) -> Result<AssertionReport, AssertError> {
    let response = match outcome {
        RequestOutcome::Failure {
            error, attempts, ..
        } => {
            let message = format!("Request failed after {} attempt(s): {}", attempts, error);
            return Ok(AssertionReport {
                checks: vec![CheckResult::failure(
                    CheckKind::Request,
                    "request".to_string(),
                    "a response".to_string(),
                    "no response".to_string(),
                    message,
                )],
            });
        }
        RequestOutcome::Success { response, .. } => response,
    };

    // 路径先整体解析，坏路径属于配置错误而不是断言失败
    let paths = spec
        .body_values
        .iter()
        .map(|e| BodyPath::parse(&e.path).map(|p| (p, &e.expected)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut checks = Vec::new();

    if let Some(expected) = spec.status {
        checks.push(check_status(response, expected));
    }

    if let Some(header) = &spec.header {
        checks.push(check_header(response, header));
    }

    if let Some(schema) = &spec.schema {
        checks.push(check_schema(response, schema)?);
    }

    if !paths.is_empty() {
        // 非 JSON body 会让每个路径检查失败，但不会中断评估
        let body = response.json().ok();
        for (path, expected) in &paths {
            checks.push(check_body_value(body.as_ref(), path, expected));
        }
    }

    Ok(AssertionReport { checks })
}

fn check_status(response: &ResponseData, expected: u16) -> CheckResult {
    let actual = response.status.code();
    if actual == expected {
        CheckResult::success(
            CheckKind::Status,
            "status".to_string(),
            expected.to_string(),
            actual.to_string(),
        )
    } else {
        let message = format!("Expected status to be {}, but got {}", expected, actual);
        CheckResult::failure(
            CheckKind::Status,
            "status".to_string(),
            expected.to_string(),
            actual.to_string(),
            message,
        )
    }
}

fn check_header(response: &ResponseData, expectation: &HeaderExpectation) -> CheckResult {
    let subject = format!("header {}", expectation.name.to_lowercase());

    match response.headers.get(expectation.name.as_str()) {
        Some(value) => {
            let actual = value.to_str().unwrap_or("<invalid utf-8>").to_string();
            if actual == expectation.value {
                CheckResult::success(CheckKind::Header, subject, expectation.value.clone(), actual)
            } else {
                let message = format!(
                    "Expected header '{}' to be '{}', but got '{}'",
                    expectation.name, expectation.value, actual
                );
                CheckResult::failure(
                    CheckKind::Header,
                    subject,
                    expectation.value.clone(),
                    actual,
                    message,
                )
            }
        }
        None => {
            let message = format!("Header '{}' not found in response", expectation.name);
            CheckResult::failure(
                CheckKind::Header,
                subject,
                expectation.value.clone(),
                "not found".to_string(),
                message,
            )
        }
    }
}

fn check_schema(response: &ResponseData, schema: &Value) -> Result<CheckResult, AssertError> {
    let subject = "schema".to_string();
    let expected = "body matching schema".to_string();

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(v) => v,
        Err(e) => {
            let message = format!("Response body is not valid JSON: {}", e);
            return Ok(CheckResult::failure(
                CheckKind::Schema,
                subject,
                expected,
                "invalid JSON body".to_string(),
                message,
            ));
        }
    };

    let violations = validate_schema(schema, &body)?;
    if violations.is_empty() {
        Ok(CheckResult::success(
            CheckKind::Schema,
            subject,
            expected,
            "valid".to_string(),
        ))
    } else {
        let message = violations.join("; ");
        Ok(CheckResult::failure(
            CheckKind::Schema,
            subject,
            expected,
            format!("{} violation(s)", violations.len()),
            message,
        ))
    }
}

fn check_body_value(body: Option<&Value>, path: &BodyPath, expected: &Value) -> CheckResult {
    let subject = format!("body {}", path.as_str());
    let expected_str = expected.to_string();

    let Some(body) = body else {
        return CheckResult::failure(
            CheckKind::BodyValue,
            subject,
            expected_str,
            "invalid JSON body".to_string(),
            "Response body is not valid JSON".to_string(),
        );
    };

    let matches = path.query(body);
    if matches.is_empty() {
        let message = format!("Path '{}' not found in response body", path.as_str());
        return CheckResult::failure(
            CheckKind::BodyValue,
            subject,
            expected_str,
            "not found".to_string(),
            message,
        );
    }

    match expected {
        // 期望数组：提取值作为整体做子集检查
        Value::Array(items) => {
            let extracted = flatten_matches(&matches);
            let actual_str = render_values(&extracted);
            let missing: Vec<&Value> = items
                .iter()
                .filter(|item| !extracted.iter().any(|v| values_equal(v, item)))
                .collect();

            if missing.is_empty() {
                CheckResult::success(CheckKind::BodyValue, subject, expected_str, actual_str)
            } else {
                let message = format!(
                    "Expected '{}' to contain {}, but {} missing from {}",
                    path.as_str(),
                    expected_str,
                    render_values(&missing),
                    actual_str
                );
                CheckResult::failure(CheckKind::BodyValue, subject, expected_str, actual_str, message)
            }
        }
        // 期望标量：与第一个匹配比较
        _ => {
            let actual = matches[0];
            let actual_str = actual.to_string();
            if values_equal(actual, expected) {
                CheckResult::success(CheckKind::BodyValue, subject, expected_str, actual_str)
            } else {
                let message = format!(
                    "Expected '{}' to be {}, but got {}",
                    path.as_str(),
                    expected_str,
                    actual_str
                );
                CheckResult::failure(CheckKind::BodyValue, subject, expected_str, actual_str, message)
            }
        }
    }
}

/// 子集检查面对的"提取数组"：单个数组匹配展开为其元素，多匹配（通配符投影）原样使用
fn flatten_matches<'a>(matches: &[&'a Value]) -> Vec<&'a Value> {
    match matches {
        [single] => match single.as_array() {
            Some(items) => items.iter().collect(),
            None => vec![*single],
        },
        _ => matches.to_vec(),
    }
}

/// 数字按数值比较（250 与 250.0 相等），其余类型按结构相等
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a == b,
    }
}

fn render_values(values: &[&Value]) -> String {
    Value::Array(values.iter().map(|v| (*v).clone()).collect()).to_string()
}
