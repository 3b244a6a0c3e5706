use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::assertion::BodyExpectation;
use crate::error::{Result, RuprobeError};

/// 从文件加载 JSON Schema 文档
///
/// 文档本身是否为合法 schema 在求值时才校验，这里只要求合法 JSON
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        RuprobeError::ConfigError(format!("Failed to read schema file {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        RuprobeError::ConfigError(format!(
            "Schema file {} is not valid JSON: {}",
            path.display(),
            e
        ))
    })
}

/// 从文件加载 body 取值期望
///
/// 文件必须是一个 JSON 对象：键为 body 路径，值为期望值。
/// 例如 `{"user.name": "John Doe", "user.orders[*].amount": [250, 150]}`
pub fn load_body_expectations<P: AsRef<Path>>(path: P) -> Result<Vec<BodyExpectation>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        RuprobeError::ConfigError(format!(
            "Failed to read expectations file {}: {}",
            path.display(),
            e
        ))
    })?;

    let document: Value = serde_json::from_str(&content).map_err(|e| {
        RuprobeError::ConfigError(format!(
            "Expectations file {} is not valid JSON: {}",
            path.display(),
            e
        ))
    })?;

    let Value::Object(entries) = document else {
        return Err(RuprobeError::ConfigError(format!(
            "Expectations file {} must be a JSON object mapping body paths to expected values",
            path.display()
        )));
    };

    Ok(entries
        .into_iter()
        .map(|(path, expected)| BodyExpectation { path, expected })
        .collect())
}
