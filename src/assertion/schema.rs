use serde_json::Value;

use crate::assertion::types::AssertError;

/// 用声明的 JSON Schema 校验 body，返回违规条目列表（为空即通过）
///
/// 每次调用都重新编译 schema，不保留任何跨调用的校验器状态。
/// schema 文档本身无法编译时返回配置错误
pub fn validate_schema(schema: &Value, body: &Value) -> Result<Vec<String>, AssertError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| AssertError::InvalidSchema(e.to_string()))?;

    let violations = validator
        .iter_errors(body)
        .map(|err| {
            let location = err.instance_path.to_string();
            if location.is_empty() {
                format!("<root>: {}", err)
            } else {
                format!("{}: {}", location, err)
            }
        })
        .collect();

    Ok(violations)
}
