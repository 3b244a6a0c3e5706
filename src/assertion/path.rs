use serde_json::Value;

use crate::assertion::types::AssertError;

/// 已解析的 body 路径，如 `user.name`、`orders[0].amount`、`orders[*].amount`
///
/// 支持可选的 `$.` / `$` 前缀；`[*]` 对数组的每个元素展开后继续匹配
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPath {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    /// 对象字段
    Field(String),
    /// 数组下标
    Index(usize),
    /// 数组通配符 [*]
    Wildcard,
}

impl BodyPath {
    pub fn parse(input: &str) -> Result<Self, AssertError> {
        let trimmed = input.trim();
        let stripped = trimmed
            .strip_prefix("$.")
            .or_else(|| trimmed.strip_prefix('$'))
            .unwrap_or(trimmed);

        if stripped.is_empty() {
            return Err(invalid(input, "empty path"));
        }

        let mut segments = Vec::new();
        for part in stripped.split('.') {
            if part.is_empty() {
                return Err(invalid(input, "empty path segment"));
            }
            parse_part(part, &mut segments).map_err(|reason| invalid(input, &reason))?;
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 在 JSON 值上求值，返回所有匹配
    ///
    /// 字段缺失、下标越界、对非数组使用通配符都只是"无匹配"，不是错误
    pub fn query<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![root];

        for segment in &self.segments {
            let mut next = Vec::new();
            for value in current {
                match segment {
                    Segment::Field(name) => {
                        if let Some(v) = value.get(name.as_str()) {
                            next.push(v);
                        }
                    }
                    Segment::Index(i) => {
                        if let Some(v) = value.get(*i) {
                            next.push(v);
                        }
                    }
                    Segment::Wildcard => {
                        if let Some(items) = value.as_array() {
                            next.extend(items.iter());
                        }
                    }
                }
            }
            current = next;
        }

        current
    }
}

fn invalid(path: &str, reason: &str) -> AssertError {
    AssertError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// 解析一个点号分隔段，如 `orders[0][*]`：字段名后跟零或多个方括号访问
fn parse_part(part: &str, segments: &mut Vec<Segment>) -> Result<(), String> {
    let (field, mut rest) = match part.find('[') {
        Some(pos) => (&part[..pos], &part[pos..]),
        None => (part, ""),
    };

    if !field.is_empty() {
        segments.push(Segment::Field(field.to_string()));
    }

    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(format!("unexpected characters '{}'", rest));
        }
        let close = rest
            .find(']')
            .ok_or_else(|| "unterminated '['".to_string())?;
        let token = &rest[1..close];
        if token == "*" {
            segments.push(Segment::Wildcard);
        } else {
            let index: usize = token
                .parse()
                .map_err(|_| format!("invalid array index '{}'", token))?;
            segments.push(Segment::Index(index));
        }
        rest = &rest[close + 1..];
    }

    Ok(())
}
