/// 断言模块 - 对请求结果评估声明式检查
mod evaluator;
mod path;
mod schema;
mod types;

pub use evaluator::evaluate;
pub use path::BodyPath;
pub use schema::validate_schema;
pub use types::{
    AssertError, AssertionReport, AssertionSpec, BodyExpectation, CheckKind, CheckResult,
    HeaderExpectation,
};
