use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别
/// 默认级别: info（--verbose 时提升为 debug）
///
/// 示例:
/// - RUST_LOG=debug ruprobe ...
/// - RUST_LOG=trace ruprobe ...
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 日志走 stderr，stdout 留给结果输出
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logger initialized");
}
