use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use crate::assertion::AssertionReport;
use crate::http::RequestDescriptor;
use crate::runner::{RequestOutcome, RetryPolicy};

/// 结果输出器：请求行、响应摘要、断言表格与汇总
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// 打印即将发出的请求
    pub fn print_request(&self, request: &RequestDescriptor, policy: &RetryPolicy) {
        let attempts_part = if policy.max_attempts > 1 {
            format!(" (up to {} attempts)", policy.max_attempts)
                .dimmed()
                .to_string()
        } else {
            String::new()
        };

        println!(
            "{} {}{}",
            request.method.as_str().cyan(),
            request.url.as_str(),
            attempts_part
        );
    }

    /// 打印请求结果
    pub fn print_outcome(&self, outcome: &RequestOutcome) {
        match outcome {
            RequestOutcome::Success { response, elapsed } => {
                let status_line = format!(
                    "HTTP {} {}",
                    response.status.code(),
                    response.status.reason_phrase()
                );
                let colored_status_line = if response.is_success() {
                    status_line.green()
                } else if response.is_client_error() {
                    status_line.yellow()
                } else {
                    status_line.red()
                };
                println!(
                    "{} {}",
                    colored_status_line,
                    format!("({}ms)", elapsed.as_millis()).cyan()
                );

                if self.verbose {
                    println!();
                    println!("{}", "Headers:".blue().bold());
                    for (key, value) in response.headers.iter() {
                        let value_str = value.to_str().unwrap_or("<invalid utf-8>");
                        println!("   {}", format!("{}: {}", key, value_str).blue());
                    }

                    if !response.body.is_empty() {
                        println!();
                        println!("{}", "Body:".blue().bold());
                        // 尝试格式化 JSON，失败则显示原始内容
                        let formatted = try_format_json(&response.body)
                            .unwrap_or_else(|_| response.body.clone());
                        println!("{}", formatted);
                    }
                } else if !response.body.is_empty() {
                    // 紧凑模式下短 body 直接展示，长 body 只报大小
                    if response.body.len() < 200 {
                        let formatted = try_format_json(&response.body)
                            .unwrap_or_else(|_| response.body.clone());
                        println!("{}", formatted);
                    } else {
                        println!("Body: {} bytes", response.body.len());
                    }
                }
            }
            RequestOutcome::Failure {
                error,
                attempts,
                elapsed,
            } => {
                println!(
                    "{} {} {}",
                    "✗".red(),
                    format!("Request failed after {} attempt(s)", attempts)
                        .red()
                        .bold(),
                    format!("({}ms)", elapsed.as_millis()).dimmed()
                );
                println!("   {}: {}", "Error".red().bold(), error);
            }
        }
    }

    /// 打印断言结果表格与汇总
    pub fn print_report(&self, report: &AssertionReport) {
        if report.is_empty() {
            return;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["", "Check", "Expected", "Actual"]);

        for check in &report.checks {
            let (symbol, color) = if check.passed {
                ("✓", Color::Green)
            } else {
                ("✗", Color::Red)
            };

            let mut actual_cell = Cell::new(check.actual.as_deref().unwrap_or("-"));
            if check.passed {
                actual_cell = actual_cell.add_attribute(Attribute::Dim);
            }

            table.add_row(vec![
                Cell::new(symbol).fg(color),
                Cell::new(&check.subject),
                Cell::new(&check.expected),
                actual_cell,
            ]);
        }

        println!("\n{}", table);

        // 失败详情在表格之后逐条列出
        for check in report.checks.iter().filter(|c| !c.passed) {
            if let Some(message) = &check.message {
                println!(" {} {}", "✗".red(), message.red());
            }
        }

        println!("\n{}", "━".repeat(50));
        let passed = report.passed_count();
        let failed = report.failed_count();
        if failed == 0 {
            println!(
                "  {}: {} passed, {} total",
                "Assertions".bold(),
                passed.to_string().green(),
                report.checks.len()
            );
        } else {
            println!(
                "  {}: {} passed, {} failed, {} total",
                "Assertions".bold(),
                passed.to_string().green(),
                failed.to_string().red(),
                report.checks.len()
            );
        }
        println!("{}", "━".repeat(50));
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(false)
    }
}

/// 尝试将 body 格式化为漂亮的 JSON
/// 如果不是有效的 JSON，返回错误
fn try_format_json(body: &str) -> anyhow::Result<String> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    serde_json::to_string_pretty(&value).map_err(Into::into)
}
