mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use colored::Colorize;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志系统
    ruprobe::logger::init_logger(cli.verbose);

    match cli::run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(cli::EXIT_CONFIG_ERROR)
        }
    }
}
