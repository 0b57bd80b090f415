//! # crystal-filter 命令行入口
//!
//! ## 子命令
//! - `filter`  - 批量重建、过滤并导出
//! - `inspect` - 查看单条记录及其重建结果
//!
//! ## 依赖关系
//! - 使用 `crystal_filter::cli` 解析参数
//! - 使用 `crystal_filter::commands` 执行命令

use clap::Parser;
use crystal_filter::cli::Cli;
use crystal_filter::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
