//! # 美化输出工具
//!
//! 统一的终端状态行：`[OK]`、`[ERR]`、`[WARN]`、`[*]`、`[SKIP]`、`[DONE]`。
//! 错误写到 stderr，其余写到 stdout。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};

/// 状态行级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
    Skip,
    Done,
}

impl Level {
    fn tag(self) -> ColoredString {
        match self {
            Level::Success => "[OK]".green().bold(),
            Level::Error => "[ERR]".red().bold(),
            Level::Warning => "[WARN]".yellow().bold(),
            Level::Info => "[*]".blue().bold(),
            Level::Skip => "[SKIP]".dimmed(),
            Level::Done => "[DONE]".green().bold(),
        }
    }
}

/// 格式化一条状态行
pub fn format_line(level: Level, msg: &str) -> String {
    format!("{} {}", level.tag(), msg)
}

fn emit(level: Level, msg: &str) {
    let line = format_line(level, msg);
    if level == Level::Error {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

pub fn print_success(msg: &str) {
    emit(Level::Success, msg);
}

pub fn print_error(msg: &str) {
    emit(Level::Error, msg);
}

pub fn print_warning(msg: &str) {
    emit(Level::Warning, msg);
}

pub fn print_info(msg: &str) {
    emit(Level::Info, msg);
}

pub fn print_skip(msg: &str) {
    emit(Level::Skip, msg);
}

pub fn print_done(msg: &str) {
    emit(Level::Done, msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_carry_tags() {
        colored::control::set_override(false);
        assert_eq!(
            format_line(Level::Skip, "Structure 3: composition not valid"),
            "[SKIP] Structure 3: composition not valid"
        );
        assert_eq!(format_line(Level::Info, "Loaded 2"), "[*] Loaded 2");
        colored::control::unset_override();
    }
}
