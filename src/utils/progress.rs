//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式。
//!
//! ## 依赖关系
//! - 被 `commands/filter.rs` 和 `batch/pipeline.rs` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// 创建标准进度条；空任务返回隐藏的进度条
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    if len == 0 {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");

    ProgressBar::new(len)
        .with_style(style)
        .with_message(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_task_is_hidden() {
        assert!(create_progress_bar(0, "Writing").is_hidden());
        assert_eq!(create_progress_bar(5, "Writing").length(), Some(5));
    }
}
