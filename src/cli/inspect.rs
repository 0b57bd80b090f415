//! # inspect 子命令 CLI 定义
//!
//! 查看单条原始记录及其重建结果
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use super::{Encoding, InputFormat};
use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input JSON file with raw crystal arrays
    pub input: PathBuf,

    /// Zero-based record index
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Input data layout
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Text encoding of the input file
    #[arg(long, value_enum, default_value = "utf8")]
    pub encoding: Encoding,
}
