//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `filter`: 重建、过滤并导出结构
//! - `inspect`: 查看单条原始记录及其重建结果
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: filter, inspect

pub mod filter;
pub mod inspect;

use crate::parsers::{TextEncoding, TierPreference};
use clap::{Parser, Subcommand, ValueEnum};

/// crystal-filter - 生成晶体结构的重建、校验与成分过滤
#[derive(Parser)]
#[command(name = "crystal-filter")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Reconstruct, validate and composition-filter generated crystal structures", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Reconstruct raw crystal arrays, filter by site rules and export POSCAR/CIF
    Filter(filter::FilterArgs),

    /// Show one raw record and its reconstruction verdict
    Inspect(inspect::InspectArgs),
}

/// 输入数据布局
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Try per-record layout first, fall back to batched arrays
    #[default]
    Auto,
    /// JSON array of {lengths, angles, atom_types, frac_coords}
    Records,
    /// Concatenated arrays split by num_atoms
    Batched,
}

impl From<InputFormat> for TierPreference {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Auto => TierPreference::Auto,
            InputFormat::Records => TierPreference::Records,
            InputFormat::Batched => TierPreference::Batched,
        }
    }
}

/// 输入文本编码
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Strict UTF-8
    #[default]
    Utf8,
    /// UTF-8 with invalid bytes replaced
    Utf8Lossy,
}

impl From<Encoding> for TextEncoding {
    fn from(e: Encoding) -> Self {
        match e {
            Encoding::Utf8 => TextEncoding::Utf8,
            Encoding::Utf8Lossy => TextEncoding::Utf8Lossy,
        }
    }
}
