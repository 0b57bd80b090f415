//! # filter 子命令 CLI 定义
//!
//! 重建原始晶体数组，按站点规则过滤，并将通过的结构写出为 POSCAR/CIF
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/filter.rs`

use super::{Encoding, InputFormat};
use clap::Args;
use std::path::PathBuf;

/// filter 子命令参数
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Input JSON file with raw crystal arrays
    pub input: PathBuf,

    /// Output directory for admitted structures
    #[arg(short, long, default_value = "results/filtered")]
    pub output: PathBuf,

    /// Site rule LABEL=El,El,... (repeatable; default: A=Bi,Pb,Ca B=Fe,Ti X=O)
    #[arg(short, long, conflicts_with = "rules")]
    pub site: Vec<String>,

    /// JSON file mapping site labels to element symbols
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Reject cells with volume below this value in Å³ (0 = only require a positive volume)
    #[arg(long, default_value_t = 0.0)]
    pub min_volume: f64,

    /// Input data layout
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Text encoding of the input and rules files
    #[arg(long, value_enum, default_value = "utf8")]
    pub encoding: Encoding,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Write a per-record CSV report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Only classify and count, do not write structure files
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print the verdict of every record
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
