//! # crystal-filter - 生成晶体结构的重建、校验与成分过滤
//!
//! 读取生成模型输出的原始数值晶体（晶格参数 + 原子序数 + 分数坐标），
//! 重建周期结构并判定其有效性，按站点规则过滤成分，最后写出 POSCAR 与 CIF。
//!
//! ## 核心入口
//! - `models::build_lattice` / `models::LatticeBuilder` - 晶格构建与校验
//! - `models::assemble_structure` - 结构组装与坐标折回
//! - `models::classify_record` - 单条记录重建
//! - `composition::is_admissible` - 成分判定
//! - `batch::run_batch` / `batch::BatchPipeline` - 批量流水线
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── cli/          (命令行参数定义)
//!   ├── commands/     (命令执行逻辑)
//!   │     ├── parsers/     (原始数据与规则加载)
//!   │     ├── batch/       (重建-过滤流水线)
//!   │     ├── composition/ (站点规则与成分判定)
//!   │     ├── writers/     (POSCAR / CIF 写出)
//!   │     └── models/      (元素、晶格、结构、记录)
//!   ├── utils/        (工具函数)
//!   └── error.rs      (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod composition;
pub mod error;
pub mod models;
pub mod parsers;
pub mod utils;
pub mod writers;

pub use error::{FilterError, Result};
