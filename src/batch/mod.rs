//! # 批量处理模块
//!
//! 将原始记录批量重建、过滤并统计。
//!
//! ## 功能
//! - 惰性逐条处理，保持输入顺序
//! - 可选并行重建
//! - 失败/拒绝原因汇总与 CSV 报告
//!
//! ## 依赖关系
//! - 被 `commands/filter.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod pipeline;
pub mod report;

pub use pipeline::{
    run_batch, AdmittedStructure, BatchPipeline, PipelineResult, PipelineStats, RecordOutcome,
    Verdict,
};
pub use report::ReportRow;
