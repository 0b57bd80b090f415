//! # 统一错误处理模块
//!
//! 定义 crystal-filter 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分层
//! - `GeometryError` / `AssemblyError`: 单条记录级别，可恢复（记录标记为 Failed）
//! - `ConfigError`: 站点规则配置错误，在流水线启动时校验，直接终止
//! - `LoadError`: 原始数据加载错误
//! - `FilterError`: 命令层统一错误
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

// ─────────────────────────────────────────────────────────────
// 晶格构建错误
// ─────────────────────────────────────────────────────────────

/// 晶格参数校验失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("lattice length {index} is not positive and finite: {value}")]
    NonPositiveLength { index: usize, value: f64 },

    #[error("lattice angle {index} is outside (0, 180) degrees: {value}")]
    AngleOutOfRange { index: usize, value: f64 },

    #[error("degenerate cell (radicand {radicand}, volume {volume})")]
    DegenerateCell { radicand: f64, volume: f64 },

    #[error("cell volume {volume} is below the threshold {min}")]
    VolumeBelowThreshold { volume: f64, min: f64 },
}

impl GeometryError {
    /// 稳定的失败原因字符串（不含数值）
    pub fn reason(&self) -> &'static str {
        match self {
            GeometryError::NonPositiveLength { .. } => "lattice: non-positive length",
            GeometryError::AngleOutOfRange { .. } => "lattice: angle out of range",
            GeometryError::DegenerateCell { .. } => "lattice: degenerate cell",
            GeometryError::VolumeBelowThreshold { .. } => "lattice: unrealistically small cell",
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 结构组装错误
// ─────────────────────────────────────────────────────────────

/// 结构组装失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("{species} atom types but {coords} coordinate triples")]
    LengthMismatch { species: usize, coords: usize },

    #[error("unknown species identifier: {0}")]
    UnknownSpecies(i64),

    #[error("non-finite fractional coordinate at site {site}: {coord:?}")]
    NonFiniteCoordinate { site: usize, coord: [f64; 3] },
}

impl AssemblyError {
    /// 稳定的失败原因字符串（不含数值）
    pub fn reason(&self) -> &'static str {
        match self {
            AssemblyError::LengthMismatch { .. } => "assembly: length mismatch",
            AssemblyError::UnknownSpecies(_) => "assembly: unknown species",
            AssemblyError::NonFiniteCoordinate { .. } => "assembly: non-finite coordinate",
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 配置错误
// ─────────────────────────────────────────────────────────────

/// 站点规则配置错误（启动时致命）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("site rules define no sites")]
    NoSites,

    #[error("site '{0}' has no admissible elements")]
    EmptySite(String),

    #[error("site '{site}' lists unknown element symbol '{symbol}'")]
    UnknownElement { site: String, symbol: String },

    #[error("site '{0}' is defined more than once")]
    DuplicateSite(String),

    #[error("malformed site rule '{0}' (expected LABEL=El,El,...)")]
    MalformedRule(String),
}

// ─────────────────────────────────────────────────────────────
// 数据加载错误
// ─────────────────────────────────────────────────────────────

/// 原始数据加载错误
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("input is not valid UTF-8 (byte offset {offset})")]
    Encoding { offset: usize },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// 数据是合法 JSON，但不是该层加载器支持的布局
    #[error("unsupported {tier} layout: {reason}")]
    UnsupportedFormat { tier: &'static str, reason: String },

    #[error("inconsistent batched arrays: {0}")]
    Inconsistent(String),
}

// ─────────────────────────────────────────────────────────────
// 命令层统一错误
// ─────────────────────────────────────────────────────────────

/// crystal-filter 统一错误类型
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to load raw crystals from {path}\nReason: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: LoadError,
    },

    #[error("Invalid site rules: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons_are_stage_prefixed() {
        let g = GeometryError::DegenerateCell {
            radicand: -0.5,
            volume: f64::NAN,
        };
        assert_eq!(g.reason(), "lattice: degenerate cell");

        let a = AssemblyError::LengthMismatch {
            species: 3,
            coords: 2,
        };
        assert_eq!(a.reason(), "assembly: length mismatch");
        assert!(a.to_string().contains("3 atom types"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: FilterError = ConfigError::NoSites.into();
        assert!(err.to_string().contains("no sites"));
    }
}
