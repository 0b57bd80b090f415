//! # 解析器模块
//!
//! 读取原始晶体数组和站点规则文件。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: raw

pub mod raw;

pub use raw::{load_raw_file, LoadedRecords, LoaderTier, TextEncoding, TierPreference};

use crate::composition::SiteRules;
use crate::error::{FilterError, Result};
use std::fs;
use std::path::Path;

/// 读取 JSON 站点规则文件
pub fn load_site_rules_file(path: &Path, encoding: TextEncoding) -> Result<SiteRules> {
    let bytes = fs::read(path).map_err(|e| FilterError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let content = encoding
        .decode(&bytes)
        .map_err(|e| FilterError::InvalidArgument(format!("{}: {}", path.display(), e)))?;

    Ok(SiteRules::from_json(&content)?)
}
