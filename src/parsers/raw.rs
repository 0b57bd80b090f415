//! # 原始晶体数组加载器
//!
//! 从 JSON 文件读取生成模型输出的原始数值记录。
//!
//! ## 两层加载
//! ```text
//! records  (受限格式): [{"lengths": [..], "angles": [..], "atom_types": [..], "frac_coords": [[..], ..]}, ..]
//! batched  (宽松格式): {"num_atoms": [n1, n2, ..], "lengths": [[..], ..], "angles": [[..], ..],
//!                       "atom_types": [..所有原子..], "frac_coords": [[..], ..所有原子..]}
//! ```
//! 先尝试 records；仅当其返回 `LoadError::UnsupportedFormat` 时才回退到 batched。
//! JSON 语法错误、编码错误不回退。成功的层级返回给调用方。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/record.rs`
//! - 使用 `serde_json`

use crate::error::{FilterError, LoadError, Result};
use crate::models::RawCrystalArray;

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

/// 输入文本编码（显式传给加载器）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// 严格 UTF-8，非法字节报错
    #[default]
    Utf8,
    /// UTF-8，非法字节替换为 U+FFFD
    Utf8Lossy,
}

impl TextEncoding {
    /// 解码字节，去除 UTF-8 BOM
    pub fn decode(self, bytes: &[u8]) -> std::result::Result<Cow<'_, str>, LoadError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| LoadError::Encoding {
                    offset: e.valid_up_to(),
                }),
            TextEncoding::Utf8Lossy => Ok(String::from_utf8_lossy(bytes)),
        }
    }
}

/// 加载层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderTier {
    Records,
    Batched,
}

impl fmt::Display for LoaderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderTier::Records => write!(f, "records"),
            LoaderTier::Batched => write!(f, "batched"),
        }
    }
}

/// 层级选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierPreference {
    /// records 优先，UnsupportedFormat 时回退 batched
    #[default]
    Auto,
    Records,
    Batched,
}

/// 加载结果
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<RawCrystalArray>,
    /// 实际成功的层级
    pub tier: LoaderTier,
}

/// 读取并解析原始记录文件
pub fn load_raw_file(
    path: &Path,
    encoding: TextEncoding,
    preference: TierPreference,
) -> Result<LoadedRecords> {
    if !path.exists() {
        return Err(FilterError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|e| FilterError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let load_failed = |source: LoadError| FilterError::LoadFailed {
        path: path.display().to_string(),
        source,
    };

    let content = encoding.decode(&bytes).map_err(load_failed)?;
    parse_raw_content(&content, preference).map_err(load_failed)
}

/// 从字符串内容解析原始记录
pub fn parse_raw_content(
    content: &str,
    preference: TierPreference,
) -> std::result::Result<LoadedRecords, LoadError> {
    let value: Value = serde_json::from_str(content)?;

    match preference {
        TierPreference::Records => Ok(LoadedRecords {
            records: parse_records_tier(&value)?,
            tier: LoaderTier::Records,
        }),
        TierPreference::Batched => Ok(LoadedRecords {
            records: parse_batched_tier(&value)?,
            tier: LoaderTier::Batched,
        }),
        TierPreference::Auto => match parse_records_tier(&value) {
            Ok(records) => Ok(LoadedRecords {
                records,
                tier: LoaderTier::Records,
            }),
            Err(LoadError::UnsupportedFormat { .. }) => Ok(LoadedRecords {
                records: parse_batched_tier(&value)?,
                tier: LoaderTier::Batched,
            }),
            Err(e) => Err(e),
        },
    }
}

/// 受限格式：逐条记录数组，不允许多余字段
fn parse_records_tier(value: &Value) -> std::result::Result<Vec<RawCrystalArray>, LoadError> {
    if !value.is_array() {
        return Err(LoadError::UnsupportedFormat {
            tier: "records",
            reason: "top-level value is not an array".to_string(),
        });
    }

    Vec::<RawCrystalArray>::deserialize(value).map_err(|e| LoadError::UnsupportedFormat {
        tier: "records",
        reason: e.to_string(),
    })
}

/// 批量拼接数组
#[derive(Debug, Deserialize)]
struct BatchedArrays {
    num_atoms: Vec<usize>,
    lengths: Vec<[f64; 3]>,
    angles: Vec<[f64; 3]>,
    atom_types: Vec<i64>,
    frac_coords: Vec<[f64; 3]>,
}

/// 宽松格式：按 num_atoms 切分拼接数组
fn parse_batched_tier(value: &Value) -> std::result::Result<Vec<RawCrystalArray>, LoadError> {
    let arrays = BatchedArrays::deserialize(value).map_err(|e| LoadError::UnsupportedFormat {
        tier: "batched",
        reason: e.to_string(),
    })?;

    let n = arrays.num_atoms.len();
    if arrays.lengths.len() != n || arrays.angles.len() != n {
        return Err(LoadError::Inconsistent(format!(
            "{} structures in num_atoms but {} lengths and {} angles",
            n,
            arrays.lengths.len(),
            arrays.angles.len()
        )));
    }

    let total = arrays
        .num_atoms
        .iter()
        .try_fold(0usize, |acc, &count| acc.checked_add(count))
        .ok_or_else(|| LoadError::Inconsistent("num_atoms sum overflows".to_string()))?;
    if arrays.atom_types.len() != total || arrays.frac_coords.len() != total {
        return Err(LoadError::Inconsistent(format!(
            "num_atoms sums to {} but got {} atom types and {} coordinates",
            total,
            arrays.atom_types.len(),
            arrays.frac_coords.len()
        )));
    }

    let mut records = Vec::with_capacity(n);
    let mut start = 0;
    for (i, &count) in arrays.num_atoms.iter().enumerate() {
        let end = start + count;
        records.push(RawCrystalArray {
            lengths: arrays.lengths[i],
            angles: arrays.angles[i],
            atom_types: arrays.atom_types[start..end].to_vec(),
            frac_coords: arrays.frac_coords[start..end].to_vec(),
        });
        start = end;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDS: &str = r#"[
        {"lengths": [3.9, 3.9, 3.9], "angles": [90, 90, 90],
         "atom_types": [20, 22, 8], "frac_coords": [[0, 0, 0], [0.5, 0.5, 0.5], [0.5, 0.5, 0]]},
        {"lengths": [4.0, 4.0, 4.0], "angles": [90, 90, 90],
         "atom_types": [8], "frac_coords": [[0.1, 0.2, 0.3]]}
    ]"#;

    const BATCHED: &str = r#"{
        "num_atoms": [2, 1],
        "lengths": [[3.9, 3.9, 3.9], [4.0, 4.0, 4.0]],
        "angles": [[90, 90, 90], [90, 90, 120]],
        "atom_types": [20, 8, 22],
        "frac_coords": [[0, 0, 0], [0.5, 0.5, 0.5], [0.25, 0.25, 0.25]],
        "sample_id": "run-3"
    }"#;

    #[test]
    fn test_records_tier() {
        let loaded = parse_raw_content(RECORDS, TierPreference::Auto).unwrap();
        assert_eq!(loaded.tier, LoaderTier::Records);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].atom_types, vec![20, 22, 8]);
        assert_eq!(loaded.records[1].frac_coords, vec![[0.1, 0.2, 0.3]]);
    }

    #[test]
    fn test_auto_falls_back_to_batched() {
        let loaded = parse_raw_content(BATCHED, TierPreference::Auto).unwrap();
        assert_eq!(loaded.tier, LoaderTier::Batched);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].atom_types, vec![20, 8]);
        assert_eq!(loaded.records[1].atom_types, vec![22]);
        assert_eq!(loaded.records[1].angles, [90.0, 90.0, 120.0]);
    }

    #[test]
    fn test_forced_records_tier_does_not_fall_back() {
        let err = parse_raw_content(BATCHED, TierPreference::Records).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { tier: "records", .. }));
    }

    #[test]
    fn test_records_with_extra_fields_are_unsupported() {
        let content = r#"[{"lengths": [1, 1, 1], "angles": [90, 90, 90],
            "atom_types": [8], "frac_coords": [[0, 0, 0]], "energy": -3.2}]"#;
        let err = parse_raw_content(content, TierPreference::Records).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));

        // 回退层同样不支持该布局
        let err = parse_raw_content(content, TierPreference::Auto).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { tier: "batched", .. }));
    }

    #[test]
    fn test_malformed_json_is_not_a_fallback_case() {
        let err = parse_raw_content("[{\"lengths\": ", TierPreference::Auto).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_inconsistent_batched_arrays() {
        let content = r#"{"num_atoms": [3], "lengths": [[1, 1, 1]], "angles": [[90, 90, 90]],
            "atom_types": [8, 8], "frac_coords": [[0, 0, 0], [0.5, 0.5, 0.5]]}"#;
        let err = parse_raw_content(content, TierPreference::Batched).unwrap_err();
        assert!(matches!(err, LoadError::Inconsistent(_)));
    }

    #[test]
    fn test_overflowing_num_atoms_is_inconsistent() {
        let content = r#"{"num_atoms": [18446744073709551615, 2], "lengths": [[1, 1, 1], [1, 1, 1]],
            "angles": [[90, 90, 90], [90, 90, 90]], "atom_types": [8], "frac_coords": [[0, 0, 0]]}"#;
        let err = parse_raw_content(content, TierPreference::Batched).unwrap_err();
        assert!(matches!(err, LoadError::Inconsistent(_)));
    }

    #[test]
    fn test_mismatched_record_loads_unchecked() {
        let content = r#"[{"lengths": [1, 1, 1], "angles": [90, 90, 90],
            "atom_types": [8, 8], "frac_coords": [[0, 0, 0]]}]"#;
        let loaded = parse_raw_content(content, TierPreference::Auto).unwrap();
        assert_eq!(loaded.records[0].num_atoms(), 2);
        assert_eq!(loaded.records[0].frac_coords.len(), 1);
    }

    #[test]
    fn test_encoding_strips_bom_and_handles_invalid_bytes() {
        let bytes = b"\xEF\xBB\xBF[]";
        assert_eq!(TextEncoding::Utf8.decode(bytes).unwrap(), "[]");

        let invalid = b"[\xFF]";
        assert!(matches!(
            TextEncoding::Utf8.decode(invalid),
            Err(LoadError::Encoding { offset: 1 })
        ));
        assert_eq!(TextEncoding::Utf8Lossy.decode(invalid).unwrap(), "[\u{FFFD}]");
    }
}
