//! # 结构写出模块
//!
//! 将通过过滤的结构按准入序号写出为 POSCAR 与 CIF 文件。
//!
//! ## 依赖关系
//! - 被 `commands/filter.rs` 使用
//! - 使用 `models/structure.rs`
//! - 子模块: poscar, cif

pub mod cif;
pub mod poscar;

pub use cif::CifWriter;
pub use poscar::PoscarWriter;

use crate::error::{FilterError, Result};
use crate::models::Structure;

use std::fs;
use std::path::{Path, PathBuf};

/// 结构文件写出器
pub trait StructureWriter: Send + Sync {
    /// 以准入序号命名的输出文件名
    fn file_name(&self, admission_index: usize) -> String;

    /// 渲染为文本
    fn render(&self, structure: &Structure, title: &str) -> String;
}

/// 默认写出器: POSCAR + CIF
pub fn default_writers() -> Vec<Box<dyn StructureWriter>> {
    vec![Box::new(PoscarWriter), Box::new(CifWriter)]
}

/// 写出状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Written(PathBuf),
    Skipped(PathBuf),
}

/// 写出一个结构
pub fn write_structure(
    writer: &dyn StructureWriter,
    structure: &Structure,
    admission_index: usize,
    output_dir: &Path,
    overwrite: bool,
) -> Result<WriteStatus> {
    let output_path = output_dir.join(writer.file_name(admission_index));

    // 检查是否需要跳过
    if output_path.exists() && !overwrite {
        return Ok(WriteStatus::Skipped(output_path));
    }

    let content = writer.render(structure, &structure.reduced_formula());

    fs::write(&output_path, content).map_err(|e| FilterError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(WriteStatus::Written(output_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{assemble_structure, build_lattice};

    #[test]
    fn test_existing_file_is_skipped_unless_overwrite() {
        let dir = std::env::temp_dir().join(format!("crystal_filter_write_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let lattice = build_lattice([4.0, 4.0, 4.0], [90.0, 90.0, 90.0]).unwrap();
        let structure = assemble_structure(&lattice, &[20, 8], &[[0.0; 3], [0.5; 3]]).unwrap();
        let expected = dir.join("structure_3.vasp");

        let first = write_structure(&PoscarWriter, &structure, 3, &dir, false).unwrap();
        assert_eq!(first, WriteStatus::Written(expected.clone()));

        fs::write(&expected, "edited").unwrap();
        let second = write_structure(&PoscarWriter, &structure, 3, &dir, false).unwrap();
        assert_eq!(second, WriteStatus::Skipped(expected.clone()));
        assert_eq!(fs::read_to_string(&expected).unwrap(), "edited");

        let third = write_structure(&PoscarWriter, &structure, 3, &dir, true).unwrap();
        assert_eq!(third, WriteStatus::Written(expected.clone()));
        assert!(fs::read_to_string(&expected).unwrap().starts_with("CaO\n"));

        fs::remove_dir_all(&dir).ok();
    }
}
