//! # 原始晶体数组与重建记录
//!
//! `RawCrystalArray` 是生成模型输出的一条原始数值记录；
//! `CrystalRecord` 包装一次重建尝试及其有效性判定。
//!
//! ## 状态机
//! ```text
//! Pending ──reconstruct──> Constructed   (晶格与结构均构建成功)
//!                     └──> Failed        (任一步失败，记录原因)
//! ```
//! 两个终态都不再迁移；重建是输入的纯函数，不重试。
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs`、`parsers/raw.rs` 和 `commands/` 使用
//! - 使用 `models/lattice.rs`、`models/structure.rs`

use super::lattice::{Lattice, LatticeBuilder};
use super::structure::{assemble_structure, Structure};
use crate::error::AssemblyError;

use serde::{Deserialize, Serialize};

/// 原始晶体数组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCrystalArray {
    /// 边长 a, b, c (Å)
    pub lengths: [f64; 3],
    /// 角度 α, β, γ (度)
    pub angles: [f64; 3],
    /// 原子序数
    pub atom_types: Vec<i64>,
    /// 分数坐标，每个原子一组
    pub frac_coords: Vec<[f64; 3]>,
}

impl RawCrystalArray {
    /// 创建并检查原子数与坐标数一致
    pub fn new(
        lengths: [f64; 3],
        angles: [f64; 3],
        atom_types: Vec<i64>,
        frac_coords: Vec<[f64; 3]>,
    ) -> Result<Self, AssemblyError> {
        if atom_types.len() != frac_coords.len() {
            return Err(AssemblyError::LengthMismatch {
                species: atom_types.len(),
                coords: frac_coords.len(),
            });
        }
        Ok(RawCrystalArray {
            lengths,
            angles,
            atom_types,
            frac_coords,
        })
    }

    pub fn num_atoms(&self) -> usize {
        self.atom_types.len()
    }
}

/// 记录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Pending,
    Constructed,
    Failed,
}

/// 一次重建尝试
#[derive(Debug, Clone, PartialEq)]
pub struct CrystalRecord {
    index: usize,
    raw: RawCrystalArray,
    lattice: Option<Lattice>,
    structure: Option<Structure>,
    state: RecordState,
    invalid_reason: Option<String>,
}

impl CrystalRecord {
    /// 创建待处理记录
    pub fn pending(index: usize, raw: RawCrystalArray) -> Self {
        CrystalRecord {
            index,
            raw,
            lattice: None,
            structure: None,
            state: RecordState::Pending,
            invalid_reason: None,
        }
    }

    /// 执行重建；已处于终态的记录原样返回
    pub fn reconstruct(mut self, builder: &LatticeBuilder) -> Self {
        if self.state != RecordState::Pending {
            return self;
        }

        let lattice = match builder.build(self.raw.lengths, self.raw.angles) {
            Ok(lattice) => lattice,
            Err(e) => return self.fail(e.reason()),
        };

        match assemble_structure(&lattice, &self.raw.atom_types, &self.raw.frac_coords) {
            Ok(structure) => {
                self.lattice = Some(lattice);
                self.structure = Some(structure);
                self.state = RecordState::Constructed;
                self
            }
            Err(e) => {
                self.lattice = Some(lattice);
                self.fail(e.reason())
            }
        }
    }

    fn fail(mut self, reason: &str) -> Self {
        self.structure = None;
        self.state = RecordState::Failed;
        self.invalid_reason = Some(reason.to_string());
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn raw(&self) -> &RawCrystalArray {
        &self.raw
    }

    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    pub fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    /// 取出结构所有权
    pub fn into_structure(self) -> Option<Structure> {
        self.structure
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn constructed(&self) -> bool {
        self.state == RecordState::Constructed
    }

    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid_reason.as_deref()
    }
}

/// 以默认晶格构建器分类一条原始记录
pub fn classify_record(index: usize, raw: RawCrystalArray) -> CrystalRecord {
    CrystalRecord::pending(index, raw).reconstruct(&LatticeBuilder::default())
}
