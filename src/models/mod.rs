//! # 数据模型模块
//!
//! 定义元素、晶格、周期结构与重建记录。
//!
//! ## 依赖关系
//! - 被 `composition/`、`batch/`、`parsers/`、`writers/` 和 `commands/` 使用
//! - 子模块: element, lattice, structure, record

pub mod element;
pub mod lattice;
pub mod record;
pub mod structure;

pub use element::Element;
pub use lattice::{build_lattice, Lattice, LatticeBuilder};
pub use record::{classify_record, CrystalRecord, RawCrystalArray, RecordState};
pub use structure::{assemble_structure, wrap_fractional, Structure};
