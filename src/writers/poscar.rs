//! # VASP POSCAR 写出器
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Direct                 # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! 原子按元素首次出现的顺序分组。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use super::StructureWriter;
use crate::models::{Element, Structure};

use std::collections::BTreeMap;

pub struct PoscarWriter;

impl StructureWriter for PoscarWriter {
    fn file_name(&self, admission_index: usize) -> String {
        format!("structure_{}.vasp", admission_index)
    }

    fn render(&self, structure: &Structure, title: &str) -> String {
        to_poscar_string(structure, title)
    }
}

/// 将 Structure 转换为 POSCAR 格式字符串
pub fn to_poscar_string(structure: &Structure, title: &str) -> String {
    // 按元素分组统计
    let mut elem_order: Vec<Element> = Vec::new();
    let mut elem_atoms: BTreeMap<Element, Vec<[f64; 3]>> = BTreeMap::new();

    for (element, position) in structure.sites() {
        if !elem_order.contains(&element) {
            elem_order.push(element);
        }
        elem_atoms.entry(element).or_default().push(position);
    }

    let mut result = String::new();

    // Line 0: Comment
    result.push_str(&format!("{}\n", title));

    // Line 1: Scale
    result.push_str("1.0\n");

    // Lines 2-4: Lattice
    for row in structure.lattice().matrix() {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    // Line 5: Elements
    let symbols: Vec<&str> = elem_order.iter().map(|e| e.symbol()).collect();
    result.push_str(&format!("   {}\n", symbols.join("   ")));

    // Line 6: Counts
    let counts: Vec<String> = elem_order
        .iter()
        .map(|e| elem_atoms.get(e).map(|v| v.len()).unwrap_or(0).to_string())
        .collect();
    result.push_str(&format!("   {}\n", counts.join("   ")));

    // Coordinate type
    result.push_str("Direct\n");

    // Atom positions
    for elem in &elem_order {
        if let Some(positions) = elem_atoms.get(elem) {
            for pos in positions {
                result.push_str(&format!(
                    "  {:16.10}  {:16.10}  {:16.10}\n",
                    pos[0], pos[1], pos[2]
                ));
            }
        }
    }

    result
}
