//! # 化学元素
//!
//! 原子序数与元素符号的双向映射 (Z = 1..=118)。
//!
//! ## 依赖关系
//! - 被 `models/structure.rs` 和 `composition/` 使用
//! - 纯静态数据，无外部依赖

use serde::{Deserialize, Serialize};
use std::fmt;

/// 元素符号表，下标 = 原子序数 - 1
const SYMBOLS: [&str; 118] = [
    "H", "He", //
    "Li", "Be", "B", "C", "N", "O", "F", "Ne", //
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", //
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr", //
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe", //
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    //
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 化学元素（以原子序数存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Element(u8);

impl Element {
    /// 由原子序数创建，未知序数返回 None
    pub fn from_atomic_number(z: i64) -> Option<Self> {
        if (1..=SYMBOLS.len() as i64).contains(&z) {
            Some(Element(z as u8))
        } else {
            None
        }
    }

    /// 由元素符号创建（区分大小写，如 "Ti"）
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .map(|i| Element(i as u8 + 1))
    }

    pub fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[self.0 as usize - 1]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<String> for Element {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Element::from_symbol(value.trim()).ok_or_else(|| format!("unknown element '{}'", value))
    }
}

impl From<Element> for String {
    fn from(e: Element) -> Self {
        e.symbol().to_string()
    }
}
