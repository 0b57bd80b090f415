//! # 周期结构与结构组装
//!
//! 将晶格与 (原子序数, 分数坐标) 序列组装为周期结构。
//!
//! 分数坐标只在晶格平移意义下有定义，组装时统一折回 [0, 1)，
//! 下游（写出器、成分检查）只看到规范代表元。
//!
//! ## 依赖关系
//! - 被 `models/record.rs`、`composition/` 和 `writers/` 使用
//! - 使用 `models/lattice.rs`、`models/element.rs`

use super::element::Element;
use super::lattice::Lattice;
use crate::error::AssemblyError;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// 周期结构
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    lattice: Lattice,
    species: Vec<Element>,
    frac_coords: Vec<[f64; 3]>,
}

impl Structure {
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn species(&self) -> &[Element] {
        &self.species
    }

    pub fn frac_coords(&self) -> &[[f64; 3]] {
        &self.frac_coords
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// (元素, 分数坐标) 迭代器
    pub fn sites(&self) -> impl Iterator<Item = (Element, [f64; 3])> + '_ {
        self.species.iter().copied().zip(self.frac_coords.iter().copied())
    }

    /// 结构中出现的不同元素
    pub fn distinct_elements(&self) -> BTreeSet<Element> {
        self.species.iter().copied().collect()
    }

    /// 各元素原子数（按元素符号排序）
    pub fn element_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for element in &self.species {
            *counts.entry(element.symbol()).or_insert(0) += 1;
        }
        counts
    }

    /// 化学式，如 `Ca2O6Ti2`
    pub fn formula(&self) -> String {
        join_counts(&self.element_counts(), "")
    }

    /// 约化化学式，如 `Ca2O6Ti2` -> `CaO3Ti`
    pub fn reduced_formula(&self) -> String {
        let mut counts = self.element_counts();
        let divisor = counts.values().fold(0, |acc, &n| gcd(acc, n));
        if divisor > 1 {
            counts.values_mut().for_each(|n| *n /= divisor);
        }
        join_counts(&counts, "")
    }

    /// CIF 风格的空格分隔化学式，如 `Ca O3 Ti`
    pub fn formula_sum(&self) -> String {
        join_counts(&self.element_counts(), " ")
    }
}

fn join_counts(counts: &BTreeMap<&str, usize>, sep: &str) -> String {
    counts
        .iter()
        .map(|(el, &count)| {
            if count == 1 {
                el.to_string()
            } else {
                format!("{}{}", el, count)
            }
        })
        .collect::<Vec<_>>()
        .join(sep)
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// 将分数坐标分量折回 [0, 1)
///
/// `x - floor(x)` 对极小的负数会舍入为 1.0，此时取 0.0。
pub fn wrap_fractional(x: f64) -> f64 {
    let w = x - x.floor();
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// 组装周期结构
pub fn assemble_structure(
    lattice: &Lattice,
    atom_types: &[i64],
    frac_coords: &[[f64; 3]],
) -> Result<Structure, AssemblyError> {
    if atom_types.len() != frac_coords.len() {
        return Err(AssemblyError::LengthMismatch {
            species: atom_types.len(),
            coords: frac_coords.len(),
        });
    }

    let mut species = Vec::with_capacity(atom_types.len());
    let mut wrapped = Vec::with_capacity(frac_coords.len());

    for (site, (&id, &coord)) in atom_types.iter().zip(frac_coords).enumerate() {
        let element = Element::from_atomic_number(id).ok_or(AssemblyError::UnknownSpecies(id))?;
        if coord.iter().any(|x| !x.is_finite()) {
            return Err(AssemblyError::NonFiniteCoordinate { site, coord });
        }
        species.push(element);
        wrapped.push(coord.map(wrap_fractional));
    }

    Ok(Structure {
        lattice: lattice.clone(),
        species,
        frac_coords: wrapped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lattice::build_lattice;

    fn cubic() -> Lattice {
        build_lattice([4.0, 4.0, 4.0], [90.0, 90.0, 90.0]).unwrap()
    }

    #[test]
    fn test_assemble_wraps_coordinates() {
        let structure = assemble_structure(
            &cubic(),
            &[20, 22, 8],
            &[[1.25, -0.25, 0.0], [0.5, 0.5, 0.5], [2.0, -3.0, 0.999]],
        )
        .unwrap();

        assert_eq!(structure.len(), 3);
        assert_eq!(structure.frac_coords()[0], [0.25, 0.75, 0.0]);
        assert_eq!(structure.frac_coords()[2], [0.0, 0.0, 0.999]);
        for coord in structure.frac_coords() {
            assert!(coord.iter().all(|&x| (0.0..1.0).contains(&x)));
        }
    }

    #[test]
    fn test_wrap_is_idempotent() {
        for &x in &[0.0, 0.3, 0.999_999, 1.0, 1.7, -0.2, -1e-20, -5.5, 12345.678] {
            let once = wrap_fractional(x);
            assert!((0.0..1.0).contains(&once), "wrap({}) = {}", x, once);
            assert_eq!(wrap_fractional(once), once);
        }
        assert_eq!(wrap_fractional(0.42), 0.42);
    }

    #[test]
    fn test_length_mismatch_precedes_species_mapping() {
        // 999 是未知元素，但长度检查必须先失败
        let err = assemble_structure(
            &cubic(),
            &[999, 22, 8],
            &[[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AssemblyError::LengthMismatch {
                species: 3,
                coords: 2
            }
        );
    }

    #[test]
    fn test_unknown_species() {
        let err = assemble_structure(&cubic(), &[8, 0], &[[0.0; 3], [0.5; 3]]).unwrap_err();
        assert_eq!(err, AssemblyError::UnknownSpecies(0));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let err = assemble_structure(&cubic(), &[8], &[[0.1, f64::INFINITY, 0.2]]).unwrap_err();
        assert!(matches!(err, AssemblyError::NonFiniteCoordinate { site: 0, .. }));
    }

    #[test]
    fn test_formula_and_distinct_elements() {
        let structure = assemble_structure(
            &cubic(),
            &[20, 22, 8, 8, 8],
            &[[0.0; 3], [0.5; 3], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]],
        )
        .unwrap();

        assert_eq!(structure.formula(), "CaO3Ti");
        assert_eq!(structure.reduced_formula(), "CaO3Ti");
        assert_eq!(structure.formula_sum(), "Ca O3 Ti");
        assert_eq!(structure.distinct_elements().len(), 3);
    }

    #[test]
    fn test_reduced_formula_divides_common_factor() {
        let coords = [[0.0; 3]; 10];
        let structure =
            assemble_structure(&cubic(), &[20, 20, 22, 22, 8, 8, 8, 8, 8, 8], &coords).unwrap();

        assert_eq!(structure.formula(), "Ca2O6Ti2");
        assert_eq!(structure.reduced_formula(), "CaO3Ti");
        assert_eq!(structure.formula_sum(), "Ca2 O6 Ti2");

        let empty = assemble_structure(&cubic(), &[], &[]).unwrap();
        assert_eq!(empty.reduced_formula(), "");
    }
}
