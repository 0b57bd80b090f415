//! # CIF 写出器
//!
//! 写出 P1 空间群的 CIF，原子位点逐个列出。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use super::StructureWriter;
use crate::models::Structure;

pub struct CifWriter;

impl StructureWriter for CifWriter {
    fn file_name(&self, admission_index: usize) -> String {
        format!("structure_{}.cif", admission_index)
    }

    fn render(&self, structure: &Structure, title: &str) -> String {
        to_cif_string(structure, title)
    }
}

/// 转换为 CIF 格式
pub fn to_cif_string(structure: &Structure, title: &str) -> String {
    let (a, b, c, alpha, beta, gamma) = structure.lattice().parameters();

    let mut result = String::new();
    result.push_str(&format!("data_{}\n", title.replace(char::is_whitespace, "_")));
    result.push_str("_symmetry_space_group_name_H-M    'P 1'\n");
    result.push_str("_symmetry_Int_Tables_number       1\n\n");

    result.push_str(&format!("_cell_length_a    {:.6}\n", a));
    result.push_str(&format!("_cell_length_b    {:.6}\n", b));
    result.push_str(&format!("_cell_length_c    {:.6}\n", c));
    result.push_str(&format!("_cell_angle_alpha {:.4}\n", alpha));
    result.push_str(&format!("_cell_angle_beta  {:.4}\n", beta));
    result.push_str(&format!("_cell_angle_gamma {:.4}\n", gamma));
    result.push_str(&format!("_cell_volume      {:.6}\n", structure.lattice().volume()));
    result.push_str(&format!("_chemical_formula_sum '{}'\n\n", structure.formula_sum()));

    result.push_str("loop_\n");
    result.push_str("_atom_site_label\n");
    result.push_str("_atom_site_type_symbol\n");
    result.push_str("_atom_site_fract_x\n");
    result.push_str("_atom_site_fract_y\n");
    result.push_str("_atom_site_fract_z\n");
    result.push_str("_atom_site_occupancy\n");

    for (i, (element, position)) in structure.sites().enumerate() {
        result.push_str(&format!(
            "{}{} {} {:.10} {:.10} {:.10} 1.0\n",
            element,
            i + 1,
            element,
            position[0],
            position[1],
            position[2]
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{assemble_structure, build_lattice};

    #[test]
    fn test_cif_cell_and_sites() {
        let lattice = build_lattice([5.0, 5.0, 7.0], [90.0, 90.0, 120.0]).unwrap();
        let structure =
            assemble_structure(&lattice, &[26, 8], &[[0.0, 0.0, 0.0], [1.0 / 3.0, 2.0 / 3.0, 1.25]])
                .unwrap();

        let cif = to_cif_string(&structure, "FeO test");

        assert!(cif.starts_with("data_FeO_test\n"));
        assert!(cif.contains("_cell_length_c    7.000000"));
        assert!(cif.contains("_cell_angle_gamma 120.0000"));
        assert!(cif.contains("_chemical_formula_sum 'Fe O'"));
        assert!(cif.contains("Fe1 Fe 0.0000000000 0.0000000000 0.0000000000 1.0"));
        assert!(cif.contains("O2 O 0.3333333333 0.6666666667 0.2500000000 1.0"));
    }
}
