//! # 晶格构建
//!
//! 由晶格参数 (a, b, c, α, β, γ) 构建 3×3 基矢矩阵，并拒绝退化或不可能的几何。
//!
//! ## 校验顺序
//! 1. 边长有限且 > 0
//! 2. 角度有限且位于 (0°, 180°)
//! 3. Gram 行列式根号内 `1 - cos²α - cos²β - cos²γ + 2cosα·cosβ·cosγ > 0`，
//!    体积 `abc·sqrt(...)` 有限且 > 0
//!
//! ## 依赖关系
//! - 被 `models/record.rs` 和 `writers/` 使用
//! - 使用 `error.rs` 的 `GeometryError`

use crate::error::GeometryError;
use serde::Serialize;

/// 晶格（构建后不可变）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    matrix: [[f64; 3]; 3],
    /// 晶胞体积 (Å³)
    volume: f64,
}

impl Lattice {
    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.matrix
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        let dot = |u: [f64; 3], v: [f64; 3]| u[0] * v[0] + u[1] * v[1] + u[2] * v[2];

        let a = norm(a_vec);
        let b = norm(b_vec);
        let c = norm(c_vec);

        let alpha = (dot(b_vec, c_vec) / (b * c)).clamp(-1.0, 1.0).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).clamp(-1.0, 1.0).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).clamp(-1.0, 1.0).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }
}

/// 晶格构建器
#[derive(Debug, Clone, Copy, Default)]
pub struct LatticeBuilder {
    /// 最小允许体积 (Å³)，0 表示仅要求体积为正
    pub min_volume: f64,
}

impl LatticeBuilder {
    pub fn with_min_volume(min_volume: f64) -> Self {
        LatticeBuilder { min_volume }
    }

    /// 从边长 (Å) 与角度 (度) 构建晶格
    pub fn build(&self, lengths: [f64; 3], angles: [f64; 3]) -> Result<Lattice, GeometryError> {
        for (index, &value) in lengths.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::NonPositiveLength { index, value });
            }
        }
        for (index, &value) in angles.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 || value >= 180.0 {
                return Err(GeometryError::AngleOutOfRange { index, value });
            }
        }

        let [a, b, c] = lengths;
        let [cos_alpha, cos_beta, cos_gamma] = angles.map(|deg| deg.to_radians().cos());
        let sin_gamma = angles[2].to_radians().sin();

        let radicand = 1.0 - cos_alpha * cos_alpha - cos_beta * cos_beta - cos_gamma * cos_gamma
            + 2.0 * cos_alpha * cos_beta * cos_gamma;
        let volume = a * b * c * radicand.max(0.0).sqrt();
        if !(radicand > 0.0) || !volume.is_finite() || volume <= 0.0 {
            return Err(GeometryError::DegenerateCell { radicand, volume });
        }

        if volume < self.min_volume {
            return Err(GeometryError::VolumeBelowThreshold {
                volume,
                min: self.min_volume,
            });
        }

        // a 沿 x 轴，b 在 xy 平面内，c 的 z 分量由体积确定
        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];
        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = volume / (a * b * sin_gamma);
        let matrix = [a_vec, b_vec, [c1, c2, c3]];

        if matrix.iter().flatten().any(|x| !x.is_finite()) {
            return Err(GeometryError::DegenerateCell { radicand, volume });
        }

        Ok(Lattice { matrix, volume })
    }
}

/// 以默认构建器构建晶格
pub fn build_lattice(lengths: [f64; 3], angles: [f64; 3]) -> Result<Lattice, GeometryError> {
    LatticeBuilder::default().build(lengths, angles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn determinant(m: &[[f64; 3]; 3]) -> f64 {
        let [a, b, c] = *m;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    #[test]
    fn test_unit_cube_volume_is_exact() {
        let lattice = build_lattice([1.0, 1.0, 1.0], [90.0, 90.0, 90.0]).unwrap();
        assert_eq!(lattice.volume(), 1.0);
    }

    #[test]
    fn test_lattice_from_parameters_cubic() {
        let lattice = build_lattice([5.0, 5.0, 5.0], [90.0, 90.0, 90.0]).unwrap();
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
        assert!((lattice.volume() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_triclinic_parameters_and_volume_agree() {
        let lattice = build_lattice([3.1, 4.2, 5.3], [75.0, 82.0, 101.0]).unwrap();
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 3.1).abs() < 1e-6);
        assert!((b - 4.2).abs() < 1e-6);
        assert!((c - 5.3).abs() < 1e-6);
        assert!((alpha - 75.0).abs() < 1e-6);
        assert!((beta - 82.0).abs() < 1e-6);
        assert!((gamma - 101.0).abs() < 1e-6);
        assert!((determinant(lattice.matrix()) - lattice.volume()).abs() < 1e-6);
        assert!(lattice.volume() > 0.0);
    }

    #[test]
    fn test_lattice_hexagonal() {
        let lattice = build_lattice([3.0, 3.0, 5.0], [90.0, 90.0, 120.0]).unwrap();
        let (_, _, _, _, _, gamma) = lattice.parameters();

        assert!((gamma - 120.0).abs() < 0.01);
        let expected = 3.0 * 3.0 * 5.0 * (120.0f64).to_radians().sin();
        assert!((lattice.volume() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_zero_angle_is_out_of_range() {
        let err = build_lattice([1.0, 1.0, 1.0], [0.0, 90.0, 90.0]).unwrap_err();
        assert!(matches!(err, GeometryError::AngleOutOfRange { index: 0, .. }));

        let err = build_lattice([1.0, 1.0, 1.0], [90.0, 180.0, 90.0]).unwrap_err();
        assert!(matches!(err, GeometryError::AngleOutOfRange { index: 1, .. }));
    }

    #[test]
    fn test_triangle_infeasible_angles_are_degenerate() {
        let err = build_lattice([1.0, 1.0, 1.0], [60.0, 60.0, 170.0]).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateCell { .. }));
    }

    #[test]
    fn test_non_positive_and_nan_lengths() {
        let err = build_lattice([1.0, -2.0, 1.0], [90.0, 90.0, 90.0]).unwrap_err();
        assert!(matches!(err, GeometryError::NonPositiveLength { index: 1, .. }));

        let err = build_lattice([1.0, 1.0, f64::NAN], [90.0, 90.0, 90.0]).unwrap_err();
        assert!(matches!(err, GeometryError::NonPositiveLength { index: 2, .. }));
    }

    #[test]
    fn test_overflowing_volume_is_degenerate() {
        let err = build_lattice([1e200, 1e200, 1e200], [90.0, 90.0, 90.0]).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateCell { .. }));
    }

    #[test]
    fn test_min_volume_threshold() {
        let builder = LatticeBuilder::with_min_volume(0.1);
        let err = builder.build([0.2, 0.2, 0.2], [90.0, 90.0, 90.0]).unwrap_err();
        assert!(matches!(err, GeometryError::VolumeBelowThreshold { .. }));
        assert!(builder.build([1.0, 1.0, 1.0], [90.0, 90.0, 90.0]).is_ok());
    }
}
