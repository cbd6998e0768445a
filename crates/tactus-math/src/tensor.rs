//! Symmetric 3×3 tensor helpers.
//!
//! The element stress law and the haptic spring linearization both work
//! with small symmetric tensors built from outer products and trace terms.
//! `glam::DMat3` is the storage type; these helpers keep the call sites
//! close to the mathematical notation.

use tactus_types::Scalar;

use crate::{Mat3, Vec3};

/// Outer product `a ⊗ b` as a 3×3 matrix (column `j` is `a * b[j]`).
#[inline]
pub fn outer(a: Vec3, b: Vec3) -> Mat3 {
    Mat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// `s · I` — the identity scaled by a scalar.
#[inline]
pub fn scaled_identity(s: Scalar) -> Mat3 {
    Mat3::from_diagonal(Vec3::splat(s))
}

/// Trace of a 3×3 matrix.
#[inline]
pub fn trace(m: &Mat3) -> Scalar {
    m.x_axis.x + m.y_axis.y + m.z_axis.z
}

/// Symmetrize: `(M + Mᵀ) / 2`.
#[inline]
pub fn symmetric_part(m: &Mat3) -> Mat3 {
    (*m + m.transpose()) * 0.5
}

/// Maximum absolute difference between `M` and `Mᵀ`.
///
/// Strain and stress tensors must be symmetric; this is the quantity the
/// test suites assert on.
pub fn asymmetry(m: &Mat3) -> Scalar {
    let t = m.transpose();
    let d = *m - t;
    let mut max = 0.0;
    for col in [d.x_axis, d.y_axis, d.z_axis] {
        max = col.x.abs().max(col.y.abs()).max(col.z.abs()).max(max);
    }
    max
}

/// Entry `m[row][col]` of a column-major `Mat3`.
#[inline]
pub fn entry(m: &Mat3, row: usize, col: usize) -> Scalar {
    m.col(col)[row]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_product_rank_one() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        let m = outer(a, b);
        for r in 0..3 {
            for c in 0..3 {
                assert!((entry(&m, r, c) - a[r] * b[c]).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn trace_of_identity_is_three() {
        assert!((trace(&Mat3::IDENTITY) - 3.0).abs() < 1e-15);
    }

    #[test]
    fn symmetric_part_is_symmetric() {
        let m = Mat3::from_cols(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(7.0, 8.0, 9.0),
        );
        assert!(asymmetry(&symmetric_part(&m)) < 1e-15);
    }
}
