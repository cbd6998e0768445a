//! Integration tests for tactus-math.

use tactus_math::tensor::{asymmetry, entry, outer, scaled_identity, symmetric_part, trace};
use tactus_math::{Mat3, Vec3};

#[test]
fn scaled_identity_diagonal() {
    let m = scaled_identity(2.5);
    assert!((entry(&m, 0, 0) - 2.5).abs() < 1e-15);
    assert!((entry(&m, 1, 1) - 2.5).abs() < 1e-15);
    assert!((entry(&m, 2, 2) - 2.5).abs() < 1e-15);
    assert!(entry(&m, 0, 1).abs() < 1e-15);
}

#[test]
fn trace_matches_diagonal_sum() {
    let m = Mat3::from_cols(
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
    );
    assert!((trace(&m) - 7.0).abs() < 1e-15);
}

#[test]
fn outer_product_transpose_swaps_arguments() {
    let a = Vec3::new(1.0, -2.0, 0.5);
    let b = Vec3::new(3.0, 0.25, -1.0);
    let ab = outer(a, b);
    let ba = outer(b, a);
    assert!(asymmetry(&symmetric_part(&ab)) < 1e-15);
    for r in 0..3 {
        for c in 0..3 {
            assert!((entry(&ab, r, c) - entry(&ba, c, r)).abs() < 1e-15);
        }
    }
}

#[test]
fn asymmetry_detects_skew() {
    let skew = Mat3::from_cols(
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
    );
    assert!(asymmetry(&skew) > 1.9);
}
