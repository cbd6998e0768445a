//! Integration tests for tactus-fem.

use tactus_fem::element::{lumped_masses, signed_volume};
use tactus_fem::{MaterialParams, TetElement};
use tactus_math::tensor::asymmetry;
use tactus_math::Vec3;
use tactus_mesh::generators::{bar_grid, single_tet};
use tactus_mesh::TetMesh;

fn soa(mesh: &TetMesh) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    (mesh.pos_x.clone(), mesh.pos_y.clone(), mesh.pos_z.clone())
}

// ─── Material Tests ───────────────────────────────────────────

#[test]
fn material_presets_validate() {
    MaterialParams::soft_tissue().validate().unwrap();
    MaterialParams::liver().validate().unwrap();
    MaterialParams::fascia().validate().unwrap();
}

#[test]
fn material_rejects_nonpositive_density() {
    let mut m = MaterialParams::soft_tissue();
    m.density = 0.0;
    assert!(m.validate().is_err());
    m.density = f64::NAN;
    assert!(m.validate().is_err());
}

#[test]
fn material_rejects_negative_modulus() {
    let mut m = MaterialParams::liver();
    m.mu = -1.0;
    assert!(m.validate().is_err());
}

// ─── Volume Tests ─────────────────────────────────────────────

#[test]
fn volume_matches_independent_triple_product() {
    let mesh = single_tet();
    let elem = TetElement::from_mesh(&mesh, 0, MaterialParams::soft_tissue()).unwrap();
    let (px, py, pz) = soa(&mesh);

    let vol = elem.compute_volume(&px, &py, &pz);

    // Independent scalar-triple-product formula, written out by hand.
    let [a, b, c, d] = mesh.tet(0);
    let p = |i: u32| {
        let i = i as usize;
        (px[i], py[i], pz[i])
    };
    let (ax, ay, az) = p(a);
    let (bx, by, bz) = p(b);
    let (cx, cy, cz) = p(c);
    let (dx, dy, dz) = p(d);
    let (e1x, e1y, e1z) = (bx - ax, by - ay, bz - az);
    let (e2x, e2y, e2z) = (cx - ax, cy - ay, cz - az);
    let (e3x, e3y, e3z) = (dx - ax, dy - ay, dz - az);
    let cross_x = e1y * e2z - e1z * e2y;
    let cross_y = e1z * e2x - e1x * e2z;
    let cross_z = e1x * e2y - e1y * e2x;
    let independent = (cross_x * e3x + cross_y * e3y + cross_z * e3z) / 6.0;

    assert!(
        (vol - independent).abs() < 1e-5,
        "vol = {vol}, independent = {independent}"
    );
    assert!(vol > 0.0);
}

#[test]
fn volume_positive_for_every_grid_element() {
    let mesh = bar_grid(2, 2, 2, 0.3).unwrap();
    let (px, py, pz) = soa(&mesh);
    for t in 0..mesh.tet_count() {
        let elem = TetElement::from_mesh(&mesh, t, MaterialParams::liver()).unwrap();
        assert!(elem.compute_volume(&px, &py, &pz) > 0.0, "element {t}");
    }
}

#[test]
fn inverted_element_reports_negative_volume() {
    let mesh = single_tet();
    let elem = TetElement::from_mesh(&mesh, 0, MaterialParams::soft_tissue()).unwrap();
    let (px, py, mut pz) = soa(&mesh);

    // Push the apex through the base plane.
    pz[3] = -1.0;
    assert!(elem.compute_volume(&px, &py, &pz) < 0.0);
}

#[test]
fn degenerate_reference_rejected() {
    // Four coplanar nodes: shape matrix is singular.
    let result = TetMesh::from_parts(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ],
        &[[0, 1, 2, 3]],
    );
    // Either the mesh validation or the element constructor must refuse it.
    if let Ok(mesh) = result {
        assert!(TetElement::from_mesh(&mesh, 0, MaterialParams::soft_tissue()).is_err());
    }
}

// ─── Beta / Strain Tests ──────────────────────────────────────

#[test]
fn shape_gradients_sum_to_zero() {
    // Shape functions partition unity, so their gradients cancel.
    let mesh = bar_grid(1, 1, 1, 0.7).unwrap();
    for t in 0..mesh.tet_count() {
        let elem = TetElement::from_mesh(&mesh, t, MaterialParams::soft_tissue()).unwrap();
        let sum: Vec3 = (0..4).map(|i| elem.beta(i)).sum();
        assert!(sum.length() < 1e-9, "element {t}: Σβ = {sum:?}");
    }
}

#[test]
fn undeformed_element_has_zero_strain_and_stress() {
    let mesh = single_tet();
    let mut elem = TetElement::from_mesh(&mesh, 0, MaterialParams::soft_tissue()).unwrap();
    let (px, py, pz) = soa(&mesh);
    let zeros = vec![0.0; 4];

    elem.update_tensors(&px, &py, &pz, &zeros, &zeros, &zeros, None);

    assert!(asymmetry(&elem.strain) < 1e-12);
    for r in 0..3 {
        for c in 0..3 {
            assert!(tactus_math::tensor::entry(&elem.strain, r, c).abs() < 1e-10);
            assert!(tactus_math::tensor::entry(&elem.stress, r, c).abs() < 1e-6);
        }
    }
}

#[test]
fn uniform_stretch_produces_known_green_strain() {
    // Stretch by factor s along x: E_xx = (s² − 1)/2, all else zero.
    let s = 1.1;
    let mesh = single_tet();
    let mut elem = TetElement::from_mesh(&mesh, 0, MaterialParams::soft_tissue()).unwrap();
    let (px, py, pz) = soa(&mesh);
    let px: Vec<f64> = px.iter().map(|x| x * s).collect();
    let zeros = vec![0.0; 4];

    elem.update_tensors(&px, &py, &pz, &zeros, &zeros, &zeros, None);

    let expected = (s * s - 1.0) / 2.0;
    assert!(
        (tactus_math::tensor::entry(&elem.strain, 0, 0) - expected).abs() < 1e-10,
        "E_xx = {}",
        tactus_math::tensor::entry(&elem.strain, 0, 0)
    );
    assert!(tactus_math::tensor::entry(&elem.strain, 1, 1).abs() < 1e-10);
    assert!(tactus_math::tensor::entry(&elem.strain, 2, 2).abs() < 1e-10);
}

#[test]
fn strain_and_stress_are_symmetric() {
    let mesh = bar_grid(1, 1, 1, 0.5).unwrap();
    let (px, py, pz) = soa(&mesh);
    let n = mesh.node_count();

    // Arbitrary smooth deformation + velocity field.
    let px: Vec<f64> = px.iter().map(|x| x * 1.07 + 0.01).collect();
    let py: Vec<f64> = py.iter().zip(&pz).map(|(y, z)| y * 0.95 + 0.03 * z).collect();
    let vx: Vec<f64> = (0..n).map(|i| 0.01 * i as f64).collect();
    let vy = vec![0.02; n];
    let vz: Vec<f64> = (0..n).map(|i| -0.005 * i as f64).collect();

    for t in 0..mesh.tet_count() {
        let mut elem = TetElement::from_mesh(&mesh, t, MaterialParams::fascia()).unwrap();
        elem.update_tensors(&px, &py, &pz, &vx, &vy, &vz, None);
        assert!(asymmetry(&elem.strain) < 1e-10, "element {t} strain");
        assert!(asymmetry(&elem.strain_rate) < 1e-10, "element {t} strain rate");
        assert!(asymmetry(&elem.stress) < 1e-7, "element {t} stress");
    }
}

#[test]
fn stress_override_is_additive() {
    let mesh = single_tet();
    let mut elem = TetElement::from_mesh(&mesh, 0, MaterialParams::soft_tissue()).unwrap();
    let (px, py, pz) = soa(&mesh);
    let zeros = vec![0.0; 4];

    let extra = tactus_math::tensor::scaled_identity(5.0);
    elem.update_tensors(&px, &py, &pz, &zeros, &zeros, &zeros, Some(&extra));

    assert!(
        (tactus_math::tensor::entry(&elem.stress, 0, 0) - 5.0).abs() < 1e-6,
        "override should pass straight through on an undeformed element"
    );
}

// ─── Force Tests ──────────────────────────────────────────────

#[test]
fn stretched_element_pulls_nodes_back() {
    // Stretch the apex upward; the elastic force on it must point down.
    let mesh = single_tet();
    let mut elem = TetElement::from_mesh(&mesh, 0, MaterialParams::soft_tissue()).unwrap();
    let (px, py, mut pz) = soa(&mesh);
    pz[3] = 1.3;
    let zeros = vec![0.0; 4];

    elem.update_tensors(&px, &py, &pz, &zeros, &zeros, &zeros, None);
    let vol = elem.compute_volume(&px, &py, &pz);

    let mut fx = vec![0.0; 4];
    let mut fy = vec![0.0; 4];
    let mut fz = vec![0.0; 4];
    elem.accumulate_forces(vol, &mut fx, &mut fy, &mut fz);

    assert!(fz[3] < 0.0, "apex force should be restoring, got {}", fz[3]);
}

#[test]
fn undeformed_element_exerts_no_force() {
    let mesh = single_tet();
    let mut elem = TetElement::from_mesh(&mesh, 0, MaterialParams::liver()).unwrap();
    let (px, py, pz) = soa(&mesh);
    let zeros = vec![0.0; 4];

    elem.update_tensors(&px, &py, &pz, &zeros, &zeros, &zeros, None);
    let vol = elem.compute_volume(&px, &py, &pz);

    let mut fx = vec![0.0; 4];
    let mut fy = vec![0.0; 4];
    let mut fz = vec![0.0; 4];
    elem.accumulate_forces(vol, &mut fx, &mut fy, &mut fz);

    for i in 0..4 {
        assert!(fx[i].abs() < 1e-8 && fy[i].abs() < 1e-8 && fz[i].abs() < 1e-8);
    }
}

#[test]
fn lumped_masses_sum_to_total_mass() {
    let mesh = bar_grid(2, 1, 1, 0.4).unwrap();
    let material = MaterialParams::soft_tissue();
    let elements: Vec<TetElement> = (0..mesh.tet_count())
        .map(|t| TetElement::from_mesh(&mesh, t, material).unwrap())
        .collect();

    let masses = lumped_masses(&mesh, &elements);
    let total: f64 = masses.iter().sum();

    let volume: f64 = elements.iter().map(|e| e.rest_volume).sum();
    assert!((total - material.density * volume).abs() < 1e-9);
    assert!(masses.iter().all(|&m| m > 0.0));
}

#[test]
fn signed_volume_free_function_antisymmetric() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let c = Vec3::new(0.0, 1.0, 0.0);
    let d = Vec3::new(0.0, 0.0, 1.0);
    let v1 = signed_volume(a, b, c, d);
    let v2 = signed_volume(a, c, b, d);
    assert!((v1 + v2).abs() < 1e-15);
}
