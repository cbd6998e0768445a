//! Integration tests for tactus-collision.

use tactus_body::models::{FemSolid, RigidProbe};
use tactus_body::{Body, BodyModel, BoundaryKind};
use tactus_collision::narrow::{segment_triangle, triangle_triangle};
use tactus_collision::{
    Aabb, AabbTree, CollisionPipeline, CollisionRuleTable, ContactKind, RuleSpec,
};
use tactus_fem::MaterialParams;
use tactus_math::{Mat3, Vec3};
use tactus_mesh::generators::single_tet;
use tactus_types::BodyId;

// ─── AABB Tests ───────────────────────────────────────────────

#[test]
fn aabb_overlap_basics() {
    let a = Aabb::from_points(&[Vec3::ZERO, Vec3::ONE]);
    let b = Aabb::from_points(&[Vec3::splat(0.5), Vec3::splat(1.5)]);
    let c = Aabb::from_points(&[Vec3::splat(2.0), Vec3::splat(3.0)]);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    assert!(!a.overlaps(&c));
}

#[test]
fn aabb_union_contains_both() {
    let a = Aabb::from_points(&[Vec3::ZERO, Vec3::ONE]);
    let b = Aabb::from_points(&[Vec3::splat(2.0), Vec3::splat(3.0)]);
    let u = a.union(&b);
    assert_eq!(u.min, Vec3::ZERO);
    assert_eq!(u.max, Vec3::splat(3.0));
}

#[test]
fn tree_finds_overlapping_leaves() {
    // Two rows of boxes; only the middle ones overlap across trees.
    let row_a: Vec<Aabb> = (0..4)
        .map(|i| {
            let x = i as f64 * 2.0;
            Aabb::from_points(&[Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 1.0)])
        })
        .collect();
    let row_b = vec![Aabb::from_points(&[
        Vec3::new(2.5, 0.5, 0.5),
        Vec3::new(2.8, 0.8, 0.8),
    ])];

    let tree_a = AabbTree::build(&row_a);
    let tree_b = AabbTree::build(&row_b);

    let pairs = tree_a.overlapping_pairs(&tree_b);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0], (1, 0)); // Box at x ∈ [2, 3]
}

#[test]
fn empty_tree_yields_no_pairs() {
    let tree_a = AabbTree::build(&[]);
    let tree_b = AabbTree::build(&[Aabb::from_points(&[Vec3::ZERO, Vec3::ONE])]);
    assert!(tree_a.overlapping_pairs(&tree_b).is_empty());
    assert!(tree_b.overlapping_pairs(&tree_a).is_empty());
}

// ─── Rule Table Tests ─────────────────────────────────────────

#[test]
fn rule_symmetry_for_every_spec() {
    let n = 5;
    let listed = vec![(BodyId(0), BodyId(3)), (BodyId(4), BodyId(1))];
    let specs = [
        RuleSpec::EnableAll,
        RuleSpec::DisableAll,
        RuleSpec::Enable(listed.clone()),
        RuleSpec::Disable(listed),
    ];
    for spec in &specs {
        let table = CollisionRuleTable::build(n, spec).unwrap();
        for i in 0..n as u32 {
            for j in 0..n as u32 {
                assert_eq!(
                    table.is_enabled(BodyId(i), BodyId(j)),
                    table.is_enabled(BodyId(j), BodyId(i)),
                    "asymmetry at ({i}, {j}) for {spec:?}"
                );
            }
        }
    }
}

#[test]
fn rule_enable_list_semantics() {
    let table = CollisionRuleTable::build(
        4,
        &RuleSpec::Enable(vec![(BodyId(1), BodyId(2))]),
    )
    .unwrap();
    assert!(table.is_enabled(BodyId(1), BodyId(2)));
    assert!(table.is_enabled(BodyId(2), BodyId(1)));
    assert!(!table.is_enabled(BodyId(0), BodyId(3)));
}

#[test]
fn rule_disable_list_semantics() {
    let table = CollisionRuleTable::build(
        3,
        &RuleSpec::Disable(vec![(BodyId(0), BodyId(1))]),
    )
    .unwrap();
    assert!(!table.is_enabled(BodyId(0), BodyId(1)));
    assert!(table.is_enabled(BodyId(0), BodyId(2)));
    assert!(table.is_enabled(BodyId(1), BodyId(2)));
}

#[test]
fn self_pairs_never_enabled() {
    let table = CollisionRuleTable::build(3, &RuleSpec::EnableAll).unwrap();
    for i in 0..3 {
        assert!(!table.is_enabled(BodyId(i), BodyId(i)));
    }
}

#[test]
fn rule_out_of_range_pair_rejected() {
    let result = CollisionRuleTable::build(
        2,
        &RuleSpec::Enable(vec![(BodyId(0), BodyId(7))]),
    );
    assert!(result.is_err());
}

#[test]
fn rule_name_parsing() {
    assert!(RuleSpec::from_name("enable_all", vec![]).is_ok());
    assert!(RuleSpec::from_name("disable_all", vec![]).is_ok());
    assert!(RuleSpec::from_name("squishy", vec![]).is_err());
}

// ─── Narrow Phase Tests ───────────────────────────────────────

#[test]
fn segment_hits_triangle_interior() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let c = Vec3::new(0.0, 1.0, 0.0);

    let hit = segment_triangle(
        Vec3::new(0.25, 0.25, -1.0),
        Vec3::new(0.25, 0.25, 1.0),
        a,
        b,
        c,
    )
    .expect("segment crosses the triangle");

    assert!((hit.point - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-12);
    let [u, v, w] = hit.barycentric;
    assert!((u + v + w - 1.0).abs() < 1e-12);
    assert!(u > 0.0 && v > 0.0 && w > 0.0);
}

#[test]
fn segment_misses_outside_triangle() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let c = Vec3::new(0.0, 1.0, 0.0);

    assert!(segment_triangle(
        Vec3::new(0.9, 0.9, -1.0),
        Vec3::new(0.9, 0.9, 1.0),
        a,
        b,
        c
    )
    .is_none());
}

#[test]
fn segment_too_short_misses() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(1.0, 0.0, 0.0);
    let c = Vec3::new(0.0, 1.0, 0.0);

    assert!(segment_triangle(
        Vec3::new(0.25, 0.25, -2.0),
        Vec3::new(0.25, 0.25, -1.0),
        a,
        b,
        c
    )
    .is_none());
}

#[test]
fn triangles_crossing_intersect() {
    // Triangle B pierces triangle A's plane through its interior.
    let a0 = Vec3::new(-1.0, -1.0, 0.0);
    let a1 = Vec3::new(2.0, -1.0, 0.0);
    let a2 = Vec3::new(0.0, 2.0, 0.0);

    let b0 = Vec3::new(0.2, 0.2, -0.5);
    let b1 = Vec3::new(0.2, 0.2, 0.5);
    let b2 = Vec3::new(1.5, 0.2, 0.5);

    let hit = triangle_triangle(b0, b1, b2, a0, a1, a2).expect("triangles intersect");
    assert!(hit.point.z.abs() < 1e-12, "hit must lie in A's plane");
}

#[test]
fn separated_triangles_do_not_intersect() {
    let a0 = Vec3::new(0.0, 0.0, 0.0);
    let a1 = Vec3::new(1.0, 0.0, 0.0);
    let a2 = Vec3::new(0.0, 1.0, 0.0);

    let b0 = Vec3::new(0.0, 0.0, 5.0);
    let b1 = Vec3::new(1.0, 0.0, 5.0);
    let b2 = Vec3::new(0.0, 1.0, 5.0);

    assert!(triangle_triangle(a0, a1, a2, b0, b1, b2).is_none());
}

// ─── Pipeline Tests ───────────────────────────────────────────

fn tissue_and_probe() -> Vec<Body> {
    let fem = FemSolid::new(
        single_tet(),
        MaterialParams::soft_tissue(),
        Vec3::ZERO,
    )
    .unwrap();

    let mut probe = RigidProbe::new(1.0);
    // Tip below the base face, shaft crossing it at (0.2, 0.2, 0).
    probe.set_pose(Vec3::new(0.2, 0.2, -0.5), Mat3::IDENTITY);

    vec![
        Body::new(BodyId(0), "tissue", BodyModel::FemSolid(fem)),
        Body::new(BodyId(1), "probe", BodyModel::Probe(probe)),
    ]
}

#[test]
fn probe_contact_pins_nearest_vertex() {
    let mut bodies = tissue_and_probe();
    let rules = CollisionRuleTable::build(2, &RuleSpec::EnableAll).unwrap();
    let mut pipeline = CollisionPipeline::new(rules);

    let result = pipeline.step(&mut bodies);

    assert_eq!(result.contacts.len(), 1);
    let contact = &result.contacts[0];
    assert_eq!(contact.kind, ContactKind::ProbeTip);
    assert_eq!(contact.body_b, BodyId(0));

    // Nearest base vertex to (0.2, 0.2, 0) is the origin node.
    let boundary = bodies[0].boundary().unwrap();
    assert!(boundary.is_fixed(0));
    match boundary.get(0) {
        Some(BoundaryKind::Fixed { value }) => {
            assert!((*value - Vec3::new(0.2, 0.2, -0.5)).length() < 1e-12,
                "held at the probe tip position");
        }
        other => panic!("expected Fixed, got {other:?}"),
    }

    assert_eq!(result.haptic_requests.len(), 1);
    assert_eq!(result.haptic_requests[0].body, BodyId(0));
    assert_eq!(result.haptic_requests[0].node, 0);
    assert_eq!(result.haptic_requests[0].probe, Some(BodyId(1)));
}

#[test]
fn disabled_pair_produces_nothing() {
    let mut bodies = tissue_and_probe();
    let rules = CollisionRuleTable::build(2, &RuleSpec::DisableAll).unwrap();
    let mut pipeline = CollisionPipeline::new(rules);

    let result = pipeline.step(&mut bodies);
    assert!(result.contacts.is_empty());
    assert_eq!(result.candidate_pairs, 0);
    assert!(!bodies[0].boundary().unwrap().is_fixed(0));
}

#[test]
fn reset_restores_previous_boundary() {
    let mut bodies = tissue_and_probe();
    // The contact vertex already carries a traction condition.
    let prior = BoundaryKind::Traction {
        value: Vec3::new(0.0, 0.0, 1.0),
    };
    bodies[0].boundary_mut().unwrap().set(0, prior);

    let rules = CollisionRuleTable::build(2, &RuleSpec::EnableAll).unwrap();
    let mut pipeline = CollisionPipeline::new(rules);

    pipeline.step(&mut bodies);
    assert!(bodies[0].boundary().unwrap().is_fixed(0));

    pipeline.reset_responses(&mut bodies);
    assert_eq!(bodies[0].boundary().unwrap().get(0), Some(&prior));
}

#[test]
fn existing_dirichlet_node_is_left_alone() {
    let mut bodies = tissue_and_probe();
    let held = BoundaryKind::Fixed {
        value: Vec3::new(9.0, 9.0, 9.0),
    };
    bodies[0].boundary_mut().unwrap().set(0, held);

    let rules = CollisionRuleTable::build(2, &RuleSpec::EnableAll).unwrap();
    let mut pipeline = CollisionPipeline::new(rules);

    let result = pipeline.step(&mut bodies);
    // The vertex was already Dirichlet: value unchanged, no new request.
    assert_eq!(bodies[0].boundary().unwrap().get(0), Some(&held));
    assert!(result.haptic_requests.is_empty());
}

#[test]
fn missed_probe_produces_no_contact() {
    let mut bodies = tissue_and_probe();
    // Move the probe far away.
    bodies[1]
        .as_probe_mut()
        .unwrap()
        .set_pose(Vec3::new(10.0, 10.0, 10.0), Mat3::IDENTITY);

    let rules = CollisionRuleTable::build(2, &RuleSpec::EnableAll).unwrap();
    let mut pipeline = CollisionPipeline::new(rules);

    let result = pipeline.step(&mut bodies);
    assert!(result.contacts.is_empty());
}
