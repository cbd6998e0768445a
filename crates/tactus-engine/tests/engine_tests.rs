//! Integration tests for tactus-engine.

use tactus_body::{BodyOps, BodyState};
use tactus_engine::{scene, SceneDesc, SimulationContext, StressCoupler};
use tactus_engine::scene::{BodyDesc, BoundaryDesc, ModelDesc, RuleDesc};
use tactus_fem::MaterialParams;
use tactus_haptic::{NullDevice, ServoLoop};
use tactus_math::{Mat3, Vec3};
use tactus_solver::IntegratorKind;
use tactus_telemetry::{CollectSink, EventKind};
use tactus_types::BodyId;

/// Test material tuned so the fixed-base tetrahedron settles well
/// within one simulated second (near-critical damping, ~0.5% strain).
fn test_material() -> MaterialParams {
    MaterialParams {
        density: 24.0,
        lambda: 8000.0,
        mu: 8000.0,
        phi: 180.0,
        nu: 180.0,
    }
}

fn unit_tet_positions() -> Vec<[f64; 3]> {
    vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]
}

fn fixed(node: u32, at: [f64; 3]) -> BoundaryDesc {
    BoundaryDesc {
        node,
        kind: "fixed".into(),
        value: Some(at),
        displacement: None,
        traction_value: None,
        normal: None,
    }
}

fn anchored_tet_scene() -> SceneDesc {
    SceneDesc {
        timestep: 1e-3,
        gravity: [0.0, 0.0, -9.81],
        haptic_radius: 1,
        collision_rule: RuleDesc {
            name: "disable_all".into(),
            pairs: vec![],
        },
        bodies: vec![BodyDesc {
            name: "tissue".into(),
            integrator: IntegratorKind::RungeKutta4,
            model: ModelDesc::FemSolid {
                positions: unit_tet_positions(),
                tets: vec![[0, 1, 2, 3]],
                material: test_material(),
            },
            boundary: vec![
                fixed(0, [0.0, 0.0, 0.0]),
                fixed(1, [1.0, 0.0, 0.0]),
                fixed(2, [0.0, 1.0, 0.0]),
            ],
        }],
    }
}

fn free_node_position(ctx: &SimulationContext) -> Vec3 {
    let fem = ctx.body(BodyId(0)).unwrap().as_fem().unwrap();
    fem.nodes().position(3)
}

// ─── Scene Construction Tests ─────────────────────────────────

#[test]
fn scene_toml_round_trip() {
    let desc = anchored_tet_scene();
    let text = toml::to_string(&desc).unwrap();
    let back: SceneDesc = toml::from_str(&text).unwrap();
    assert_eq!(back.bodies.len(), 1);
    assert_eq!(back.bodies[0].name, "tissue");
    assert_eq!(back.timestep, desc.timestep);
    assert_eq!(back.bodies[0].boundary.len(), 3);
}

#[test]
fn scene_builds_valid_context() {
    let ctx = scene::build(&anchored_tet_scene()).unwrap();
    assert_eq!(ctx.body_count(), 1);
    assert!(ctx.body_by_name("tissue").is_some());
    assert_eq!(ctx.tick_count(), 0);
}

#[test]
fn duplicate_body_names_rejected() {
    let mut desc = anchored_tet_scene();
    let clone = desc.bodies[0].clone();
    desc.bodies.push(clone);
    assert!(scene::build(&desc).is_err());
}

#[test]
fn unknown_boundary_kind_rejected() {
    let mut desc = anchored_tet_scene();
    desc.bodies[0].boundary[0].kind = "slippery".into();
    let err = scene::build(&desc).unwrap_err();
    assert!(err.to_string().contains("slippery"));
}

#[test]
fn missing_boundary_value_rejected() {
    let mut desc = anchored_tet_scene();
    desc.bodies[0].boundary[0].value = None;
    assert!(scene::build(&desc).is_err());
}

#[test]
fn unknown_collision_rule_rejected() {
    let mut desc = anchored_tet_scene();
    desc.collision_rule.name = "sometimes".into();
    assert!(scene::build(&desc).is_err());
}

#[test]
fn boundary_node_out_of_range_rejected() {
    let mut desc = anchored_tet_scene();
    desc.bodies[0].boundary.push(fixed(99, [0.0; 3]));
    assert!(scene::build(&desc).is_err());
}

#[test]
fn boundary_on_probe_rejected() {
    let mut desc = anchored_tet_scene();
    desc.bodies.push(BodyDesc {
        name: "probe".into(),
        integrator: IntegratorKind::Euler,
        model: ModelDesc::Probe { length: 0.1 },
        boundary: vec![fixed(0, [0.0; 3])],
    });
    assert!(scene::build(&desc).is_err());
}

// ─── End-to-End Equilibrium ───────────────────────────────────

/// Static equilibrium of the free node, computed independently of the
/// dynamic run: Newton iteration on the element's residual with a
/// finite-difference Jacobian.
fn static_equilibrium(desc: &SceneDesc) -> Vec3 {
    let mut ctx = scene::build(desc).unwrap();
    let body = ctx.body_mut(BodyId(0)).unwrap();

    let residual = |body: &mut tactus_body::Body, p: Vec3| -> Vec3 {
        let mut s = body.state().clone();
        if let BodyState::Nodes(ns) = &mut s {
            ns.set_position(3, p);
            // Zero velocities: the viscous terms must not bias statics.
            for i in 0..ns.node_count() {
                ns.set_velocity(i, Vec3::ZERO);
            }
        }
        let mut deriv = body.alloc_state();
        body.deriv_state(&mut deriv, &s);
        deriv.as_nodes().unwrap().velocity(3)
    };

    let mut p = Vec3::new(0.0, 0.0, 1.0);
    for _ in 0..50 {
        let r = residual(body, p);
        if r.length() < 1e-12 {
            break;
        }
        // Forward-difference Jacobian of the residual.
        let eps = 1e-7;
        let jac = Mat3::from_cols(
            (residual(body, p + Vec3::X * eps) - r) / eps,
            (residual(body, p + Vec3::Y * eps) - r) / eps,
            (residual(body, p + Vec3::Z * eps) - r) / eps,
        );
        p -= jac.inverse() * r;
    }
    p
}

#[test]
fn anchored_tet_converges_to_static_equilibrium() {
    let desc = anchored_tet_scene();
    let equilibrium = static_equilibrium(&desc);

    // Sanity: gravity sags the free node, but only slightly.
    assert!(equilibrium.z < 1.0);
    assert!(equilibrium.z > 0.9);

    let mut ctx = scene::build(&desc).unwrap();
    for _ in 0..1000 {
        ctx.step();
    }

    let settled = free_node_position(&ctx);
    let error = (settled - equilibrium).length();
    assert!(
        error < 1e-3,
        "settled {settled:?} vs equilibrium {equilibrium:?} (error {error:.2e})"
    );

    // The held base never moved.
    let fem = ctx.body(BodyId(0)).unwrap().as_fem().unwrap();
    assert_eq!(fem.nodes().position(0), Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(fem.nodes().position(1), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(fem.nodes().position(2), Vec3::new(0.0, 1.0, 0.0));
}

// ─── Probe / Haptic Integration ───────────────────────────────

fn tissue_and_probe_scene() -> SceneDesc {
    let mut desc = anchored_tet_scene();
    desc.gravity = [0.0, 0.0, 0.0];
    desc.collision_rule.name = "enable_all".into();
    // Anchor only two base nodes so the apex region stays free: the
    // probe aims at the slanted face, whose nearest vertex is the apex.
    desc.bodies[0].boundary = vec![fixed(0, [0.0, 0.0, 0.0]), fixed(1, [1.0, 0.0, 0.0])];
    desc.bodies.push(BodyDesc {
        name: "probe".into(),
        integrator: IntegratorKind::Euler,
        model: ModelDesc::Probe { length: 0.5 },
        boundary: vec![],
    });
    desc
}

#[test]
fn probe_contact_publishes_reduced_model() {
    let mut ctx = scene::build(&tissue_and_probe_scene()).unwrap();
    let sink = CollectSink::new();
    ctx.bus.add_sink(Box::new(sink.clone()));

    let mailbox = ctx.attach_probe_input(BodyId(1)).unwrap();
    // Tip inside the tet, shaft crossing the slanted face at
    // (0.15, 0.15, 0.7); the nearest face vertex is the free apex.
    mailbox.post(Vec3::new(0.15, 0.15, 0.5), Mat3::IDENTITY);

    ctx.step();

    let bridge = ctx.bridge();
    let model = bridge.latest().expect("contact should publish a model");
    assert!(model.neighbor_count() > 0);
    assert!(model.dim >= 3);

    let publishes = sink
        .events()
        .iter()
        .filter(|e| matches!(e.kind, EventKind::HapticPublish { .. }))
        .count();
    assert_eq!(publishes, 1);

    // The servo can evaluate the published model immediately.
    let mut device = NullDevice::new();
    device.position = Vec3::new(0.15, 0.15, 0.5);
    let mut servo = ServoLoop::new(ctx.bridge(), device, 1000.0);
    servo.tick().unwrap();
    assert!(servo.device().last_force.is_finite());
}

#[test]
fn no_contact_clears_the_bridge() {
    let mut ctx = scene::build(&tissue_and_probe_scene()).unwrap();
    let mailbox = ctx.attach_probe_input(BodyId(1)).unwrap();

    mailbox.post(Vec3::new(0.15, 0.15, 0.5), Mat3::IDENTITY);
    ctx.step();
    assert!(ctx.bridge().latest().is_some());

    // Probe withdrawn: next tick clears the model.
    mailbox.post(Vec3::new(5.0, 5.0, 5.0), Mat3::IDENTITY);
    ctx.step();
    assert!(ctx.bridge().latest().is_none());
}

#[test]
fn attach_probe_input_rejects_non_probe() {
    let mut ctx = scene::build(&tissue_and_probe_scene()).unwrap();
    assert!(ctx.attach_probe_input(BodyId(0)).is_err());
}

// ─── Connector Tests ──────────────────────────────────────────

#[test]
fn stress_coupler_drives_domain_override() {
    let mut desc = anchored_tet_scene();
    desc.bodies.push(BodyDesc {
        name: "excitation".into(),
        integrator: IntegratorKind::Euler,
        model: ModelDesc::Lumped {
            system: vec![0.0],
            forcing: vec![0.0],
            initial: vec![2.5],
        },
        boundary: vec![],
    });

    let mut ctx = scene::build(&desc).unwrap();
    ctx.add_connector(Box::new(StressCoupler {
        source: BodyId(1),
        source_index: 0,
        target: BodyId(0),
        elements: vec![0],
        gain: 100.0,
    }));

    ctx.step();

    let domain = ctx.body(BodyId(0)).unwrap().domain().unwrap();
    let stress = domain.stress_override(0).expect("override written");
    assert!((tactus_math::tensor::entry(stress, 0, 0) - 250.0).abs() < 1e-9);
}

// ─── Physics Thread Tests ─────────────────────────────────────

#[test]
fn physics_loop_runs_and_stops_cooperatively() {
    let ctx = scene::build(&anchored_tet_scene()).unwrap();
    let handle = tactus_engine::PhysicsLoop::spawn(ctx);
    assert!(handle.is_running());

    std::thread::sleep(std::time::Duration::from_millis(50));
    let ctx = handle.stop();
    assert!(ctx.tick_count() > 0, "loop should have ticked");
}

#[test]
fn physics_loop_pause_and_resume() {
    let ctx = scene::build(&anchored_tet_scene()).unwrap();
    let handle = tactus_engine::PhysicsLoop::spawn(ctx);

    std::thread::sleep(std::time::Duration::from_millis(20));
    handle.pause();
    assert!(!handle.is_running());

    handle.resume();
    assert!(handle.is_running());

    let ctx = handle.stop();
    assert!(ctx.tick_count() > 0);
}

// ─── Snapshot Tests ───────────────────────────────────────────

#[test]
fn snapshot_carries_surface_geometry() {
    let ctx = scene::build(&anchored_tet_scene()).unwrap();
    let snap = ctx.snapshot(BodyId(0)).unwrap();

    assert_eq!(snap.positions.len(), 4);
    assert_eq!(snap.triangles.len(), 4);
    for n in &snap.normals {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-9, "normals are unit length");
    }
}

#[test]
fn snapshots_skip_lumped_bodies() {
    let mut desc = anchored_tet_scene();
    desc.bodies.push(BodyDesc {
        name: "chamber".into(),
        integrator: IntegratorKind::Euler,
        model: ModelDesc::Lumped {
            system: vec![-1.0],
            forcing: vec![0.0],
            initial: vec![1.0],
        },
        boundary: vec![],
    });
    let ctx = scene::build(&desc).unwrap();
    assert_eq!(ctx.snapshots().len(), 1);
}
