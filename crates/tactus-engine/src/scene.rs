//! Scene construction from already-parsed configuration values.
//!
//! The external loader parses files; this module receives plain values
//! (`SceneDesc` and friends, all serde types) and builds a validated
//! [`SimulationContext`]. Every data-model invariant is checked here,
//! before the first tick — a bad scene never constructs, and nothing is
//! silently defaulted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tactus_body::models::{FemSolid, LumpedParameter, MassSpring, RigidProbe, Spring};
use tactus_body::{Body, BodyModel, BodyOps, BoundaryKind};
use tactus_collision::{CollisionPipeline, CollisionRuleTable, RuleSpec};
use tactus_fem::MaterialParams;
use tactus_math::Vec3;
use tactus_mesh::TetMesh;
use tactus_solver::IntegratorKind;
use tactus_types::constants::DEFAULT_HAPTIC_RADIUS;
use tactus_types::{BodyId, Scalar, TactusError, TactusResult};

use crate::context::SimulationContext;

/// A whole scene, as handed over by the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDesc {
    /// Physics timestep (seconds).
    pub timestep: Scalar,
    /// Gravity vector.
    pub gravity: [Scalar; 3],
    /// Topological radius for reduced haptic models.
    #[serde(default = "default_haptic_radius")]
    pub haptic_radius: u32,
    /// Collision rule specification.
    pub collision_rule: RuleDesc,
    /// The bodies, in id order.
    pub bodies: Vec<BodyDesc>,
}

fn default_haptic_radius() -> u32 {
    DEFAULT_HAPTIC_RADIUS
}

/// Collision rule: a name (`enable_all`, `disable_all`, `enable`,
/// `disable`) plus the pair list the list-based rules consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDesc {
    pub name: String,
    #[serde(default)]
    pub pairs: Vec<(u32, u32)>,
}

/// One body: name, integrator, model, initial boundary conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    pub name: String,
    pub integrator: IntegratorKind,
    pub model: ModelDesc,
    #[serde(default)]
    pub boundary: Vec<BoundaryDesc>,
}

/// Model-specific construction data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelDesc {
    FemSolid {
        positions: Vec<[Scalar; 3]>,
        tets: Vec<[u32; 4]>,
        material: MaterialParams,
    },
    MassSpring {
        positions: Vec<[Scalar; 3]>,
        springs: Vec<SpringDesc>,
        masses: Vec<Scalar>,
    },
    Lumped {
        system: Vec<Scalar>,
        forcing: Vec<Scalar>,
        initial: Vec<Scalar>,
    },
    Probe {
        length: Scalar,
    },
}

/// One spring of a mass-spring body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpringDesc {
    pub i: u32,
    pub j: u32,
    pub rest_length: Scalar,
    pub stiffness: Scalar,
    pub damping: Scalar,
}

/// One boundary condition, with the kind as a configuration name.
///
/// Required value fields depend on the kind:
/// - `"traction"` — `value`
/// - `"fixed"` — `value`
/// - `"mixed"` — `displacement`, `traction_value`, `normal`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryDesc {
    pub node: u32,
    pub kind: String,
    #[serde(default)]
    pub value: Option<[Scalar; 3]>,
    #[serde(default)]
    pub displacement: Option<Scalar>,
    #[serde(default)]
    pub traction_value: Option<[Scalar; 3]>,
    #[serde(default)]
    pub normal: Option<[Scalar; 3]>,
}

impl BoundaryDesc {
    /// Resolves the configuration name into a typed kind.
    ///
    /// An unrecognized kind name or a missing value field aborts scene
    /// construction.
    pub fn resolve(&self) -> TactusResult<BoundaryKind> {
        let vec3 = |v: Option<[Scalar; 3]>, what: &str| {
            v.map(Vec3::from_array).ok_or_else(|| {
                TactusError::InvalidConfig(format!(
                    "boundary node {}: missing {what} for kind {}",
                    self.node, self.kind
                ))
            })
        };
        match self.kind.as_str() {
            "traction" => Ok(BoundaryKind::Traction {
                value: vec3(self.value, "value")?,
            }),
            "fixed" => Ok(BoundaryKind::Fixed {
                value: vec3(self.value, "value")?,
            }),
            "mixed" => Ok(BoundaryKind::Mixed {
                displacement: self.displacement.ok_or_else(|| {
                    TactusError::InvalidConfig(format!(
                        "boundary node {}: missing displacement for kind mixed",
                        self.node
                    ))
                })?,
                traction: vec3(self.traction_value, "traction_value")?,
                normal: vec3(self.normal, "normal")?,
            }),
            other => Err(TactusError::UnknownBoundaryKind(other.to_string())),
        }
    }
}

/// Builds a validated simulation context from a scene description.
pub fn build(desc: &SceneDesc) -> TactusResult<SimulationContext> {
    // Unique names are part of the body identity invariant.
    let mut names = BTreeSet::new();
    for body in &desc.bodies {
        if !names.insert(body.name.as_str()) {
            return Err(TactusError::InvalidConfig(format!(
                "duplicate body name: {}",
                body.name
            )));
        }
    }

    let gravity = Vec3::from_array(desc.gravity);

    let mut bodies = Vec::with_capacity(desc.bodies.len());
    let mut integrators = Vec::with_capacity(desc.bodies.len());
    for (index, body_desc) in desc.bodies.iter().enumerate() {
        let id = BodyId(index as u32);
        let mut model = build_model(&body_desc.model, gravity)?;

        // Boundary assignments, node ranges checked against the model.
        if !body_desc.boundary.is_empty() {
            let node_count = model
                .state()
                .as_nodes()
                .map(|ns| ns.node_count())
                .unwrap_or(0);
            for bc in &body_desc.boundary {
                if bc.node as usize >= node_count {
                    return Err(TactusError::InvalidConfig(format!(
                        "body {}: boundary node {} out of range ({} nodes)",
                        body_desc.name, bc.node, node_count
                    )));
                }
                let kind = bc.resolve()?;
                match &mut model {
                    BodyModel::FemSolid(m) => m.boundary.set(bc.node, kind),
                    BodyModel::MassSpring(m) => m.boundary.set(bc.node, kind),
                    BodyModel::Lumped(_) | BodyModel::Probe(_) => {
                        return Err(TactusError::InvalidConfig(format!(
                            "body {}: model kind does not take boundary conditions",
                            body_desc.name
                        )));
                    }
                }
            }
        }

        let body = Body::new(id, body_desc.name.clone(), model);
        integrators.push(body_desc.integrator.create(&body));
        bodies.push(body);
    }

    let spec = RuleSpec::from_name(
        &desc.collision_rule.name,
        desc.collision_rule
            .pairs
            .iter()
            .map(|&(a, b)| (BodyId(a), BodyId(b)))
            .collect(),
    )?;
    let table = CollisionRuleTable::build(bodies.len(), &spec)?;
    let pipeline = CollisionPipeline::new(table);

    SimulationContext::new(
        bodies,
        integrators,
        pipeline,
        desc.timestep,
        desc.haptic_radius,
    )
}

fn build_model(desc: &ModelDesc, gravity: Vec3) -> TactusResult<BodyModel> {
    match desc {
        ModelDesc::FemSolid {
            positions,
            tets,
            material,
        } => {
            let mesh = TetMesh::from_parts(positions, tets)?;
            Ok(BodyModel::FemSolid(FemSolid::new(mesh, *material, gravity)?))
        }
        ModelDesc::MassSpring {
            positions,
            springs,
            masses,
        } => {
            let springs = springs
                .iter()
                .map(|s| Spring {
                    i: s.i,
                    j: s.j,
                    rest_length: s.rest_length,
                    stiffness: s.stiffness,
                    damping: s.damping,
                })
                .collect();
            Ok(BodyModel::MassSpring(MassSpring::new(
                positions,
                springs,
                masses.clone(),
                gravity,
            )?))
        }
        ModelDesc::Lumped {
            system,
            forcing,
            initial,
        } => Ok(BodyModel::Lumped(LumpedParameter::new(
            system.clone(),
            forcing.clone(),
            initial.clone(),
        )?)),
        ModelDesc::Probe { length } => {
            if !(*length > 0.0) {
                return Err(TactusError::InvalidConfig(format!(
                    "probe length must be positive, got {length}"
                )));
            }
            Ok(BodyModel::Probe(RigidProbe::new(*length)))
        }
    }
}
