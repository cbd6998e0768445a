//! The simulation context: bodies, integrators, collision, haptics,
//! telemetry — owned together, passed explicitly.
//!
//! One physics tick (`step`) is:
//! 1. drive the probe from the device pose mailbox
//! 2. integrate every body through its own integrator
//! 3. collision resolution: undo the previous step's temporary
//!    boundary conditions, then table gate → broad → narrow → response
//! 4. connector pass, in configuration order
//! 5. rebuild and publish reduced haptic models for active contacts
//! 6. telemetry flush
//!
//! All of it runs on the physics thread; the only state shared with the
//! servo thread is the bridge (and the pose mailbox it feeds).

use std::sync::Arc;
use std::time::Instant;

use tactus_body::{Body, BodyOps};
use tactus_collision::CollisionPipeline;
use tactus_haptic::{reduce, ModelBridge, PoseMailbox};
use tactus_math::Vec3;
use tactus_solver::Integrator;
use tactus_telemetry::{EventBus, EventKind, SimulationEvent};
use tactus_types::{BodyId, Scalar, TactusError, TactusResult};

use crate::connector::Connector;
use crate::snapshot::GeometrySnapshot;

/// Everything one simulation owns. Bodies are indexed by `BodyId`
/// (assigned densely at scene-build time).
pub struct SimulationContext {
    bodies: Vec<Body>,
    integrators: Vec<Box<dyn Integrator>>,
    pipeline: CollisionPipeline,
    connectors: Vec<Box<dyn Connector>>,
    bridge: Arc<ModelBridge>,
    /// Probe body driven from the device pose, if the scene has one.
    probe_input: Option<(BodyId, Arc<PoseMailbox>)>,
    pub bus: EventBus,

    /// Physics timestep (seconds).
    pub dt: Scalar,
    /// Topological radius of the reduced-model neighborhood.
    pub haptic_radius: u32,

    tick: u64,
    sim_time: Scalar,
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("bodies", &self.bodies.len())
            .field("integrators", &self.integrators.len())
            .field("connectors", &self.connectors.len())
            .field("dt", &self.dt)
            .field("haptic_radius", &self.haptic_radius)
            .field("tick", &self.tick)
            .field("sim_time", &self.sim_time)
            .finish()
    }
}

impl SimulationContext {
    /// Assembles a context from prebuilt parts. Scene construction
    /// (`scene::build`) is the usual entry point.
    pub fn new(
        bodies: Vec<Body>,
        integrators: Vec<Box<dyn Integrator>>,
        pipeline: CollisionPipeline,
        dt: Scalar,
        haptic_radius: u32,
    ) -> TactusResult<Self> {
        if bodies.len() != integrators.len() {
            return Err(TactusError::InvalidConfig(format!(
                "{} bodies but {} integrators",
                bodies.len(),
                integrators.len()
            )));
        }
        if !(dt > 0.0) {
            return Err(TactusError::InvalidConfig(format!(
                "timestep must be positive, got {dt}"
            )));
        }
        Ok(Self {
            bodies,
            integrators,
            pipeline,
            connectors: Vec::new(),
            bridge: Arc::new(ModelBridge::new()),
            probe_input: None,
            bus: EventBus::new(),
            dt,
            haptic_radius,
            tick: 0,
            sim_time: 0.0,
        })
    }

    /// The haptic bridge, to hand to a `ServoLoop`.
    pub fn bridge(&self) -> Arc<ModelBridge> {
        Arc::clone(&self.bridge)
    }

    /// Registers a connector; connectors run in registration order,
    /// once per tick.
    pub fn add_connector(&mut self, connector: Box<dyn Connector>) {
        self.connectors.push(connector);
    }

    /// Declares `body` as the device-driven probe and returns the pose
    /// mailbox the servo side should post into.
    pub fn attach_probe_input(&mut self, body: BodyId) -> TactusResult<Arc<PoseMailbox>> {
        if self.body(body).and_then(|b| b.as_probe()).is_none() {
            return Err(TactusError::InvalidConfig(format!(
                "body {} is not a probe",
                body.0
            )));
        }
        let mailbox = Arc::new(PoseMailbox::new());
        self.probe_input = Some((body, Arc::clone(&mailbox)));
        Ok(mailbox)
    }

    /// Body lookup by id.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Mutable body lookup by id.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// Body lookup by name.
    pub fn body_by_name(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Number of bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Completed tick count.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Simulation time (seconds).
    pub fn sim_time(&self) -> Scalar {
        self.sim_time
    }

    /// Runs one physics tick.
    pub fn step(&mut self) {
        let started = Instant::now();
        self.bus.emit(SimulationEvent::new(
            self.tick,
            EventKind::TickBegin {
                sim_time: self.sim_time,
            },
        ));

        // 1. Probe pose from the device mailbox.
        if let Some((id, mailbox)) = &self.probe_input {
            let (position, orientation) = mailbox.read();
            if let Some(probe) = self.bodies[id.index()].as_probe_mut() {
                probe.set_pose(position, orientation);
            }
        }

        // 2. Integrate every body with its own integrator. Contact
        //    conditions from the previous resolution step are still
        //    active here.
        for (body, integrator) in self.bodies.iter_mut().zip(&mut self.integrators) {
            integrator.step(body, self.dt);
        }

        // 3. Collision resolution: undo the previous step's temporary
        //    boundary conditions, then detect and respond afresh.
        self.pipeline.reset_responses(&mut self.bodies);
        let collision = self.pipeline.step(&mut self.bodies);
        self.bus.emit(SimulationEvent::new(
            self.tick,
            EventKind::Collision {
                candidate_pairs: collision.candidate_pairs,
                contacts: collision.contacts.len() as u32,
            },
        ));

        // 4. Connectors, in fixed configuration order.
        for connector in &mut self.connectors {
            connector.apply(&mut self.bodies);
        }

        // 5. Reduced-model rebuild for the active contact node(s). No
        //    contact → clear, so the servo falls back to zero force.
        if collision.haptic_requests.is_empty() {
            self.bridge.clear();
        }
        for request in &collision.haptic_requests {
            let body = &self.bodies[request.body.index()];
            let Some(network) = body.local_network(request.node, self.haptic_radius) else {
                continue;
            };
            let Some(nodes) = body.state().as_nodes() else {
                continue;
            };
            let normal = contact_normal(body, request.node);
            let model = reduce(&network, nodes, normal);
            self.bus.emit(SimulationEvent::new(
                self.tick,
                EventKind::HapticPublish {
                    body: request.body.0,
                    contact_node: request.node,
                    neighbors: model.neighbor_count() as u32,
                },
            ));
            self.bridge.publish(model);
        }

        // 6. Contained numerical warnings.
        for body in &self.bodies {
            if let Some(fem) = body.as_fem() {
                let inverted = fem.last_inversion_count();
                if inverted > 0 {
                    self.bus.emit(SimulationEvent::new(
                        self.tick,
                        EventKind::NumericalWarning {
                            body: body.id.0,
                            message: format!("{inverted} inverted element(s), volume clamped"),
                        },
                    ));
                }
            }
        }

        self.bus.emit(SimulationEvent::new(
            self.tick,
            EventKind::TickEnd {
                wall_time: started.elapsed().as_secs_f64(),
            },
        ));
        self.bus.flush();

        self.tick += 1;
        self.sim_time += self.dt;
    }

    /// Read-only geometry snapshot of one body for the display thread.
    pub fn snapshot(&self, id: BodyId) -> Option<GeometrySnapshot> {
        self.body(id).and_then(GeometrySnapshot::of)
    }

    /// Snapshots of every body with renderable geometry.
    pub fn snapshots(&self) -> Vec<GeometrySnapshot> {
        self.bodies.iter().filter_map(GeometrySnapshot::of).collect()
    }
}

/// Outward surface normal at a contact node: the average of the normals
/// of its incident surface triangles.
fn contact_normal(body: &Body, node: u32) -> Vec3 {
    let Some(fem) = body.as_fem() else {
        return Vec3::Z;
    };
    let mesh = fem.mesh();
    let nodes = fem.nodes();
    let mut normal = Vec3::ZERO;
    for t in 0..mesh.surface_count() {
        let [a, b, c] = mesh.surface_triangle(t);
        if a != node && b != node && c != node {
            continue;
        }
        let pa = nodes.position(a as usize);
        let pb = nodes.position(b as usize);
        let pc = nodes.position(c as usize);
        normal += (pb - pa).cross(pc - pa);
    }
    normal.normalize_or(Vec3::Z)
}
