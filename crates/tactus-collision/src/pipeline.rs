//! The collision pipeline: pair gate → broad → narrow → response.
//!
//! Runs once per physics tick, on the physics thread only. Boundary
//! writes from the response are recorded so they can be undone at the
//! start of the next resolution step (`reset_responses`), keeping
//! collision-induced Dirichlet nodes temporary.

use tactus_body::{Body, BoundaryKind};
use tactus_math::Vec3;
use tactus_types::BodyId;

use crate::aabb::{Aabb, AabbTree};
use crate::contact::{Contact, ContactKind, HapticRequest};
use crate::narrow::{segment_triangle, triangle_triangle};
use crate::rules::CollisionRuleTable;

/// Result of one collision pass.
#[derive(Debug, Default)]
pub struct CollisionStepResult {
    /// Broad-phase leaf pairs that reached the narrow phase.
    pub candidate_pairs: u32,
    /// Narrow-phase contacts.
    pub contacts: Vec<Contact>,
    /// Reduced-model requests issued by the response.
    pub haptic_requests: Vec<HapticRequest>,
}

/// One applied response: body, node, and the condition it replaced.
struct AppliedResponse {
    body: BodyId,
    node: u32,
    previous: Option<BoundaryKind>,
}

/// Broad-phase geometry built for one body this tick.
struct BuiltGeom {
    tree: AabbTree,
    is_probe: bool,
}

/// Table-gated broad/narrow/response collision pipeline.
pub struct CollisionPipeline {
    rules: CollisionRuleTable,
    applied: Vec<AppliedResponse>,
}

impl CollisionPipeline {
    /// Creates a pipeline over a prebuilt rule table.
    pub fn new(rules: CollisionRuleTable) -> Self {
        Self {
            rules,
            applied: Vec::new(),
        }
    }

    /// The rule table.
    pub fn rules(&self) -> &CollisionRuleTable {
        &self.rules
    }

    /// Undoes the boundary conditions applied by the previous response
    /// pass. Called at the start of each resolution step.
    ///
    /// Bodies are looked up by id index, matching the context's layout.
    pub fn reset_responses(&mut self, bodies: &mut [Body]) {
        for applied in self.applied.drain(..) {
            if let Some(boundary) = bodies[applied.body.index()].boundary_mut() {
                match applied.previous {
                    Some(kind) => boundary.set(applied.node, kind),
                    None => {
                        boundary.remove(applied.node);
                    }
                }
            }
        }
    }

    /// Runs the full pipeline over all bodies.
    pub fn step(&mut self, bodies: &mut [Body]) -> CollisionStepResult {
        let mut result = CollisionStepResult::default();

        // Broad-phase trees, rebuilt from current geometry.
        let geoms: Vec<Option<BuiltGeom>> = bodies.iter().map(build_geometry).collect();

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                // Table gate first: disabled pairs cost O(1).
                if !self.rules.is_enabled(bodies[i].id, bodies[j].id) {
                    continue;
                }
                let (Some(gi), Some(gj)) = (&geoms[i], &geoms[j]) else {
                    continue;
                };
                if gi.is_probe && gj.is_probe {
                    continue; // Probe pairs carry no contact semantics
                }

                // Orient so a probe is always the first operand.
                let (a, b, ga, gb) = if gj.is_probe {
                    (j, i, gj, gi)
                } else {
                    (i, j, gi, gj)
                };

                let pairs = ga.tree.overlapping_pairs(&gb.tree);
                result.candidate_pairs += pairs.len() as u32;

                for (prim_a, prim_b) in pairs {
                    let contact = if ga.is_probe {
                        probe_contact(&bodies[a], &bodies[b], prim_b)
                    } else {
                        body_contact(&bodies[a], &bodies[b], prim_a, prim_b)
                    };
                    if let Some(contact) = contact {
                        result.contacts.push(contact);
                    }
                }
            }
        }

        self.respond(bodies, &result.contacts, &mut result.haptic_requests);
        result
    }

    /// Response policy: the contact triangle's nearest vertex becomes a
    /// temporary Dirichlet node; probe contacts additionally request a
    /// reduced haptic model centered on that vertex.
    fn respond(
        &mut self,
        bodies: &mut [Body],
        contacts: &[Contact],
        requests: &mut Vec<HapticRequest>,
    ) {
        for contact in contacts {
            let owner = &bodies[contact.body_b.index()];
            let Some(node) = nearest_triangle_vertex(owner, contact) else {
                continue;
            };

            // The held value: the probe tip for tip contacts, the
            // contact point itself for body-body contacts.
            let value = match contact.kind {
                ContactKind::ProbeTip => bodies[contact.body_a.index()]
                    .as_probe()
                    .map(|p| p.tip())
                    .unwrap_or(contact.point),
                ContactKind::TriangleTriangle => contact.point,
            };

            let owner = &mut bodies[contact.body_b.index()];
            let Some(boundary) = owner.boundary_mut() else {
                continue;
            };
            if boundary.is_fixed(node) {
                continue; // Already held elsewhere
            }

            let previous = boundary.get(node).copied();
            boundary.set(node, BoundaryKind::Fixed { value });
            self.applied.push(AppliedResponse {
                body: contact.body_b,
                node,
                previous,
            });

            if contact.kind == ContactKind::ProbeTip {
                requests.push(HapticRequest {
                    body: contact.body_b,
                    node,
                    probe: Some(contact.body_a),
                });
            }
        }
    }
}

/// Builds a body's broad-phase tree, if it participates in collision.
fn build_geometry(body: &Body) -> Option<BuiltGeom> {
    if let Some(probe) = body.as_probe() {
        let (tip, tail) = probe.segment();
        let tree = AabbTree::build(&[Aabb::from_points(&[tip, tail])]);
        return Some(BuiltGeom {
            tree,
            is_probe: true,
        });
    }
    let fem = body.as_fem()?;
    let mesh = fem.mesh();
    let nodes = fem.nodes();
    let boxes: Vec<Aabb> = (0..mesh.surface_count())
        .map(|t| {
            let [a, b, c] = mesh.surface_triangle(t);
            Aabb::from_points(&[
                nodes.position(a as usize),
                nodes.position(b as usize),
                nodes.position(c as usize),
            ])
        })
        .collect();
    if boxes.is_empty() {
        return None;
    }
    Some(BuiltGeom {
        tree: AabbTree::build(&boxes),
        is_probe: false,
    })
}

/// World-space vertices of a body's surface triangle.
fn surface_vertices(body: &Body, triangle: u32) -> Option<([u32; 3], [Vec3; 3])> {
    let fem = body.as_fem()?;
    let idx = fem.mesh().surface_triangle(triangle as usize);
    let nodes = fem.nodes();
    let pos = idx.map(|i| nodes.position(i as usize));
    Some((idx, pos))
}

/// Probe tip segment against one surface triangle.
fn probe_contact(probe: &Body, owner: &Body, triangle: u32) -> Option<Contact> {
    let (tip, tail) = probe.as_probe()?.segment();
    let (_, [a, b, c]) = surface_vertices(owner, triangle)?;
    let hit = segment_triangle(tip, tail, a, b, c)?;
    Some(Contact {
        kind: ContactKind::ProbeTip,
        body_a: probe.id,
        body_b: owner.id,
        triangle,
        point: hit.point,
        barycentric: hit.barycentric,
    })
}

/// Surface triangle of one body against another's.
fn body_contact(first: &Body, owner: &Body, tri_a: u32, tri_b: u32) -> Option<Contact> {
    let (_, [a0, a1, a2]) = surface_vertices(first, tri_a)?;
    let (_, [b0, b1, b2]) = surface_vertices(owner, tri_b)?;
    let hit = triangle_triangle(a0, a1, a2, b0, b1, b2)?;
    Some(Contact {
        kind: ContactKind::TriangleTriangle,
        body_a: first.id,
        body_b: owner.id,
        triangle: tri_b,
        point: hit.point,
        barycentric: hit.barycentric,
    })
}

/// The vertex of the contact triangle nearest the contact point.
fn nearest_triangle_vertex(owner: &Body, contact: &Contact) -> Option<u32> {
    let (idx, pos) = surface_vertices(owner, contact.triangle)?;
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for i in 0..3 {
        let d = (pos[i] - contact.point).length_squared();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    Some(idx[best])
}
