//! Building the reduced model from a contact node's mechanical network.
//!
//! Edges are classified by role:
//! - **internal** — between two free neighbor nodes: state coupling
//!   (`A11`/`A12`)
//! - **contact-incident** — touching the contact node: state coupling
//!   for the neighbor side plus input/output coupling (`B1`, `C11`,
//!   `C12`, `D`)
//! - **boundary-incident** — touching a node held fixed elsewhere:
//!   a frozen reaction. When the fixed edge meets the contact node it
//!   feeds `D`; its current force is carried by `f0`/`zdot0` either way.
//!
//! Per-edge 3×3 blocks come from the standard spring linearization
//! around the current configuration:
//!
//! ```text
//! K = k·[(1 − L0/‖d‖)·(I − d̂d̂ᵀ) + d̂d̂ᵀ]      B = b·d̂d̂ᵀ
//! ```
//!
//! State-coupling rows are divided by the owning node's mass; zero-mass
//! (fixed) nodes never enter the state.

use std::collections::BTreeMap;

use tactus_body::{EdgeNetwork, NodeState};
use tactus_math::tensor::{entry, outer};
use tactus_math::{Mat3, Vec3};
use tactus_types::constants::EPSILON;
use tactus_types::Scalar;

use crate::reduced::ReducedModel;

/// Builds the reduced model for a contact node from its local network
/// and the body's current state.
///
/// `normal` is the contact surface normal recorded in the model for the
/// servo side.
pub fn reduce(network: &EdgeNetwork, state: &NodeState, normal: Vec3) -> ReducedModel {
    let contact = network.contact_node;

    // Free neighbors: everything in the ball except the contact node
    // and nodes held fixed (or massless) elsewhere.
    let mut neighbors = Vec::new();
    let mut masses = Vec::new();
    for (idx, &node) in network.nodes.iter().enumerate() {
        if node == contact || network.fixed[idx] || network.masses[idx] <= 0.0 {
            continue;
        }
        neighbors.push(node);
        masses.push(network.masses[idx]);
    }
    let block_of: BTreeMap<u32, usize> = neighbors
        .iter()
        .enumerate()
        .map(|(b, &n)| (n, b))
        .collect();

    let n = neighbors.len();
    let dim = 3 * n;
    let mut model = ReducedModel {
        contact_node: contact,
        neighbors,
        dim,
        a11: vec![0.0; dim * dim],
        a12: vec![0.0; dim * dim],
        b1: vec![0.0; dim * 3],
        c11: vec![0.0; 3 * dim],
        c12: vec![0.0; 3 * dim],
        d: Mat3::ZERO,
        f0: Vec3::ZERO,
        zdot0: vec![0.0; 2 * dim],
        normal,
        u0: state.position(contact as usize),
    };

    // Net current force per network node, for f0 and the acceleration
    // anchor.
    let mut net_force: BTreeMap<u32, Vec3> = BTreeMap::new();

    for edge in &network.edges {
        let (i, j) = (edge.i, edge.j);
        let pi = state.position(i as usize);
        let pj = state.position(j as usize);
        let d = pj - pi;
        let len = d.length();
        if len < EPSILON {
            continue; // Direction undefined
        }
        let dir = d / len;

        // Current spring force on endpoint i (j gets the negative).
        let rel_vel = (state.velocity(j as usize) - state.velocity(i as usize)).dot(dir);
        let force_i =
            dir * (edge.stiffness * (len - edge.rest_length) + edge.damping * rel_vel);
        *net_force.entry(i).or_insert(Vec3::ZERO) += force_i;
        *net_force.entry(j).or_insert(Vec3::ZERO) -= force_i;

        // Linearized blocks around the current configuration.
        let projector = outer(dir, dir);
        let k_block = (Mat3::IDENTITY - projector) * (1.0 - edge.rest_length / len)
            * edge.stiffness
            + projector * edge.stiffness;
        let b_block = projector * edge.damping;

        let touches_contact = i == contact || j == contact;
        if touches_contact {
            let other = if i == contact { j } else { i };
            if let Some(&bn) = block_of.get(&other) {
                let m = masses[bn];

                // Neighbor dynamics: δf_n = K(δu − δx_n) + B(δu̇ − δv_n).
                add_block(&mut model.a11, dim, bn, bn, &k_block, -1.0 / m);
                add_block(&mut model.a12, dim, bn, bn, &b_block, -1.0 / m);
                add_input_block(&mut model.b1, bn, &k_block, 1.0 / m);

                // Contact force: δf_c = K(δx_n − δu) + B(δv_n − δu̇).
                add_output_block(&mut model.c11, dim, bn, &k_block, 1.0);
                add_output_block(&mut model.c12, dim, bn, &b_block, 1.0);
                model.d += k_block * -1.0;
            } else {
                // Contact- and boundary-incident at once: the far end is
                // frozen, only the feedthrough remains.
                model.d += k_block * -1.0;
            }
        } else {
            let bi = block_of.get(&i).copied();
            let bj = block_of.get(&j).copied();
            match (bi, bj) {
                (Some(bi), Some(bj)) => {
                    // Internal: symmetric state coupling.
                    let mi = masses[bi];
                    let mj = masses[bj];
                    add_block(&mut model.a11, dim, bi, bi, &k_block, -1.0 / mi);
                    add_block(&mut model.a11, dim, bi, bj, &k_block, 1.0 / mi);
                    add_block(&mut model.a11, dim, bj, bj, &k_block, -1.0 / mj);
                    add_block(&mut model.a11, dim, bj, bi, &k_block, 1.0 / mj);
                    add_block(&mut model.a12, dim, bi, bi, &b_block, -1.0 / mi);
                    add_block(&mut model.a12, dim, bi, bj, &b_block, 1.0 / mi);
                    add_block(&mut model.a12, dim, bj, bj, &b_block, -1.0 / mj);
                    add_block(&mut model.a12, dim, bj, bi, &b_block, 1.0 / mj);
                }
                // Boundary-incident away from the contact node: the
                // frozen reaction is already carried by the force
                // anchor; no state coupling enters the model.
                _ => {}
            }
        }
    }

    // Anchor terms: f0 at the contact node, zdot0 = neighbor velocities
    // followed by accelerations.
    model.f0 = net_force.get(&contact).copied().unwrap_or(Vec3::ZERO);
    for (bn, &node) in model.neighbors.iter().enumerate() {
        let v = state.velocity(node as usize);
        let a = net_force.get(&node).copied().unwrap_or(Vec3::ZERO) / masses[bn];
        for r in 0..3 {
            model.zdot0[3 * bn + r] = v[r];
            model.zdot0[dim + 3 * bn + r] = a[r];
        }
    }

    model
}

/// Adds `scale · m` into the 3×3 block at `(row_block, col_block)` of a
/// `dim × dim` row-major matrix.
fn add_block(
    mat: &mut [Scalar],
    dim: usize,
    row_block: usize,
    col_block: usize,
    m: &Mat3,
    scale: Scalar,
) {
    for r in 0..3 {
        for c in 0..3 {
            mat[(3 * row_block + r) * dim + 3 * col_block + c] += scale * entry(m, r, c);
        }
    }
}

/// Adds `scale · m` into the 3-column input block of a `dim × 3`
/// row-major matrix at `row_block`.
fn add_input_block(mat: &mut [Scalar], row_block: usize, m: &Mat3, scale: Scalar) {
    for r in 0..3 {
        for c in 0..3 {
            mat[(3 * row_block + r) * 3 + c] += scale * entry(m, r, c);
        }
    }
}

/// Adds `scale · m` into the 3-row output block of a `3 × dim`
/// row-major matrix at `col_block`.
fn add_output_block(mat: &mut [Scalar], dim: usize, col_block: usize, m: &Mat3, scale: Scalar) {
    for r in 0..3 {
        for c in 0..3 {
            mat[r * dim + 3 * col_block + c] += scale * entry(m, r, c);
        }
    }
}
