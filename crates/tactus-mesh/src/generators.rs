//! Analytic mesh generators for tests and demos.

use tactus_types::{Scalar, TactusResult};

use crate::TetMesh;

/// A single tetrahedron with nodes at the origin and the three unit axes.
///
/// Node order: `(0,0,0)`, `(1,0,0)`, `(0,1,0)`, `(0,0,1)`.
pub fn single_tet() -> TetMesh {
    TetMesh::from_parts(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        &[[0, 1, 2, 3]],
    )
    .expect("unit tetrahedron is a valid mesh")
}

/// A rectangular bar of `nx × ny × nz` cells, each split into six
/// tetrahedra (Kuhn subdivision), with the given cell spacing.
///
/// Nodes are laid out x-fastest: node `(i, j, k)` has index
/// `i + j·(nx+1) + k·(nx+1)·(ny+1)`.
pub fn bar_grid(nx: usize, ny: usize, nz: usize, spacing: Scalar) -> TactusResult<TetMesh> {
    let mut positions = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                positions.push([
                    i as Scalar * spacing,
                    j as Scalar * spacing,
                    k as Scalar * spacing,
                ]);
            }
        }
    }

    let node = |i: usize, j: usize, k: usize| -> u32 {
        (i + j * (nx + 1) + k * (nx + 1) * (ny + 1)) as u32
    };

    // Kuhn subdivision: six tets per cell, all sharing the main diagonal
    // from corner (0,0,0) to corner (1,1,1). Each axis permutation of the
    // path 000 → 111 yields one tet.
    const PATHS: [[(usize, usize, usize); 2]; 6] = [
        [(1, 0, 0), (1, 1, 0)],
        [(1, 0, 0), (1, 0, 1)],
        [(0, 1, 0), (1, 1, 0)],
        [(0, 1, 0), (0, 1, 1)],
        [(0, 0, 1), (1, 0, 1)],
        [(0, 0, 1), (0, 1, 1)],
    ];

    let mut tets = Vec::with_capacity(nx * ny * nz * 6);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let origin = node(i, j, k);
                let far = node(i + 1, j + 1, k + 1);
                for path in PATHS {
                    let (dx0, dy0, dz0) = path[0];
                    let (dx1, dy1, dz1) = path[1];
                    tets.push([
                        origin,
                        node(i + dx0, j + dy0, k + dz0),
                        node(i + dx1, j + dy1, k + dz1),
                        far,
                    ]);
                }
            }
        }
    }

    TetMesh::from_parts(&positions, &tets)
}
