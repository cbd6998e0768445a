//! Narrow-phase primitive tests.
//!
//! Both tests return the intersection point and its barycentric
//! coordinates in the owning triangle. Triangle/triangle is decided by
//! testing each edge of one triangle as a segment against the other
//! (coplanar-overlap configurations are not reported; they are
//! transient under motion and the response would have no well-defined
//! contact point anyway).

use tactus_math::Vec3;
use tactus_types::constants::DEGENERATE_AREA_THRESHOLD;
use tactus_types::Scalar;

/// A narrow-phase hit on a triangle.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Intersection point in world space.
    pub point: Vec3,
    /// Barycentric coordinates of the point in the triangle.
    pub barycentric: [Scalar; 3],
}

/// Segment/triangle intersection (Möller–Trumbore, clipped to the
/// segment).
///
/// Returns the hit closest to `p0` when the segment crosses the
/// triangle's interior, `None` otherwise.
pub fn segment_triangle(p0: Vec3, p1: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<TriangleHit> {
    let dir = p1 - p0;
    let e1 = b - a;
    let e2 = c - a;

    let pvec = dir.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < DEGENERATE_AREA_THRESHOLD {
        return None; // Segment parallel to the triangle plane
    }
    let inv_det = 1.0 / det;

    let tvec = p0 - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(e1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(qvec) * inv_det;
    if !(0.0..=1.0).contains(&t) {
        return None; // Beyond the segment
    }

    Some(TriangleHit {
        point: p0 + dir * t,
        barycentric: [1.0 - u - v, u, v],
    })
}

/// Triangle/triangle intersection.
///
/// Tests the three edges of `(a0, a1, a2)` against `(b0, b1, b2)` and
/// vice versa; the returned hit lies on — and is barycentric in — the
/// *second* triangle, which is the owning triangle for response
/// purposes.
pub fn triangle_triangle(
    a0: Vec3,
    a1: Vec3,
    a2: Vec3,
    b0: Vec3,
    b1: Vec3,
    b2: Vec3,
) -> Option<TriangleHit> {
    for (p, q) in [(a0, a1), (a1, a2), (a2, a0)] {
        if let Some(hit) = segment_triangle(p, q, b0, b1, b2) {
            return Some(hit);
        }
    }
    // Edges of B crossing A: express the hit in B's frame by projecting
    // the intersection point onto B.
    for (p, q) in [(b0, b1), (b1, b2), (b2, b0)] {
        if let Some(hit) = segment_triangle(p, q, a0, a1, a2) {
            if let Some(bary) = barycentric_in_triangle(hit.point, b0, b1, b2) {
                return Some(TriangleHit {
                    point: hit.point,
                    barycentric: bary,
                });
            }
        }
    }
    None
}

/// Barycentric coordinates of a point lying on (or very near) a
/// triangle's plane. `None` for degenerate triangles.
pub fn barycentric_in_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<[Scalar; 3]> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d00 = ab.dot(ab);
    let d01 = ab.dot(ac);
    let d11 = ac.dot(ac);
    let d20 = ap.dot(ab);
    let d21 = ap.dot(ac);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < DEGENERATE_AREA_THRESHOLD {
        return None;
    }
    let inv = 1.0 / denom;
    let v = (d11 * d20 - d01 * d21) * inv;
    let w = (d00 * d21 - d01 * d20) * inv;
    Some([1.0 - v - w, v, w])
}
