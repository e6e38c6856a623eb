//! Ray-surface collision in element-local coordinates.
//!
//! Each surface tag has a dedicated closed-form intersector. A
//! collision only counts when the intersection point lies inside the
//! element's cutout; what happens to rays that miss is the element's
//! wastebox policy, decided by the caller.

use beamtrace_beamline::{Cutout, QuadricParams, Ray, Surface};
use beamtrace_math::{Vec3, COLLISION_EPSILON};

use crate::solve::{solve_quadratic, solve_quartic};

/// A valid surface hit in element-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Intersection point.
    pub point: Vec3,
    /// Unit surface normal at the intersection, oriented against the
    /// incoming direction.
    pub normal: Vec3,
    /// Distance travelled along the ray to the hit, in mm.
    pub distance: f64,
}

/// Find the first forward intersection of a local-frame ray with the
/// element surface, inside the cutout.
///
/// Returns `None` when the surface is missed entirely or the hit lands
/// outside the cutout.
pub fn find_collision(ray: &Ray, surface: &Surface, cutout: &Cutout) -> Option<Collision> {
    let col = match *surface {
        Surface::PlaneXz => intersect_plane_xz(&ray.position, &ray.direction),
        Surface::Quadric(ref q) => intersect_quadric(&ray.position, &ray.direction, q),
        Surface::Toroid { long_radius, short_radius } => {
            intersect_toroid(&ray.position, &ray.direction, long_radius, short_radius)
        }
    }?;

    if !cutout.contains(col.point.x, col.point.z) {
        return None;
    }
    Some(col)
}

/// Intersection with the y = 0 plane.
fn intersect_plane_xz(origin: &Vec3, direction: &Vec3) -> Option<Collision> {
    if direction.y.abs() < 1e-12 {
        return None;
    }
    let t = -origin.y / direction.y;
    if t < COLLISION_EPSILON {
        return None;
    }
    let point = origin + t * direction;
    // normal faces the incoming ray
    let normal = Vec3::new(0.0, -direction.y.signum(), 0.0);
    Some(Collision { point, normal, distance: t })
}

/// Intersection with a general quadric, nearest forward root.
fn intersect_quadric(origin: &Vec3, direction: &Vec3, q: &QuadricParams) -> Option<Collision> {
    let o = origin;
    let d = direction;

    // Quadratic in t after substituting p = o + t*d into the surface
    // equation.
    let a = q.a11 * d.x * d.x
        + q.a22 * d.y * d.y
        + q.a33 * d.z * d.z
        + 2.0 * (q.a12 * d.x * d.y + q.a13 * d.x * d.z + q.a23 * d.y * d.z);
    let b = 2.0
        * (q.a11 * o.x * d.x
            + q.a22 * o.y * d.y
            + q.a33 * o.z * d.z
            + q.a12 * (o.x * d.y + o.y * d.x)
            + q.a13 * (o.x * d.z + o.z * d.x)
            + q.a23 * (o.y * d.z + o.z * d.y)
            + q.a14 * d.x
            + q.a24 * d.y
            + q.a34 * d.z);
    let c = quadric_value(q, o);

    let t = solve_quadratic(a, b, c)
        .into_iter()
        .find(|&t| t > COLLISION_EPSILON)?;

    let point = o + t * d;
    let normal = orient_against(quadric_gradient(q, &point), d)?;
    Some(Collision { point, normal, distance: t })
}

fn quadric_value(q: &QuadricParams, p: &Vec3) -> f64 {
    q.a11 * p.x * p.x
        + q.a22 * p.y * p.y
        + q.a33 * p.z * p.z
        + 2.0 * (q.a12 * p.x * p.y + q.a13 * p.x * p.z + q.a23 * p.y * p.z)
        + 2.0 * (q.a14 * p.x + q.a24 * p.y + q.a34 * p.z)
        + q.a44
}

fn quadric_gradient(q: &QuadricParams, p: &Vec3) -> Vec3 {
    Vec3::new(
        q.a11 * p.x + q.a12 * p.y + q.a13 * p.z + q.a14,
        q.a12 * p.x + q.a22 * p.y + q.a23 * p.z + q.a24,
        q.a13 * p.x + q.a23 * p.y + q.a33 * p.z + q.a34,
    )
}

/// Intersection with the element toroid: meridional radius `long_r` in
/// the yz plane, sagittal radius `short_r` in the xy plane, tangent to
/// the xz plane at the origin.
///
/// The surface is the torus with axis along x through `(0, -long_r, 0)`,
/// ring radius `long_r - short_r` and tube radius `short_r`; the
/// intersection reduces to a quartic in the ray parameter.
fn intersect_toroid(
    origin: &Vec3,
    direction: &Vec3,
    long_r: f64,
    short_r: f64,
) -> Option<Collision> {
    let ring = long_r - short_r;
    let ring2 = ring * ring;
    let tube2 = short_r * short_r;

    // Shift into the torus frame
    let o = origin + Vec3::new(0.0, long_r, 0.0);
    let d = direction;

    let od = o.dot(d);
    let oo = o.dot(&o);

    // Components along the torus axis (local x)
    let oa = o.x;
    let da = d.x;

    let k = oo - ring2 - tube2;

    let c4 = 1.0;
    let c3 = 4.0 * od;
    let c2 = 2.0 * k + 4.0 * od * od + 4.0 * ring2 * da * da;
    let c1 = 4.0 * k * od + 8.0 * ring2 * oa * da;
    let c0 = k * k - 4.0 * ring2 * (tube2 - oa * oa);

    let t = solve_quartic(c4, c3, c2, c1, c0)
        .into_iter()
        .find(|&t| t > COLLISION_EPSILON)?;

    let point = origin + t * d;

    // Gradient of ((s - ring)^2 + x^2 - tube^2), s = radial distance
    // from the torus axis
    let p = point + Vec3::new(0.0, long_r, 0.0);
    let s = (p.y * p.y + p.z * p.z).sqrt();
    if s < 1e-12 {
        return None;
    }
    let f = (s - ring) / s;
    let normal = orient_against(Vec3::new(p.x, f * p.y, f * p.z), d)?;
    Some(Collision { point, normal, distance: t })
}

/// Normalize `n` and flip it to face against the propagation direction.
fn orient_against(n: Vec3, direction: &Vec3) -> Option<Vec3> {
    let len = n.norm();
    if len < 1e-12 {
        return None;
    }
    let n = n / len;
    Some(if n.dot(direction) > 0.0 { -n } else { n })
}
