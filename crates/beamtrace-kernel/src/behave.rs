//! Optical behaviour of an element applied at a valid surface hit.
//!
//! The incoming ray is already positioned at the intersection point in
//! element-local coordinates, with path length and last-element index
//! updated. Each behaviour either produces the outgoing ray or a
//! terminal event.
//!
//! Wastebox policy encoded here and in the collision test: mirrors and
//! gratings let rays that miss the cutout pass untouched, slits absorb
//! everything outside their opening, image planes never block.

use beamtrace_beamline::{Behaviour, Cutout, Element, EventType, Ray};
use beamtrace_material::{MaterialTables, VACUUM};
use beamtrace_math::rng::SquaresRng;
use beamtrace_math::{energy_to_wavelength, Vec3};
use log::error;

use crate::diffraction::{bessel_diff, fraun_diff};
use crate::fresnel::{apply_reflectivity, fresnel_reflection};

/// Result of applying an element's behaviour to a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The ray continues; the caller records a hit event and propagates
    /// it to the next element.
    Continue(Ray),
    /// The ray's path ends here with the given terminal event.
    Terminal(Ray, EventType),
}

/// Apply `element`'s behaviour to a ray at a collision point.
///
/// `normal` is the unit surface normal at the hit, oriented against the
/// incoming direction.
pub fn behave(
    ray: Ray,
    normal: &Vec3,
    element: &Element,
    tables: &MaterialTables,
    rng: &mut SquaresRng,
) -> Outcome {
    match element.behaviour {
        Behaviour::Mirror => behave_mirror(ray, normal, element.material, tables),
        Behaviour::Grating { line_density, order, vls } => {
            behave_grating(ray, normal, line_density, order, &vls, element.material, tables)
        }
        Behaviour::Slit { ref opening, ref beamstop } => {
            behave_slit(ray, normal, opening, beamstop.as_ref(), rng)
        }
        Behaviour::ImagePlane => Outcome::Continue(ray),
    }
}

/// Specular reflection plus material reflectivity.
fn behave_mirror(
    mut ray: Ray,
    normal: &Vec3,
    material: i32,
    tables: &MaterialTables,
) -> Outcome {
    let cos_i = -ray.direction.dot(normal);
    ray.direction = (ray.direction + 2.0 * cos_i * normal).normalize();

    match attenuate(&mut ray, material, cos_i, tables) {
        Ok(()) => Outcome::Continue(ray),
        Err(outcome) => outcome,
    }
}

/// Diffraction-order redirection: the direction cosine along the
/// dispersion direction changes by `m·λ·n(z)`, the groove-parallel
/// cosine is preserved, and the normal component flips (reflection
/// grating).
fn behave_grating(
    mut ray: Ray,
    normal: &Vec3,
    line_density: f64,
    order: f64,
    vls: &[f64; 6],
    material: i32,
    tables: &MaterialTables,
) -> Outcome {
    let cos_i = -ray.direction.dot(normal);
    let wavelength = energy_to_wavelength(ray.energy);
    let density = vls_density(line_density, ray.position.z, vls);
    // λ in nm times lines/mm: 1e-6 makes the cosine shift dimensionless
    let a = order * wavelength * density * 1e-6;

    let (g, q) = surface_frame(normal);
    let d = ray.direction;
    let along_grooves = d.dot(&g);
    let dispersion = d.dot(&q) + a;

    let rem = 1.0 - along_grooves * along_grooves - dispersion * dispersion;
    if rem < 0.0 {
        // evanescent order: the direction would leave the unit sphere
        return Outcome::Terminal(ray, EventType::BeyondHorizon);
    }

    ray.direction = (along_grooves * g + dispersion * q + rem.sqrt() * normal).normalize();
    ray.order = order;

    match attenuate(&mut ray, material, cos_i, tables) {
        Ok(()) => Outcome::Continue(ray),
        Err(outcome) => outcome,
    }
}

/// Aperture transmission with diffraction broadening.
fn behave_slit(
    mut ray: Ray,
    normal: &Vec3,
    opening: &Cutout,
    beamstop: Option<&Cutout>,
    rng: &mut SquaresRng,
) -> Outcome {
    let (x, z) = (ray.position.x, ray.position.z);

    if beamstop.is_some_and(|b| b.contains(x, z)) {
        return Outcome::Terminal(ray, EventType::Absorbed);
    }
    if !opening.contains(x, z) {
        return Outcome::Terminal(ray, EventType::Absorbed);
    }

    let wavelength = energy_to_wavelength(ray.energy);
    let (dphi, dpsi) = match *opening {
        Cutout::Elliptical { diameter_x, .. } => bessel_diff(diameter_x / 2.0, wavelength, rng),
        Cutout::Rect { width, length } => {
            (fraun_diff(width, wavelength, rng), fraun_diff(length, wavelength, rng))
        }
        Cutout::Trapezoid { width_a, width_b, length } => (
            fraun_diff((width_a + width_b) / 2.0, wavelength, rng),
            fraun_diff(length, wavelength, rng),
        ),
        Cutout::Unlimited => (0.0, 0.0),
    };

    if dphi != 0.0 || dpsi != 0.0 {
        // tilt the transmitted direction by the sampled angles in the
        // two transverse planes
        let (g, q) = surface_frame(normal);
        let d = ray.direction;
        let du = d.dot(&g) + dphi.sin();
        let dv = d.dot(&q) + dpsi.sin();
        let rem = 1.0 - du * du - dv * dv;
        if rem < 0.0 {
            return Outcome::Terminal(ray, EventType::BeyondHorizon);
        }
        // transmitted: keep travelling against the oriented normal
        ray.direction = (du * g + dv * q - rem.sqrt() * normal).normalize();
    }

    Outcome::Continue(ray)
}

/// Look up the material's complex refractive index and fold the Fresnel
/// reflectivity into the Stokes vector. Vacuum interfaces are ideal.
fn attenuate(
    ray: &mut Ray,
    material: i32,
    cos_incidence: f64,
    tables: &MaterialTables,
) -> Result<(), Outcome> {
    if material == VACUUM {
        return Ok(());
    }
    match tables.refractive_index(ray.energy, material) {
        Ok(index) => {
            let coeffs = fresnel_reflection(index, cos_incidence.clamp(0.0, 1.0));
            apply_reflectivity(ray, &coeffs);
            Ok(())
        }
        Err(err) => {
            error!("refractive-index lookup failed: {err}");
            Err(Outcome::Terminal(*ray, EventType::FatalError))
        }
    }
}

/// Groove density at longitudinal position `z` for a VLS ruling.
fn vls_density(line_density: f64, z: f64, vls: &[f64; 6]) -> f64 {
    let mut factor = 1.0;
    let mut zn = z;
    for (i, b) in vls.iter().enumerate() {
        factor += (i + 2) as f64 * b * zn;
        zn *= z;
    }
    line_density * factor
}

/// Orthonormal tangent frame `(g, q)` of the surface at a hit with
/// oriented normal `n`: `g` along the groove direction (local x
/// projected into the tangent plane), `q = g × n` along the dispersion
/// direction.
fn surface_frame(n: &Vec3) -> (Vec3, Vec3) {
    let mut g = Vec3::x() - Vec3::x().dot(n) * n;
    if g.norm() < 1e-9 {
        g = Vec3::z() - Vec3::z().dot(n) * n;
    }
    let g = g.normalize();
    let q = g.cross(n);
    (g, q)
}
