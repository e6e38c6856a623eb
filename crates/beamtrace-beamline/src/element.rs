//! Optical-element parameter blocks.
//!
//! Every element is a fixed-shape record: a surface tag with its
//! numeric coefficients, a cutout bounding the usable area, a behaviour
//! tag selecting the physics, a material index and the pair of
//! world/element transforms. A closed set of tags dispatched by `match`
//! keeps the kernel free of virtual calls and uniform across rays.

use beamtrace_math::{Mat3, Transform, Vec3};
use beamtrace_material::VACUUM;

/// Coefficients of a general quadric surface
/// `a11·x² + a22·y² + a33·z² + 2a12·xy + 2a13·xz + 2a23·yz
///  + 2a14·x + 2a24·y + 2a34·z + a44 = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadricParams {
    /// x² coefficient.
    pub a11: f64,
    /// xy cross coefficient.
    pub a12: f64,
    /// xz cross coefficient.
    pub a13: f64,
    /// x linear coefficient.
    pub a14: f64,
    /// y² coefficient.
    pub a22: f64,
    /// yz cross coefficient.
    pub a23: f64,
    /// y linear coefficient.
    pub a24: f64,
    /// z² coefficient.
    pub a33: f64,
    /// z linear coefficient.
    pub a34: f64,
    /// Constant term.
    pub a44: f64,
}

impl QuadricParams {
    /// Sphere of the given radius tangent to the xz plane at the
    /// origin, opening towards +y: `x² + y² + z² - 2·R·y = 0`.
    pub fn sphere(radius: f64) -> Self {
        Self {
            a11: 1.0,
            a12: 0.0,
            a13: 0.0,
            a14: 0.0,
            a22: 1.0,
            a23: 0.0,
            a24: -radius,
            a33: 1.0,
            a34: 0.0,
            a44: 0.0,
        }
    }
}

/// The surface of an optical element, in element-local coordinates.
///
/// All surfaces pass through the local origin with the optical surface
/// normal along +y there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// The y = 0 plane.
    PlaneXz,
    /// A general quadric.
    Quadric(QuadricParams),
    /// A toroid tangent to the xz plane at the origin, with meridional
    /// radius `long_radius` (yz plane) and sagittal radius
    /// `short_radius` (xy plane).
    Toroid {
        /// Meridional (tangential) radius in mm.
        long_radius: f64,
        /// Sagittal radius in mm.
        short_radius: f64,
    },
}

/// Bounded region of the surface, tested at the local intersection
/// point `(x, z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutout {
    /// No bound; every intersection counts.
    Unlimited,
    /// Axis-aligned rectangle centered on the origin.
    Rect {
        /// Extent along local x, in mm.
        width: f64,
        /// Extent along local z, in mm.
        length: f64,
    },
    /// Ellipse centered on the origin.
    Elliptical {
        /// Diameter along local x, in mm.
        diameter_x: f64,
        /// Diameter along local z, in mm.
        diameter_z: f64,
    },
    /// Symmetric trapezoid: width interpolates from `width_a` at
    /// `z = -length/2` to `width_b` at `z = +length/2`.
    Trapezoid {
        /// Width at the -z edge, in mm.
        width_a: f64,
        /// Width at the +z edge, in mm.
        width_b: f64,
        /// Extent along local z, in mm.
        length: f64,
    },
}

impl Cutout {
    /// Whether the local surface point `(x, z)` lies inside the region.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        match *self {
            Cutout::Unlimited => true,
            Cutout::Rect { width, length } => {
                x.abs() <= width / 2.0 && z.abs() <= length / 2.0
            }
            Cutout::Elliptical { diameter_x, diameter_z } => {
                let u = 2.0 * x / diameter_x;
                let v = 2.0 * z / diameter_z;
                u * u + v * v <= 1.0
            }
            Cutout::Trapezoid { width_a, width_b, length } => {
                if z.abs() > length / 2.0 {
                    return false;
                }
                let s = z / length + 0.5;
                let half_width = (width_a + (width_b - width_a) * s) / 2.0;
                x.abs() <= half_width
            }
        }
    }
}

/// The optical physics an element applies to a ray that hits it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behaviour {
    /// Specular reflection with material reflectivity.
    Mirror,
    /// Diffraction-order redirection on reflection.
    Grating {
        /// Groove density at the element center, lines/mm.
        line_density: f64,
        /// Diffraction order to trace.
        order: f64,
        /// Variable-line-spacing polynomial coefficients b1..b6; all
        /// zero for a uniform ruling.
        vls: [f64; 6],
    },
    /// Aperture: pass rays through the opening with diffraction
    /// broadening, absorb the rest.
    Slit {
        /// Transmitting region of the slit plane.
        opening: Cutout,
        /// Optional central obstruction inside the opening.
        beamstop: Option<Cutout>,
    },
    /// Pass-through detector plane recording the ray state.
    ImagePlane,
}

/// One optical element: immutable parameter block owned by the
/// [`Beamline`](crate::Beamline) for the duration of a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// World-to-element transform.
    pub in_trans: Transform,
    /// Element-to-world transform.
    pub out_trans: Transform,
    /// Surface geometry tag.
    pub surface: Surface,
    /// Usable-area bound ("wastebox" region).
    pub cutout: Cutout,
    /// Physics tag.
    pub behaviour: Behaviour,
    /// Material atomic number in 1..=92, or -1 for an ideal (vacuum)
    /// interface.
    pub material: i32,
}

impl Element {
    /// Element at `position` with the given world `orientation`
    /// (columns are the element's local x/y/z axes in world space).
    pub fn new(
        surface: Surface,
        cutout: Cutout,
        behaviour: Behaviour,
        material: i32,
        position: Vec3,
        orientation: Mat3,
    ) -> Self {
        let out_trans = Transform::from_rotation_translation(&orientation, &position);
        let in_trans = out_trans.rigid_inverse();
        Self { in_trans, out_trans, surface, cutout, behaviour, material }
    }
}

/// Plane mirror with a rectangular usable area.
pub fn plane_mirror(
    width: f64,
    length: f64,
    material: i32,
    position: Vec3,
    orientation: Mat3,
) -> Element {
    Element::new(
        Surface::PlaneXz,
        Cutout::Rect { width, length },
        Behaviour::Mirror,
        material,
        position,
        orientation,
    )
}

/// Spherical mirror with the given curvature radius.
pub fn sphere_mirror(
    radius: f64,
    width: f64,
    length: f64,
    material: i32,
    position: Vec3,
    orientation: Mat3,
) -> Element {
    Element::new(
        Surface::Quadric(QuadricParams::sphere(radius)),
        Cutout::Rect { width, length },
        Behaviour::Mirror,
        material,
        position,
        orientation,
    )
}

/// Toroidal mirror with meridional and sagittal curvature radii.
pub fn toroid_mirror(
    long_radius: f64,
    short_radius: f64,
    width: f64,
    length: f64,
    material: i32,
    position: Vec3,
    orientation: Mat3,
) -> Element {
    Element::new(
        Surface::Toroid { long_radius, short_radius },
        Cutout::Rect { width, length },
        Behaviour::Mirror,
        material,
        position,
        orientation,
    )
}

/// Plane grating with uniform or variable line spacing.
#[allow(clippy::too_many_arguments)]
pub fn plane_grating(
    line_density: f64,
    order: f64,
    vls: [f64; 6],
    width: f64,
    length: f64,
    material: i32,
    position: Vec3,
    orientation: Mat3,
) -> Element {
    Element::new(
        Surface::PlaneXz,
        Cutout::Rect { width, length },
        Behaviour::Grating { line_density, order, vls },
        material,
        position,
        orientation,
    )
}

/// Spherical grating.
#[allow(clippy::too_many_arguments)]
pub fn sphere_grating(
    radius: f64,
    line_density: f64,
    order: f64,
    vls: [f64; 6],
    width: f64,
    length: f64,
    material: i32,
    position: Vec3,
    orientation: Mat3,
) -> Element {
    Element::new(
        Surface::Quadric(QuadricParams::sphere(radius)),
        Cutout::Rect { width, length },
        Behaviour::Grating { line_density, order, vls },
        material,
        position,
        orientation,
    )
}

/// Slit: a plane that transmits through `opening` (optionally blocked
/// by `beamstop`) and absorbs everywhere else.
pub fn slit(
    opening: Cutout,
    beamstop: Option<Cutout>,
    position: Vec3,
    orientation: Mat3,
) -> Element {
    Element::new(
        Surface::PlaneXz,
        Cutout::Unlimited,
        Behaviour::Slit { opening, beamstop },
        VACUUM,
        position,
        orientation,
    )
}

/// Image plane: records every ray crossing it and lets them continue.
pub fn image_plane(position: Vec3, orientation: Mat3) -> Element {
    Element::new(
        Surface::PlaneXz,
        Cutout::Unlimited,
        Behaviour::ImagePlane,
        VACUUM,
        position,
        orientation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamtrace_math::Point3;

    #[test]
    fn test_sphere_quadric_coefficients() {
        let q = QuadricParams::sphere(10_000.0);
        // Surface passes through the origin
        assert_eq!(q.a44, 0.0);
        // x² + y² + z² - 2·R·y = 0 at (0, 2R, 0)
        let r = 10_000.0;
        let y = 2.0 * r;
        assert_eq!(q.a22 * y * y + 2.0 * q.a24 * y, 0.0);
    }

    #[test]
    fn test_rect_cutout() {
        let c = Cutout::Rect { width: 50.0, length: 10.0 };
        assert!(c.contains(0.0, 0.0));
        assert!(c.contains(25.0, 5.0));
        // a hit at x = 40 lies outside a 50 mm wide region
        assert!(!c.contains(40.0, 0.0));
        assert!(!c.contains(0.0, 5.1));
    }

    #[test]
    fn test_elliptical_cutout() {
        let c = Cutout::Elliptical { diameter_x: 20.0, diameter_z: 10.0 };
        assert!(c.contains(0.0, 0.0));
        assert!(c.contains(10.0, 0.0));
        assert!(c.contains(0.0, 5.0));
        assert!(!c.contains(10.0, 5.0));
        assert!(!c.contains(10.1, 0.0));
    }

    #[test]
    fn test_trapezoid_cutout() {
        let c = Cutout::Trapezoid { width_a: 10.0, width_b: 20.0, length: 100.0 };
        // narrow end at z = -50, wide end at z = +50
        assert!(c.contains(4.9, -50.0));
        assert!(!c.contains(5.1, -50.0));
        assert!(c.contains(9.9, 50.0));
        assert!(!c.contains(10.1, 50.0));
        // midway the half-width is 7.5
        assert!(c.contains(7.4, 0.0));
        assert!(!c.contains(7.6, 0.0));
        assert!(!c.contains(0.0, 50.1));
    }

    #[test]
    fn test_unlimited_cutout() {
        assert!(Cutout::Unlimited.contains(1e9, -1e9));
    }

    #[test]
    fn test_element_transform_pair() {
        let m = plane_mirror(
            200.0,
            50.0,
            VACUUM,
            Vec3::new(0.0, 0.0, 10_000.0),
            Mat3::identity(),
        );
        // A world point at the element position maps to the local origin
        let local = m.in_trans.apply_point(&Point3::new(0.0, 0.0, 10_000.0));
        assert!((local - Point3::origin()).norm() < 1e-9);
        // and back
        let world = m.out_trans.apply_point(&Point3::origin());
        assert!((world - Point3::new(0.0, 0.0, 10_000.0)).norm() < 1e-9);
    }
}
