#![warn(missing_docs)]

//! Math types for the beamtrace ray-tracing core.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! beamline optics: points, vectors, directions, the world/element
//! transform pair, physical constants and the counter-based RNG shared
//! by light sources and the tracing kernel.

use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};

pub mod rng;

/// A point in 3D space (mm).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 4-component vector (Stokes parameters, homogeneous coordinates).
pub type Vec4 = Vector4<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D space (surface-local coordinates).
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 3x3 matrix (orientations).
pub type Mat3 = Matrix3<f64>;

/// A 4x4 matrix.
pub type Mat4 = Matrix4<f64>;

/// Converts between photon energy in eV and wavelength in nm:
/// `λ[nm] = INV_NM_TO_EVOLT / E[eV]`.
pub const INV_NM_TO_EVOLT: f64 = 1239.84197386209;

/// Scaling constant of the f1/f2 refractive-index formula,
/// `n = 1 - NFF_SCALING * ρ * f1 / (E² * m)`, in the eV/mm unit system.
pub const NFF_SCALING: f64 = 415.252;

/// Minimum ray parameter accepted as a forward intersection.
///
/// Hits closer than this are treated as the ray's own starting surface.
pub const COLLISION_EPSILON: f64 = 1e-9;

/// Wavelength in nm for a photon energy in eV. Zero energy maps to zero.
#[inline]
pub fn energy_to_wavelength(energy: f64) -> f64 {
    if energy == 0.0 {
        0.0
    } else {
        INV_NM_TO_EVOLT / energy
    }
}

/// Direction vector for the divergence angles `phi` (horizontal) and
/// `psi` (vertical), both in radians.
///
/// The beam axis is +z; `phi` rotates in the xz plane, `psi` tilts
/// towards -y.
#[inline]
pub fn direction_from_angles(phi: f64, psi: f64) -> Vec3 {
    Vec3::new(psi.cos() * phi.sin(), -psi.sin(), psi.cos() * phi.cos())
}

/// Recover the `(phi, psi)` angles of a unit direction vector.
///
/// Inverse of [`direction_from_angles`] for directions with a forward
/// (+z) component.
#[inline]
pub fn angles_from_direction(direction: &Vec3) -> (f64, f64) {
    let phi = direction.x.atan2(direction.z);
    let psi = (-direction.y).asin();
    (phi, psi)
}

/// A 4x4 affine transformation matrix.
///
/// Optical elements carry two of these: world-to-element and
/// element-to-world. Both are rigid (rotation + translation).
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rigid transform from a rotation matrix and a translation vector.
    ///
    /// Applies the rotation first, then the translation.
    pub fn from_rotation_translation(rotation: &Matrix3<f64>, translation: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
        m[(0, 3)] = translation.x;
        m[(1, 3)] = translation.y;
        m[(2, 3)] = translation.z;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// `t2.then(&t1)` applies `t1` first, then `t2`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point (applies rotation and translation).
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Inverse of a rigid transform: `(R|t)⁻¹ = (Rᵀ|-Rᵀt)`.
    ///
    /// Only valid when the upper-left 3x3 block is orthonormal, which
    /// holds for every element transform in a beamline.
    pub fn rigid_inverse(&self) -> Self {
        let r = self.matrix.fixed_view::<3, 3>(0, 0).transpose();
        let t = Vec3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)]);
        Self::from_rotation_translation(&r, &(-(r * t)))
    }

    /// General inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
