//! Material reflectivity: complex Snell/Fresnel coefficients and the
//! Stokes-vector update on reflection.
//!
//! The refractive index comes from the material tables as `n + ik`
//! with `k >= 0` (absorbing). Light arrives from vacuum; the amplitude
//! coefficients for s and p polarization feed the reflection Mueller
//! matrix applied to the ray's Stokes vector, so the total intensity
//! (S0) carries the reflectance.

use beamtrace_beamline::Ray;
use beamtrace_math::Vec4;
use num_complex::Complex;

/// Complex amplitude reflection coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FresnelCoeffs {
    /// s-polarized (perpendicular) amplitude coefficient.
    pub s: Complex<f64>,
    /// p-polarized (parallel) amplitude coefficient.
    pub p: Complex<f64>,
}

impl FresnelCoeffs {
    /// Intensity reflectance for s polarization.
    pub fn reflectance_s(&self) -> f64 {
        self.s.norm_sqr()
    }

    /// Intensity reflectance for p polarization.
    pub fn reflectance_p(&self) -> f64 {
        self.p.norm_sqr()
    }

    /// Reflectance for unpolarized light.
    pub fn reflectance_unpolarized(&self) -> f64 {
        0.5 * (self.reflectance_s() + self.reflectance_p())
    }
}

/// Fresnel amplitude coefficients for reflection off a medium with
/// complex index `index`, for light arriving from vacuum at incidence
/// cosine `cos_incidence` (angle measured from the surface normal).
pub fn fresnel_reflection(index: Complex<f64>, cos_incidence: f64) -> FresnelCoeffs {
    let n1 = Complex::new(1.0, 0.0);
    let n2 = index;
    let cos_i = Complex::new(cos_incidence, 0.0);

    // Complex Snell: n1 sin(i) = n2 sin(t)
    let sin_i = (1.0 - cos_incidence * cos_incidence).max(0.0).sqrt();
    let sin_t = n1 * sin_i / n2;
    let cos_t = (Complex::new(1.0, 0.0) - sin_t * sin_t).sqrt();

    let s = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let p = (n2 * cos_i - n1 * cos_t) / (n2 * cos_i + n1 * cos_t);
    FresnelCoeffs { s, p }
}

/// Apply the reflection Mueller matrix of `coeffs` to the ray's Stokes
/// vector.
pub fn apply_reflectivity(ray: &mut Ray, coeffs: &FresnelCoeffs) {
    let rs2 = coeffs.reflectance_s();
    let rp2 = coeffs.reflectance_p();
    let cross = coeffs.s * coeffs.p.conj();

    let s = ray.stokes;
    ray.stokes = Vec4::new(
        0.5 * ((rs2 + rp2) * s.x + (rs2 - rp2) * s.y),
        0.5 * ((rs2 - rp2) * s.x + (rs2 + rp2) * s.y),
        cross.re * s.z + cross.im * s.w,
        -cross.im * s.z + cross.re * s.w,
    );
}
