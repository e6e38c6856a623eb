//! Aperture diffraction sampling for slits.
//!
//! Slits broaden the transmitted beam: rectangular openings follow the
//! Fraunhofer `sinc²` intensity, circular openings the Airy pattern
//! `(2·J₁(x)/x)²`. Both are sampled by rejection from the ray's own
//! RNG stream, so the perturbation is deterministic per ray.

use beamtrace_math::rng::SquaresRng;
use std::f64::consts::PI;

/// Factorial of `n` as a double.
pub fn fact(n: i32) -> f64 {
    let mut f = 1.0;
    for i in 2..=n {
        f *= i as f64;
    }
    f
}

/// Bessel function of the first kind J₁, by power series.
///
/// Valid for arguments in `[0, 20]`; outside that range the series is
/// not trustworthy and 0 is returned (the intensity tail is negligible
/// there anyway).
pub fn bessel1(v: f64) -> f64 {
    if !(0.0..=20.0).contains(&v) {
        return 0.0;
    }
    let mut sum = 0.0;
    let half = v / 2.0;
    for k in 0..=20 {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        sum += sign * half.powi(2 * k + 1) / (fact(k) * fact(k + 1));
    }
    sum
}

/// Sample the two diffraction angles behind a circular opening.
///
/// `radius` in mm, `wavelength` in nm; returns `(dphi, dpsi)` in rad.
pub fn bessel_diff(radius: f64, wavelength: f64, rng: &mut SquaresRng) -> (f64, f64) {
    if wavelength <= 0.0 || radius == 0.0 {
        return (0.0, 0.0);
    }
    let b = radius.abs() * 1e6; // mm -> nm
    let ximax = 5.0 * wavelength / b;

    loop {
        let dphi = (rng.uniform() - 0.5) * ximax;
        let dpsi = (rng.uniform() - 0.5) * ximax;
        let angle = (dphi * dphi + dpsi * dpsi).sqrt();
        let x = PI * b * angle.sin() / wavelength;
        let intensity = if x.abs() < 1e-9 {
            1.0
        } else {
            let a = 2.0 * bessel1(x) / x;
            a * a
        };
        if rng.uniform() <= intensity {
            return (dphi, dpsi);
        }
    }
}

/// Sample the diffraction angle behind one axis of a rectangular
/// opening.
///
/// `dim` is the opening extent in mm along that axis, `wavelength` in
/// nm; returns the angle perturbation in rad.
pub fn fraun_diff(dim: f64, wavelength: f64, rng: &mut SquaresRng) -> f64 {
    if wavelength <= 0.0 || dim <= 0.0 {
        return 0.0;
    }
    let b = dim * 1e6; // mm -> nm
    let ximax = 5.0 * wavelength / b;

    loop {
        let dangle = (rng.uniform() - 0.5) * ximax;
        let x = PI * b * dangle.sin() / wavelength;
        let intensity = if x.abs() < 1e-9 {
            1.0
        } else {
            let s = x.sin() / x;
            s * s
        };
        if rng.uniform() <= intensity {
            return dangle;
        }
    }
}
