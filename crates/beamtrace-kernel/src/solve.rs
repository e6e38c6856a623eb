//! Closed-form polynomial root solvers for the surface intersectors.
//!
//! The quadric surfaces need the quadratic, the toroid needs the full
//! quartic (Ferrari's method via a resolvent cubic).

use std::f64::consts::PI;

/// Solve `a*x^2 + b*x + c = 0`, returning real roots in ascending order.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < 1e-12 {
        // Linear
        if b.abs() > 1e-12 {
            return vec![-c / b];
        }
        return Vec::new();
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }

    let sqrt_disc = disc.sqrt();
    let mut roots = vec![(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)];
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    roots
}

/// Solve `a*x^3 + b*x^2 + c*x + d = 0` (Cardano / Vieta), returning the
/// real roots.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a.abs() < 1e-12 {
        return solve_quadratic(b, c, d);
    }

    // Normalize: x^3 + px^2 + qx + r = 0
    let p = b / a;
    let q = c / a;
    let r = d / a;

    // Depressed cubic via x = t - p/3
    let p2 = p * p;
    let aa = q - p2 / 3.0;
    let bb = r - p * q / 3.0 + 2.0 * p2 * p / 27.0;

    let delta = bb * bb / 4.0 + aa * aa * aa / 27.0;

    let mut roots = Vec::new();
    let shift = p / 3.0;

    if delta > 1e-12 {
        // One real root
        let sqrt_delta = delta.sqrt();
        let u = cbrt(-bb / 2.0 + sqrt_delta);
        let v = cbrt(-bb / 2.0 - sqrt_delta);
        roots.push(u + v - shift);
    } else if delta.abs() <= 1e-12 {
        if aa.abs() < 1e-12 && bb.abs() < 1e-12 {
            // Triple root
            roots.push(-shift);
        } else {
            // Double root
            let u = cbrt(-bb / 2.0);
            roots.push(2.0 * u - shift);
            roots.push(-u - shift);
        }
    } else {
        // Three real roots (trigonometric form)
        let m = 2.0 * (-aa / 3.0).sqrt();
        let theta = (3.0 * bb / (aa * m)).acos() / 3.0;

        roots.push(m * theta.cos() - shift);
        roots.push(m * (theta - 2.0 * PI / 3.0).cos() - shift);
        roots.push(m * (theta + 2.0 * PI / 3.0).cos() - shift);
    }

    roots
}

/// Solve `a*x^4 + b*x^3 + c*x^2 + d*x + e = 0` with Ferrari's method,
/// returning deduplicated real roots in ascending order.
pub fn solve_quartic(a: f64, b: f64, c: f64, d: f64, e: f64) -> Vec<f64> {
    if a.abs() < 1e-12 {
        return solve_cubic(b, c, d, e);
    }

    // Normalize: x^4 + px^3 + qx^2 + rx + s = 0
    let p = b / a;
    let q = c / a;
    let r = d / a;
    let s = e / a;

    // Depressed quartic via x = y - p/4
    let p2 = p * p;
    let p3 = p2 * p;
    let p4 = p2 * p2;

    let a2 = q - 3.0 * p2 / 8.0;
    let a1 = r - p * q / 2.0 + p3 / 8.0;
    let a0 = s - p * r / 4.0 + p2 * q / 16.0 - 3.0 * p4 / 256.0;

    // Resolvent cubic: 8u^3 + 8*a2*u^2 + (2*a2^2 - 8*a0)*u - a1^2 = 0
    let cubic_roots = solve_cubic(8.0, 8.0 * a2, 2.0 * a2 * a2 - 8.0 * a0, -a1 * a1);

    let u = cubic_roots.into_iter().find(|&u| u > 1e-12).unwrap_or(0.0);

    let sqrt_2u = (2.0 * u).max(0.0).sqrt();

    let mut roots = Vec::new();

    if sqrt_2u.abs() > 1e-12 {
        // Split into two quadratics
        let alpha = a2 + 2.0 * u;
        let beta = a1 / sqrt_2u;

        let disc1 = sqrt_2u * sqrt_2u - 2.0 * (alpha + beta);
        if disc1 >= 0.0 {
            let sq = disc1.sqrt();
            roots.push((-sqrt_2u + sq) / 2.0 - p / 4.0);
            roots.push((-sqrt_2u - sq) / 2.0 - p / 4.0);
        }

        let disc2 = sqrt_2u * sqrt_2u - 2.0 * (alpha - beta);
        if disc2 >= 0.0 {
            let sq = disc2.sqrt();
            roots.push((sqrt_2u + sq) / 2.0 - p / 4.0);
            roots.push((sqrt_2u - sq) / 2.0 - p / 4.0);
        }
    } else {
        // u ≈ 0: biquadratic y^4 + a2*y^2 + a0 = 0
        let disc = a2 * a2 - 4.0 * a0;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            for y2 in [(-a2 + sq) / 2.0, (-a2 - sq) / 2.0] {
                if y2 >= 0.0 {
                    let y = y2.sqrt();
                    roots.push(y - p / 4.0);
                    roots.push(-y - p / 4.0);
                }
            }
        }
    }

    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|x, y| (*x - *y).abs() < 1e-10);
    roots
}

/// Cube root that handles negative arguments.
fn cbrt(x: f64) -> f64 {
    if x >= 0.0 {
        x.powf(1.0 / 3.0)
    } else {
        -(-x).powf(1.0 / 3.0)
    }
}
