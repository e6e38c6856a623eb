//! Light sources generating the input ray bundle.
//!
//! Sources sample from the run's deterministic counter-based RNG, so
//! the emitted bundle depends only on the trace seed.

use beamtrace_math::rng::SquaresRng;
use beamtrace_math::{direction_from_angles, Vec3, Vec4};

use crate::ray::Ray;

/// Polarization of the emitted light as fractions of the Stokes
/// components relative to the total intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarization {
    /// Linear polarization along 0° (Stokes S1).
    pub linear0: f64,
    /// Linear polarization along 45° (Stokes S2).
    pub linear45: f64,
    /// Circular polarization (Stokes S3).
    pub circular: f64,
}

impl Polarization {
    /// Fully unpolarized light.
    pub fn unpolarized() -> Self {
        Self { linear0: 0.0, linear45: 0.0, circular: 0.0 }
    }

    fn stokes(&self) -> Vec4 {
        Vec4::new(1.0, self.linear0, self.linear45, self.circular)
    }
}

/// Photon-energy distribution of a source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyDistribution {
    /// Every ray carries exactly this energy (eV).
    Constant(f64),
    /// Uniform over `center ± spread/2` (eV).
    HardEdge {
        /// Center energy in eV.
        center: f64,
        /// Full spread in eV.
        spread: f64,
    },
    /// Gaussian around `center` (eV).
    SoftEdge {
        /// Center energy in eV.
        center: f64,
        /// Standard deviation in eV.
        sigma: f64,
    },
}

impl EnergyDistribution {
    /// Draw one photon energy.
    pub fn select(&self, rng: &mut SquaresRng) -> f64 {
        match *self {
            EnergyDistribution::Constant(e) => e,
            EnergyDistribution::HardEdge { center, spread } => {
                center + (rng.uniform() - 0.5) * spread
            }
            EnergyDistribution::SoftEdge { center, sigma } => rng.normal(center, sigma),
        }
    }
}

/// Profile of a sampled source coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDist {
    /// Uniform over the full extent.
    HardEdge,
    /// Gaussian with the extent as standard deviation.
    Gaussian,
}

impl SourceDist {
    fn sample(&self, extent: f64, rng: &mut SquaresRng) -> f64 {
        match self {
            SourceDist::HardEdge => (rng.uniform() - 0.5) * extent,
            SourceDist::Gaussian => rng.normal(0.0, extent),
        }
    }
}

/// Regular-grid source: `⌊√n⌋²` rays on a position grid over the source
/// area with a matching divergence grid, remainder rays re-emitted from
/// the grid start with freshly drawn energies.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSource {
    /// Number of rays to emit.
    pub num_rays: usize,
    /// Source extent along x, in mm.
    pub source_width: f64,
    /// Source extent along y, in mm.
    pub source_height: f64,
    /// Source extent along z, in mm (sampled uniformly).
    pub source_depth: f64,
    /// Full horizontal divergence in rad.
    pub hor_divergence: f64,
    /// Full vertical divergence in rad.
    pub ver_divergence: f64,
    /// Photon-energy distribution.
    pub energy: EnergyDistribution,
    /// Emitted polarization.
    pub polarization: Polarization,
}

impl MatrixSource {
    fn rays(&self, source_id: f64, rng: &mut SquaresRng) -> Vec<Ray> {
        let rmat = (self.num_rays as f64).sqrt().floor() as usize;
        let stokes = self.polarization.stokes();
        let mut rays = Vec::with_capacity(self.num_rays);

        let grid = |extent: f64, i: usize| {
            if rmat > 1 {
                -0.5 * extent + extent / (rmat - 1) as f64 * i as f64
            } else {
                0.0
            }
        };

        for col in 0..rmat {
            for row in 0..rmat {
                let x = grid(self.source_width, row);
                let y = grid(self.source_height, col);
                let z = (rng.uniform() - 0.5) * self.source_depth;
                let phi = grid(self.hor_divergence, row);
                let psi = grid(self.ver_divergence, col);
                let energy = self.energy.select(rng);
                rays.push(Ray::at_source(
                    Vec3::new(x, y, z),
                    direction_from_angles(phi, psi),
                    stokes,
                    energy,
                    source_id,
                ));
            }
        }

        // fill up to num_rays by re-emitting grid rays with new energies
        for i in 0..self.num_rays - rmat * rmat {
            let mut r = rays[i];
            r.energy = self.energy.select(rng);
            rays.push(r);
        }

        rays
    }
}

/// Random point source with configurable position and divergence
/// profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSource {
    /// Number of rays to emit.
    pub num_rays: usize,
    /// Source extent along x, in mm.
    pub source_width: f64,
    /// Source extent along y, in mm.
    pub source_height: f64,
    /// Source extent along z, in mm (always uniform).
    pub source_depth: f64,
    /// Horizontal divergence extent in rad.
    pub hor_divergence: f64,
    /// Vertical divergence extent in rad.
    pub ver_divergence: f64,
    /// Profile of the x position.
    pub width_dist: SourceDist,
    /// Profile of the y position.
    pub height_dist: SourceDist,
    /// Profile of the horizontal divergence.
    pub hor_dist: SourceDist,
    /// Profile of the vertical divergence.
    pub ver_dist: SourceDist,
    /// Photon-energy distribution.
    pub energy: EnergyDistribution,
    /// Emitted polarization.
    pub polarization: Polarization,
}

impl PointSource {
    fn rays(&self, source_id: f64, rng: &mut SquaresRng) -> Vec<Ray> {
        let stokes = self.polarization.stokes();
        let mut rays = Vec::with_capacity(self.num_rays);
        for _ in 0..self.num_rays {
            let x = self.width_dist.sample(self.source_width, rng);
            let y = self.height_dist.sample(self.source_height, rng);
            let z = (rng.uniform() - 0.5) * self.source_depth;
            let energy = self.energy.select(rng);
            let psi = self.ver_dist.sample(self.ver_divergence, rng);
            let phi = self.hor_dist.sample(self.hor_divergence, rng);
            rays.push(Ray::at_source(
                Vec3::new(x, y, z),
                direction_from_angles(phi, psi),
                stokes,
                energy,
                source_id,
            ));
        }
        rays
    }
}

/// A light source of the beamline.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Regular-grid source.
    Matrix(MatrixSource),
    /// Random point source.
    Point(PointSource),
}

impl Source {
    /// Emit this source's rays, tagging them with `source_id`.
    pub fn rays(&self, source_id: f64, rng: &mut SquaresRng) -> Vec<Ray> {
        match self {
            Source::Matrix(s) => s.rays(source_id, rng),
            Source::Point(s) => s.rays(source_id, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::EventType;

    fn matrix_source(num_rays: usize) -> MatrixSource {
        MatrixSource {
            num_rays,
            source_width: 0.065,
            source_height: 0.04,
            source_depth: 0.0,
            hor_divergence: 0.001,
            ver_divergence: 0.001,
            energy: EnergyDistribution::Constant(100.0),
            polarization: Polarization::unpolarized(),
        }
    }

    #[test]
    fn test_matrix_source_count_and_grid() {
        let src = matrix_source(20);
        let mut rng = SquaresRng::new(0);
        let rays = src.rays(0.0, &mut rng);
        // 4x4 grid plus 4 re-emitted rays
        assert_eq!(rays.len(), 20);
        assert_eq!(rays[16].position, rays[0].position);
        assert_eq!(rays[16].direction, rays[0].direction);

        // grid spans the full width symmetrically
        let xs: Vec<f64> = rays[..16].iter().map(|r| r.position.x).collect();
        let min = xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((min + 0.0325).abs() < 1e-12);
        assert!((max - 0.0325).abs() < 1e-12);
    }

    #[test]
    fn test_source_rays_initial_state() {
        let src = matrix_source(16);
        let mut rng = SquaresRng::new(0);
        for ray in src.rays(3.0, &mut rng) {
            assert_eq!(ray.event(), Some(EventType::Uninit));
            assert_eq!(ray.path_length, 0.0);
            assert_eq!(ray.last_element, -1.0);
            assert_eq!(ray.source_id, 3.0);
            assert_eq!(ray.energy, 100.0);
            assert!((ray.direction.norm() - 1.0).abs() < 1e-12);
            assert_eq!(ray.intensity(), 1.0);
        }
    }

    #[test]
    fn test_point_source_deterministic() {
        let src = PointSource {
            num_rays: 50,
            source_width: 0.1,
            source_height: 0.1,
            source_depth: 1.0,
            hor_divergence: 0.002,
            ver_divergence: 0.002,
            width_dist: SourceDist::Gaussian,
            height_dist: SourceDist::Gaussian,
            hor_dist: SourceDist::HardEdge,
            ver_dist: SourceDist::HardEdge,
            energy: EnergyDistribution::HardEdge { center: 640.0, spread: 10.0 },
            polarization: Polarization::unpolarized(),
        };
        let a = src.rays(0.0, &mut SquaresRng::new(7));
        let b = src.rays(0.0, &mut SquaresRng::new(7));
        assert_eq!(a, b);

        for ray in &a {
            assert!((ray.energy - 640.0).abs() <= 5.0);
            // hard-edge divergence keeps directions close to the axis
            assert!(ray.direction.z > 0.999);
            // depth sampling is uniform over ±0.5 mm
            assert!(ray.position.z.abs() <= 0.5);
        }
    }

    #[test]
    fn test_energy_distributions() {
        let mut rng = SquaresRng::new(11);
        assert_eq!(EnergyDistribution::Constant(42.0).select(&mut rng), 42.0);
        for _ in 0..100 {
            let e = EnergyDistribution::HardEdge { center: 100.0, spread: 4.0 }.select(&mut rng);
            assert!((98.0..=102.0).contains(&e));
        }
    }
}
