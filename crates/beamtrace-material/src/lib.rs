#![warn(missing_docs)]

//! Optical-constant tables for the beamtrace core.
//!
//! Refractive indices come from two tabulated data sources per material:
//! a measured n/k table (Palik) and a scattering-factor f1/f2 table
//! (Nff). Both are flattened into a single pair of arrays so the lookup
//! works identically on the host and inside the data-parallel kernel:
//!
//! - `index_table[m]` is the start (in doubles) of the Palik sub-table
//!   for the material with atomic number `m + 1`, `m` in `0..92`;
//! - `index_table[92 + m]` is the start of the Nff sub-table likewise;
//! - `index_table[184]` is the total length of the value table.
//!
//! Each entry occupies three consecutive doubles: `energy, n, k` for
//! Palik, `energy, f1, f2` for Nff. Within each sub-table entries are
//! sorted ascending by energy, which the binary searches below rely on.

use std::collections::BTreeMap;

use beamtrace_math::NFF_SCALING;
use num_complex::Complex;

mod atomic;
mod error;

pub use atomic::atomic_mass_and_density;
pub use error::{MaterialError, Result};

/// Number of supported periodic-table elements (hydrogen to uranium).
pub const NUM_MATERIALS: usize = 92;

/// Material index denoting vacuum (no attenuation).
pub const VACUUM: i32 = -1;

/// One entry of a measured optical-constant table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalikEntry {
    /// Photon energy in eV.
    pub energy: f64,
    /// Real part of the refractive index.
    pub n: f64,
    /// Imaginary part (extinction coefficient).
    pub k: f64,
}

/// One entry of an atomic scattering-factor table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NffEntry {
    /// Photon energy in eV.
    pub energy: f64,
    /// Real scattering factor f1.
    pub f1: f64,
    /// Imaginary scattering factor f2.
    pub f2: f64,
}

/// Per-material source data, filled by an external table loader.
///
/// The catalog holds whatever materials the loader provides; the tracer
/// flattens only the referenced subset into [`MaterialTables`].
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    palik: BTreeMap<i32, Vec<PalikEntry>>,
    nff: BTreeMap<i32, Vec<NffEntry>>,
}

impl MaterialCatalog {
    /// Empty catalog (sufficient for vacuum-only beamlines).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the measured n/k table for a material.
    ///
    /// Entries must be sorted ascending by energy.
    pub fn set_palik(&mut self, material: i32, entries: Vec<PalikEntry>) -> Result<()> {
        if !(1..=NUM_MATERIALS as i32).contains(&material) {
            return Err(MaterialError::InvalidMaterial(material));
        }
        if !entries.windows(2).all(|w| w[0].energy <= w[1].energy) {
            return Err(MaterialError::UnsortedTable { table: "palik", material });
        }
        self.palik.insert(material, entries);
        Ok(())
    }

    /// Register the f1/f2 table for a material.
    ///
    /// Entries must be sorted ascending by energy.
    pub fn set_nff(&mut self, material: i32, entries: Vec<NffEntry>) -> Result<()> {
        if !(1..=NUM_MATERIALS as i32).contains(&material) {
            return Err(MaterialError::InvalidMaterial(material));
        }
        if !entries.windows(2).all(|w| w[0].energy <= w[1].energy) {
            return Err(MaterialError::UnsortedTable { table: "nff", material });
        }
        self.nff.insert(material, entries);
        Ok(())
    }
}

/// Flattened per-run lookup tables, read-only during a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTables {
    index_table: Vec<u32>,
    value_table: Vec<f64>,
}

impl MaterialTables {
    /// Flatten the subset of `catalog` referenced by `materials`.
    ///
    /// Materials absent from the iterator get empty sub-tables; they are
    /// simply never looked up. Vacuum (`-1`) entries in the iterator are
    /// ignored; anything else outside 1..=92 is a configuration error.
    pub fn minimal(
        catalog: &MaterialCatalog,
        materials: impl IntoIterator<Item = i32>,
    ) -> Result<Self> {
        let mut wanted = [false; NUM_MATERIALS];
        for m in materials {
            if m == VACUUM {
                continue;
            }
            if !(1..=NUM_MATERIALS as i32).contains(&m) {
                return Err(MaterialError::InvalidMaterial(m));
            }
            wanted[(m - 1) as usize] = true;
        }

        let mut index_table = Vec::with_capacity(2 * NUM_MATERIALS + 1);
        let mut value_table = Vec::new();

        for m in 0..NUM_MATERIALS {
            index_table.push(value_table.len() as u32);
            if wanted[m] {
                if let Some(entries) = catalog.palik.get(&(m as i32 + 1)) {
                    for e in entries {
                        value_table.extend_from_slice(&[e.energy, e.n, e.k]);
                    }
                }
            }
        }
        for m in 0..NUM_MATERIALS {
            index_table.push(value_table.len() as u32);
            if wanted[m] {
                if let Some(entries) = catalog.nff.get(&(m as i32 + 1)) {
                    for e in entries {
                        value_table.extend_from_slice(&[e.energy, e.f1, e.f2]);
                    }
                }
            }
        }
        index_table.push(value_table.len() as u32);

        Ok(Self { index_table, value_table })
    }

    /// Number of Palik entries stored for a material in 1..=92.
    pub fn palik_entry_count(&self, material: i32) -> usize {
        let m = (material - 1) as usize;
        ((self.index_table[m + 1] - self.index_table[m]) / 3) as usize
    }

    /// Number of Nff entries stored for a material in 1..=92.
    pub fn nff_entry_count(&self, material: i32) -> usize {
        let m = (material - 1) as usize;
        ((self.index_table[NUM_MATERIALS + m + 1] - self.index_table[NUM_MATERIALS + m]) / 3)
            as usize
    }

    fn palik_entry(&self, index: usize, material: i32) -> PalikEntry {
        let m = (material - 1) as usize;
        let i = self.index_table[m] as usize + 3 * index;
        PalikEntry {
            energy: self.value_table[i],
            n: self.value_table[i + 1],
            k: self.value_table[i + 2],
        }
    }

    fn nff_entry(&self, index: usize, material: i32) -> NffEntry {
        let m = (material - 1) as usize;
        let i = self.index_table[NUM_MATERIALS + m] as usize + 3 * index;
        NffEntry {
            energy: self.value_table[i],
            f1: self.value_table[i + 1],
            f2: self.value_table[i + 2],
        }
    }

    /// Complex refractive index `n + ik` of `material` at `energy` eV
    /// (`k >= 0` meaning absorption).
    ///
    /// Vacuum short-circuits to `1 + 0i`. Otherwise the Palik table is
    /// consulted first: if the energy lies within its range, the entry
    /// just below the query is returned as-is (nearest-below, no
    /// interpolation). Outside the Palik range the Nff table supplies
    /// f1/f2 and the index is computed analytically from the entry's
    /// tabulated energy, atomic mass and density.
    pub fn refractive_index(&self, energy: f64, material: i32) -> Result<Complex<f64>> {
        if material == VACUUM {
            return Ok(Complex::new(1.0, 0.0));
        }
        if !(1..=NUM_MATERIALS as i32).contains(&material) {
            return Err(MaterialError::InvalidMaterial(material));
        }

        let palik_count = self.palik_entry_count(material);
        if palik_count > 0 {
            let mut low = 0;
            let mut high = palik_count - 1;
            let low_entry = self.palik_entry(low, material);
            let high_entry = self.palik_entry(high, material);
            if low_entry.energy <= energy && energy <= high_entry.energy {
                while high - low > 1 {
                    let center = (low + high) / 2;
                    if energy < self.palik_entry(center, material).energy {
                        high = center;
                    } else {
                        low = center;
                    }
                }
                let entry = self.palik_entry(low, material);
                return Ok(Complex::new(entry.n, entry.k));
            }
        }

        let nff_count = self.nff_entry_count(material);
        if nff_count > 0 {
            let mut low = 0;
            let mut high = nff_count - 1;
            while high - low > 1 {
                let center = (low + high) / 2;
                if energy < self.nff_entry(center, material).energy {
                    high = center;
                } else {
                    low = center;
                }
            }

            let (mass, rho) = atomic_mass_and_density(material)?;
            let entry = self.nff_entry(low, material);
            let e = entry.energy;
            let n = 1.0 - (NFF_SCALING * rho * entry.f1) / (e * e * mass);
            let k = (NFF_SCALING * rho * entry.f2) / (e * e * mass);
            return Ok(Complex::new(n, k));
        }

        Err(MaterialError::NoEntry { material, energy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn copper_catalog() -> MaterialCatalog {
        let mut catalog = MaterialCatalog::new();
        catalog
            .set_palik(
                29,
                vec![
                    PalikEntry { energy: 30.0, n: 0.92, k: 0.35 },
                    PalikEntry { energy: 100.0, n: 0.97, k: 0.11 },
                    PalikEntry { energy: 500.0, n: 0.995, k: 0.02 },
                    PalikEntry { energy: 1000.0, n: 0.999, k: 0.005 },
                ],
            )
            .unwrap();
        catalog
            .set_nff(
                29,
                vec![
                    NffEntry { energy: 1000.0, f1: 27.1, f2: 4.5 },
                    NffEntry { energy: 10000.0, f1: 29.0, f2: 1.2 },
                    NffEntry { energy: 50000.0, f1: 29.3, f2: 0.2 },
                ],
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_vacuum_lookup() {
        let tables = MaterialTables::minimal(&MaterialCatalog::new(), []).unwrap();
        for energy in [0.1, 1.0, 100.0, 1e6] {
            assert_eq!(tables.refractive_index(energy, VACUUM).unwrap(), Complex::new(1.0, 0.0));
        }
    }

    #[test]
    fn test_invalid_material() {
        let tables = MaterialTables::minimal(&MaterialCatalog::new(), []).unwrap();
        assert!(matches!(
            tables.refractive_index(100.0, 0),
            Err(MaterialError::InvalidMaterial(0))
        ));
        assert!(matches!(
            tables.refractive_index(100.0, 93),
            Err(MaterialError::InvalidMaterial(93))
        ));
        assert!(matches!(
            MaterialTables::minimal(&MaterialCatalog::new(), [95]),
            Err(MaterialError::InvalidMaterial(95))
        ));
    }

    #[test]
    fn test_unsorted_rejected() {
        let mut catalog = MaterialCatalog::new();
        let err = catalog.set_palik(
            29,
            vec![
                PalikEntry { energy: 100.0, n: 0.97, k: 0.11 },
                PalikEntry { energy: 30.0, n: 0.92, k: 0.35 },
            ],
        );
        assert!(matches!(err, Err(MaterialError::UnsortedTable { table: "palik", .. })));
    }

    #[test]
    fn test_palik_exact_energy() {
        let tables = MaterialTables::minimal(&copper_catalog(), [29]).unwrap();
        let nk = tables.refractive_index(100.0, 29).unwrap();
        assert_eq!(nk, Complex::new(0.97, 0.11));
    }

    #[test]
    fn test_palik_nearest_below() {
        let tables = MaterialTables::minimal(&copper_catalog(), [29]).unwrap();
        // 400 eV brackets between the 100 eV and 500 eV entries; the
        // lower one is returned without interpolation.
        let nk = tables.refractive_index(400.0, 29).unwrap();
        assert_eq!(nk, Complex::new(0.97, 0.11));
    }

    #[test]
    fn test_nff_fallback_above_palik_range() {
        let tables = MaterialTables::minimal(&copper_catalog(), [29]).unwrap();
        // 20 keV is outside the Palik range [30, 1000]; the bracketing
        // Nff entry is the 10 keV one.
        let nk = tables.refractive_index(20_000.0, 29).unwrap();
        let (mass, rho) = atomic_mass_and_density(29).unwrap();
        let e = 10_000.0;
        let expected_n = 1.0 - (NFF_SCALING * rho * 29.0) / (e * e * mass);
        let expected_k = (NFF_SCALING * rho * 1.2) / (e * e * mass);
        assert_relative_eq!(nk.re, expected_n, epsilon = 1e-15);
        assert_relative_eq!(nk.im, expected_k, epsilon = 1e-15);
        assert!(nk.re < 1.0);
        assert!(nk.im > 0.0);
    }

    #[test]
    fn test_no_entry_error() {
        let tables = MaterialTables::minimal(&MaterialCatalog::new(), [29]).unwrap();
        assert!(matches!(
            tables.refractive_index(100.0, 29),
            Err(MaterialError::NoEntry { material: 29, .. })
        ));
    }

    #[test]
    fn test_minimal_excludes_unreferenced() {
        let catalog = copper_catalog();
        let tables = MaterialTables::minimal(&catalog, []).unwrap();
        assert_eq!(tables.palik_entry_count(29), 0);
        assert_eq!(tables.value_table.len(), 0);

        let tables = MaterialTables::minimal(&catalog, [29, VACUUM]).unwrap();
        assert_eq!(tables.palik_entry_count(29), 4);
        assert_eq!(tables.nff_entry_count(29), 3);
        assert_eq!(tables.index_table.len(), 2 * NUM_MATERIALS + 1);
    }

    #[test]
    fn test_sub_table_energies_sorted() {
        let tables = MaterialTables::minimal(&copper_catalog(), [29]).unwrap();
        for i in 1..tables.palik_entry_count(29) {
            assert!(tables.palik_entry(i - 1, 29).energy <= tables.palik_entry(i, 29).energy);
        }
        for i in 1..tables.nff_entry_count(29) {
            assert!(tables.nff_entry(i - 1, 29).energy <= tables.nff_entry(i, 29).energy);
        }
    }
}
