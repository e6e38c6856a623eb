//! Atomic mass and bulk density for the 92 supported elements.
//!
//! Masses in g/mol, densities in g/cm³ (gas densities at standard
//! conditions for the gaseous elements). Needed by the f1/f2 based
//! refractive-index formula when the measured-constant table has no
//! coverage at the queried energy.

use crate::error::{MaterialError, Result};

/// `(atomic mass, density)` indexed by atomic number - 1.
const ATOMIC_MASS_AND_DENSITY: [(f64, f64); 92] = [
    (1.00794, 8.3748e-5),   // 1  H
    (4.002602, 1.663e-4),   // 2  He
    (6.941, 0.533),         // 3  Li
    (9.012182, 1.848),      // 4  Be
    (10.811, 2.34),         // 5  B
    (12.0107, 2.26),        // 6  C
    (14.0067, 1.165e-3),    // 7  N
    (15.9994, 1.332e-3),    // 8  O
    (18.9984032, 1.58e-3),  // 9  F
    (20.1797, 8.39e-4),     // 10 Ne
    (22.98977, 0.969),      // 11 Na
    (24.305, 1.74),         // 12 Mg
    (26.981538, 2.6989),    // 13 Al
    (28.0855, 2.33),        // 14 Si
    (30.973761, 2.69),      // 15 P
    (32.065, 2.07),         // 16 S
    (35.453, 2.98e-3),      // 17 Cl
    (39.948, 1.662e-3),     // 18 Ar
    (39.0983, 0.862),       // 19 K
    (40.078, 1.55),         // 20 Ca
    (44.95591, 2.989),      // 21 Sc
    (47.867, 4.54),         // 22 Ti
    (50.9415, 6.11),        // 23 V
    (51.9961, 7.19),        // 24 Cr
    (54.938049, 7.44),      // 25 Mn
    (55.845, 7.874),        // 26 Fe
    (58.9332, 8.9),         // 27 Co
    (58.6934, 8.902),       // 28 Ni
    (63.546, 8.96),         // 29 Cu
    (65.38, 7.133),         // 30 Zn
    (69.723, 5.904),        // 31 Ga
    (72.64, 5.323),         // 32 Ge
    (74.9216, 5.73),        // 33 As
    (78.96, 4.79),          // 34 Se
    (79.904, 3.12),         // 35 Br
    (83.798, 3.478e-3),     // 36 Kr
    (85.4678, 1.532),       // 37 Rb
    (87.62, 2.54),          // 38 Sr
    (88.90585, 4.469),      // 39 Y
    (91.224, 6.506),        // 40 Zr
    (92.90638, 8.57),       // 41 Nb
    (95.96, 10.22),         // 42 Mo
    (98.0, 11.5),           // 43 Tc
    (101.07, 12.41),        // 44 Ru
    (102.9055, 12.41),      // 45 Rh
    (106.42, 12.02),        // 46 Pd
    (107.8682, 10.5),       // 47 Ag
    (112.411, 8.65),        // 48 Cd
    (114.818, 7.31),        // 49 In
    (118.71, 7.31),         // 50 Sn
    (121.76, 6.691),        // 51 Sb
    (127.6, 6.24),          // 52 Te
    (126.90447, 4.93),      // 53 I
    (131.293, 5.485e-3),    // 54 Xe
    (132.90545, 1.873),     // 55 Cs
    (137.327, 3.5),         // 56 Ba
    (138.9055, 6.145),      // 57 La
    (140.116, 6.77),        // 58 Ce
    (140.90765, 6.773),     // 59 Pr
    (144.242, 7.008),       // 60 Nd
    (145.0, 7.264),         // 61 Pm
    (150.36, 7.52),         // 62 Sm
    (151.964, 5.244),       // 63 Eu
    (157.25, 7.901),        // 64 Gd
    (158.92534, 8.23),      // 65 Tb
    (162.5, 8.551),         // 66 Dy
    (164.93032, 8.795),     // 67 Ho
    (167.259, 9.066),       // 68 Er
    (168.93421, 9.321),     // 69 Tm
    (173.054, 6.966),       // 70 Yb
    (174.9668, 9.841),      // 71 Lu
    (178.49, 13.31),        // 72 Hf
    (180.9479, 16.654),     // 73 Ta
    (183.84, 19.3),         // 74 W
    (186.207, 21.02),       // 75 Re
    (190.23, 22.57),        // 76 Os
    (192.217, 22.42),       // 77 Ir
    (195.084, 21.45),       // 78 Pt
    (196.96655, 19.32),     // 79 Au
    (200.59, 13.546),       // 80 Hg
    (204.3833, 11.85),      // 81 Tl
    (207.2, 11.35),         // 82 Pb
    (208.98038, 9.747),     // 83 Bi
    (209.0, 9.32),          // 84 Po
    (210.0, 7.0),           // 85 At
    (222.0, 9.73e-3),       // 86 Rn
    (223.0, 1.87),          // 87 Fr
    (226.0, 5.0),           // 88 Ra
    (227.0, 10.07),         // 89 Ac
    (232.0381, 11.72),      // 90 Th
    (231.03588, 15.37),     // 91 Pa
    (238.02891, 18.95),     // 92 U
];

/// Atomic mass (g/mol) and density (g/cm³) for an atomic number in 1..=92.
pub fn atomic_mass_and_density(material: i32) -> Result<(f64, f64)> {
    if !(1..=92).contains(&material) {
        return Err(MaterialError::InvalidMaterial(material));
    }
    Ok(ATOMIC_MASS_AND_DENSITY[(material - 1) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_elements() {
        let (mass, rho) = atomic_mass_and_density(29).unwrap(); // copper
        assert!((mass - 63.546).abs() < 1e-9);
        assert!((rho - 8.96).abs() < 1e-9);

        let (mass, _) = atomic_mass_and_density(1).unwrap();
        assert!((mass - 1.00794).abs() < 1e-9);

        let (mass, _) = atomic_mass_and_density(92).unwrap();
        assert!((mass - 238.02891).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range() {
        assert!(atomic_mass_and_density(0).is_err());
        assert!(atomic_mass_and_density(93).is_err());
        assert!(atomic_mass_and_density(-1).is_err());
    }
}
