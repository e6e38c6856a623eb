//! The beamline: ordered elements plus light sources.

use beamtrace_material::{MaterialCatalog, MaterialTables, Result as MaterialResult};
use beamtrace_math::rng::SquaresRng;

use crate::element::Element;
use crate::ray::Ray;
use crate::source::Source;

/// An ordered sequence of optical elements and the light sources
/// feeding them.
///
/// Element order *is* the physical beam path order: rays pass through
/// the elements exactly in array order, with no branching and no
/// dynamic scheduling.
#[derive(Debug, Clone, Default)]
pub struct Beamline {
    /// Optical elements in beam-path order.
    pub elements: Vec<Element>,
    /// Light sources, in emission order.
    pub sources: Vec<Source>,
    /// Optical-constant data for the materials used by the elements,
    /// supplied by an external table loader.
    pub materials: MaterialCatalog,
}

impl Beamline {
    /// Empty beamline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element at the end of the beam path.
    pub fn push_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Append a light source.
    pub fn push_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    /// Generate the full input ray bundle, deterministically from
    /// `seed`. Rays are ordered source by source; `source_id` is the
    /// source's index.
    pub fn input_rays(&self, seed: u64) -> Vec<Ray> {
        let mut rng = SquaresRng::new(seed);
        let mut rays = Vec::new();
        for (id, source) in self.sources.iter().enumerate() {
            rays.extend(source.rays(id as f64, &mut rng));
        }
        rays
    }

    /// Material indices referenced by the elements (may repeat, may
    /// include vacuum).
    pub fn referenced_materials(&self) -> impl Iterator<Item = i32> + '_ {
        self.elements.iter().map(|e| e.material)
    }

    /// Flatten the lookup tables for exactly the materials this
    /// beamline references.
    pub fn minimal_material_tables(&self) -> MaterialResult<MaterialTables> {
        MaterialTables::minimal(&self.materials, self.referenced_materials())
    }
}
