//! Error types for material-table construction and lookup.

use thiserror::Error;

/// Errors that can occur building or querying material tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// Atomic number outside the supported range 1..=92 (and not vacuum).
    #[error("material index {0} out of range (expected -1 or 1..=92)")]
    InvalidMaterial(i32),

    /// A sub-table handed to the builder was not sorted by energy.
    #[error("{table} table of material {material} is not sorted by energy")]
    UnsortedTable {
        /// Which sub-table was unsorted ("palik" or "nff").
        table: &'static str,
        /// Atomic number of the offending material.
        material: i32,
    },

    /// Neither the Palik nor the Nff table has an entry for this query.
    #[error("no optical-constant entry for material {material} at {energy} eV")]
    NoEntry {
        /// Atomic number queried.
        material: i32,
        /// Photon energy queried, in eV.
        energy: f64,
    },
}

/// Result type for material operations.
pub type Result<T> = std::result::Result<T, MaterialError>;
