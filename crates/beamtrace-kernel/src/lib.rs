#![warn(missing_docs)]

//! The per-ray execution kernel of the beamtrace engine.
//!
//! Everything in this crate runs once per ray per batch, with read-only
//! access to the element array and material tables and exclusive access
//! to the ray's own output window. There is no shared mutable state, so
//! the same code runs unchanged under a sequential loop or a
//! data-parallel dispatch.
//!
//! - [`record`] — the bounded, order-preserving event log per ray
//! - [`collision`] — ray-surface intersection and cutout testing
//! - [`behave`] — per-element physics (mirror, grating, slit, image
//!   plane)
//! - [`diffraction`] — aperture diffraction sampling
//! - [`fresnel`] — material reflectivity and polarization transport
//! - [`dynamic`] — the loop walking one ray through the element
//!   sequence

pub mod behave;
pub mod collision;
pub mod diffraction;
pub mod dynamic;
pub mod fresnel;
pub mod record;
pub mod solve;

pub use behave::{behave, Outcome};
pub use collision::{find_collision, Collision};
pub use dynamic::trace_ray;
pub use record::InvocationState;
