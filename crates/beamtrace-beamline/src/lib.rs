#![warn(missing_docs)]

//! Data model of a beamline: the fixed-layout [`Ray`] record, optical
//! [`Element`] parameter blocks with tagged surface/cutout/behaviour
//! variants, light sources, and the [`Beamline`] that ties them
//! together in physical beam-path order.

mod beamline;
mod element;
mod ray;
mod source;

pub use beamline::Beamline;
pub use element::{
    image_plane, plane_grating, plane_mirror, slit, sphere_grating, sphere_mirror, toroid_mirror,
    Behaviour, Cutout, Element, QuadricParams, Surface,
};
pub use ray::{EventType, Ray};
pub use source::{EnergyDistribution, MatrixSource, PointSource, Polarization, Source, SourceDist};
