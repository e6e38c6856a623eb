#![warn(missing_docs)]

//! beamtrace — batched optical ray tracing for synchrotron beamlines.
//!
//! Propagates bundles of rays through a sequence of optical elements
//! (mirrors, gratings, slits), recording an event history per ray.
//!
//! # Example
//!
//! ```rust
//! use beamtrace::{
//!     plane_mirror, Beamline, EnergyDistribution, MatrixSource, Polarization,
//!     SimpleTracer, Source, Tracer, Mat3, Vec3,
//! };
//!
//! let mut beamline = Beamline::new();
//! beamline.push_source(Source::Matrix(MatrixSource {
//!     num_rays: 16,
//!     source_width: 0.065,
//!     source_height: 0.04,
//!     source_depth: 0.0,
//!     hor_divergence: 0.001,
//!     ver_divergence: 0.001,
//!     energy: EnergyDistribution::Constant(100.0),
//!     polarization: Polarization::unpolarized(),
//! }));
//! // mirror face turned against the incoming beam
//! #[rustfmt::skip]
//! let orientation = Mat3::new(
//!     1.0, 0.0, 0.0,
//!     0.0, 0.0, 1.0,
//!     0.0, -1.0, 0.0,
//! );
//! beamline.push_element(plane_mirror(50.0, 200.0, -1, Vec3::new(0.0, 0.0, 10_000.0), orientation));
//!
//! let bundle = SimpleTracer::new().trace(&beamline, 1 << 16, 42).unwrap();
//! assert_eq!(bundle.len(), 16);
//! ```

pub use beamtrace_math::{
    angles_from_direction, direction_from_angles, energy_to_wavelength, rng::SquaresRng, Dir3,
    Mat3, Mat4, Point2, Point3, Transform, Vec2, Vec3, Vec4, COLLISION_EPSILON, INV_NM_TO_EVOLT,
    NFF_SCALING,
};

pub use beamtrace_material::{
    atomic_mass_and_density, MaterialCatalog, MaterialError, MaterialTables, NffEntry, PalikEntry,
    NUM_MATERIALS, VACUUM,
};

pub use beamtrace_beamline::{
    image_plane, plane_grating, plane_mirror, slit, sphere_grating, sphere_mirror, toroid_mirror,
    Beamline, Behaviour, Cutout, Element, EnergyDistribution, EventType, MatrixSource,
    PointSource, Polarization, QuadricParams, Ray, Source, SourceDist, Surface,
};

pub use beamtrace_kernel::{
    behave, find_collision, trace_ray, Collision, InvocationState, Outcome,
};

pub use beamtrace_tracer::{
    bundle_from_rays, extract_last_events, BundleHistory, RayHistory, Result, SimpleTracer,
    TraceRawConfig, Tracer, TracerError,
};
