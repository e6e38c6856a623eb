//! The fixed-layout ray/event record and its event-type codes.

use beamtrace_math::{Transform, Vec3, Vec4};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// What happened to a ray at a recorded event.
///
/// Stored inside [`Ray::event_type`] as a small sentinel double so the
/// record stays a flat block of 16 doubles across host, device and file
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// The ray left the beamline without hitting anything further.
    /// Recorded in world coordinates.
    FlyOff,
    /// The ray hit an optical element; the record holds the outgoing
    /// state in element-local coordinates.
    JustHitElem,
    /// The ray was absorbed (slit material, beamstop). Element-local
    /// coordinates.
    Absorbed,
    /// Marker for unused output slots. Never part of a returned
    /// history; recording it is a programming error.
    Uninit,
    /// A diffraction order left the unit sphere (evanescent); the ray
    /// cannot propagate.
    BeyondHorizon,
    /// A per-ray fatal error (e.g. failed material lookup).
    FatalError,
    /// The ray produced more events than its output window holds; the
    /// history is truncated at this marker.
    TooManyEvents,
}

impl EventType {
    /// Sentinel double stored in the ray record.
    pub fn code(self) -> f64 {
        match self {
            EventType::FlyOff => 0.0,
            EventType::JustHitElem => 1.0,
            EventType::Absorbed => 2.0,
            EventType::Uninit => 3.0,
            EventType::BeyondHorizon => 4.0,
            EventType::FatalError => 5.0,
            EventType::TooManyEvents => 6.0,
        }
    }

    /// Decode a sentinel double, if it is a known code.
    pub fn from_code(code: f64) -> Option<Self> {
        match code {
            c if c == 0.0 => Some(EventType::FlyOff),
            c if c == 1.0 => Some(EventType::JustHitElem),
            c if c == 2.0 => Some(EventType::Absorbed),
            c if c == 3.0 => Some(EventType::Uninit),
            c if c == 4.0 => Some(EventType::BeyondHorizon),
            c if c == 5.0 => Some(EventType::FatalError),
            c if c == 6.0 => Some(EventType::TooManyEvents),
            _ => None,
        }
    }
}

/// A ray snapshot: position, direction, energy, polarization and event
/// metadata, as 16 consecutive doubles.
///
/// The layout is load-bearing: it crosses the host/kernel boundary as a
/// plain buffer and is what exporters write bit-for-bit, so the struct
/// is `repr(C)` and [`Pod`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Ray {
    /// Position in mm (world or element coordinates, per event type).
    pub position: Vec3,
    /// Event-type sentinel, see [`EventType`].
    pub event_type: f64,
    /// Unit direction of propagation.
    pub direction: Vec3,
    /// Photon energy in eV.
    pub energy: f64,
    /// Stokes polarization vector (S0, S1, S2, S3).
    pub stokes: Vec4,
    /// Accumulated path length in mm.
    pub path_length: f64,
    /// Index of the last element hit, -1 before any interaction.
    pub last_element: f64,
    /// Diffraction order picked up at a grating, 0 otherwise.
    pub order: f64,
    /// Index of the emitting light source.
    pub source_id: f64,
}

impl Ray {
    /// Fresh source ray: event type [`EventType::Uninit`], zero path
    /// length, no element hit yet.
    pub fn at_source(
        position: Vec3,
        direction: Vec3,
        stokes: Vec4,
        energy: f64,
        source_id: f64,
    ) -> Self {
        Self {
            position,
            event_type: EventType::Uninit.code(),
            direction,
            energy,
            stokes,
            path_length: 0.0,
            last_element: -1.0,
            order: 0.0,
            source_id,
        }
    }

    /// A blank record marking an unused output slot.
    pub fn uninit() -> Self {
        Self {
            position: Vec3::zeros(),
            event_type: EventType::Uninit.code(),
            direction: Vec3::zeros(),
            energy: 0.0,
            stokes: Vec4::zeros(),
            path_length: 0.0,
            last_element: -1.0,
            order: 0.0,
            source_id: 0.0,
        }
    }

    /// Decoded event type of this record.
    pub fn event(&self) -> Option<EventType> {
        EventType::from_code(self.event_type)
    }

    /// The total intensity carried by the ray (Stokes S0).
    pub fn intensity(&self) -> f64 {
        self.stokes.x
    }

    /// This ray with position and direction mapped through `t`.
    pub fn transformed(&self, t: &Transform) -> Self {
        let mut out = *self;
        let p = t.apply_point(&self.position.into());
        out.position = Vec3::new(p.x, p.y, p.z);
        out.direction = t.apply_vec(&self.direction);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamtrace_math::Transform;

    #[test]
    fn test_record_is_16_doubles() {
        assert_eq!(std::mem::size_of::<Ray>(), 16 * 8);
        assert_eq!(std::mem::align_of::<Ray>(), 8);
    }

    #[test]
    fn test_pod_roundtrip_preserves_bits() {
        let ray = Ray::at_source(
            Vec3::new(1.5, -2.25, 3.125),
            Vec3::new(0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.25, 0.0, -0.5),
            99.75,
            2.0,
        );
        let bytes = bytemuck::bytes_of(&ray);
        assert_eq!(bytes.len(), 128);
        let back: Ray = *bytemuck::from_bytes(bytes);
        assert_eq!(back, ray);

        // Field order within the block matches the record definition
        let doubles: &[f64] = bytemuck::cast_slice(bytes);
        assert_eq!(doubles[0], 1.5);
        assert_eq!(doubles[3], EventType::Uninit.code());
        assert_eq!(doubles[7], 99.75);
        assert_eq!(doubles[12], 0.0); // path length
        assert_eq!(doubles[13], -1.0); // last element
    }

    #[test]
    fn test_event_code_roundtrip() {
        for e in [
            EventType::FlyOff,
            EventType::JustHitElem,
            EventType::Absorbed,
            EventType::Uninit,
            EventType::BeyondHorizon,
            EventType::FatalError,
            EventType::TooManyEvents,
        ] {
            assert_eq!(EventType::from_code(e.code()), Some(e));
        }
        assert_eq!(EventType::from_code(17.5), None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ray = Ray::at_source(
            Vec3::new(0.1, 0.2, 0.3),
            Vec3::new(0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.5, 0.0, 0.0),
            640.0,
            1.0,
        );
        let json = serde_json::to_string(&ray).unwrap();
        let back: Ray = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ray);
    }

    #[test]
    fn test_transformed() {
        let ray = Ray::at_source(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            100.0,
            0.0,
        );
        let t = Transform::translation(0.0, 5.0, 0.0);
        let moved = ray.transformed(&t);
        assert_eq!(moved.position.y, 5.0);
        // direction is unaffected by translation
        assert_eq!(moved.direction, ray.direction);
        // non-geometric fields ride along unchanged
        assert_eq!(moved.energy, ray.energy);
        assert_eq!(moved.event_type, ray.event_type);
    }
}
