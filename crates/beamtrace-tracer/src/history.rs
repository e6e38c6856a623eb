//! Assembled trace output: per-ray event histories.

use beamtrace_beamline::Ray;

/// The ordered events of one ray, in traversal order.
pub type RayHistory = Vec<Ray>;

/// One history per input ray, in input-ray order.
pub type BundleHistory = Vec<RayHistory>;

/// The last (usually terminal) event of each ray in the bundle.
pub fn extract_last_events(bundle: &BundleHistory) -> Vec<Ray> {
    bundle.iter().filter_map(|hist| hist.last().copied()).collect()
}

/// Wrap plain rays as single-event histories, for consumers that only
/// have a flat ray list.
pub fn bundle_from_rays(rays: &[Ray]) -> BundleHistory {
    rays.iter().map(|r| vec![*r]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamtrace_beamline::EventType;

    #[test]
    fn test_extract_last_events() {
        let mut a = Ray::uninit();
        a.event_type = EventType::JustHitElem.code();
        let mut b = Ray::uninit();
        b.event_type = EventType::FlyOff.code();
        let bundle: BundleHistory = vec![vec![a, b], vec![b]];
        let last = extract_last_events(&bundle);
        assert_eq!(last.len(), 2);
        assert!(last.iter().all(|r| r.event() == Some(EventType::FlyOff)));
    }

    #[test]
    fn test_bundle_from_rays() {
        let rays = vec![Ray::uninit(); 3];
        let bundle = bundle_from_rays(&rays);
        assert_eq!(bundle.len(), 3);
        assert!(bundle.iter().all(|h| h.len() == 1));
    }
}
