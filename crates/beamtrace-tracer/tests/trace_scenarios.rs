//! End-to-end scenarios: small beamlines with known outcomes.

use beamtrace_beamline::{
    plane_mirror, slit, Beamline, Cutout, EnergyDistribution, EventType, MatrixSource,
    Polarization, Ray, Source,
};
use beamtrace_material::{MaterialCatalog, MaterialTables, PalikEntry, VACUUM};
use beamtrace_math::{Mat3, Vec3, Vec4};
use beamtrace_tracer::{SimpleTracer, TraceRawConfig, Tracer, TracerError};

/// Orientation turning the element face against a beam travelling +z.
#[rustfmt::skip]
fn facing_beam() -> Mat3 {
    Mat3::new(
        1.0, 0.0, 0.0,
        0.0, 0.0, 1.0,
        0.0, -1.0, 0.0,
    )
}

/// Orientation of a 45° mirror deflecting a +z beam to +y.
fn deflect_up() -> Mat3 {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    #[rustfmt::skip]
    let m = Mat3::new(
        1.0, 0.0, 0.0,
        0.0, s, s,
        0.0, -s, s,
    );
    m
}

fn single_ray_source() -> Source {
    Source::Matrix(MatrixSource {
        num_rays: 1,
        source_width: 0.0,
        source_height: 0.0,
        source_depth: 0.0,
        hor_divergence: 0.0,
        ver_divergence: 0.0,
        energy: EnergyDistribution::Constant(100.0),
        polarization: Polarization::unpolarized(),
    })
}

#[test]
fn plane_mirror_hit_gives_exactly_two_events() {
    let mut beamline = Beamline::new();
    beamline.push_source(single_ray_source());
    beamline.push_element(plane_mirror(
        200.0,
        50.0,
        VACUUM,
        Vec3::new(0.0, 0.0, 10_000.0),
        deflect_up(),
    ));

    let bundle = SimpleTracer::new().trace(&beamline, 1024, 42).unwrap();
    assert_eq!(bundle.len(), 1);
    let hist = &bundle[0];
    assert_eq!(hist.len(), 2);

    // hit at the mirror, in element coordinates at the center
    assert_eq!(hist[0].event(), Some(EventType::JustHitElem));
    assert!(hist[0].position.norm() < 1e-6);
    assert_eq!(hist[0].last_element, 0.0);
    // direction reflected about the local surface normal
    let s = std::f64::consts::FRAC_1_SQRT_2;
    assert!((hist[0].direction - Vec3::new(0.0, s, s)).norm() < 1e-9);

    // terminal event from running off the end of the beamline, with the
    // intensity preserved and the world direction deflected upwards
    assert_eq!(hist[1].event(), Some(EventType::FlyOff));
    assert_eq!(hist[1].intensity(), 1.0);
    assert!((hist[1].direction - Vec3::new(0.0, 1.0, 0.0)).norm() < 1e-9);
    assert!(hist[1].path_length >= hist[0].path_length);
}

#[test]
fn hit_outside_cutout_is_a_pass_not_an_absorption() {
    // local intersection at (40, 0, 0), outside a 50 mm wide cutout
    let elements = vec![plane_mirror(50.0, 10.0, VACUUM, Vec3::zeros(), Mat3::identity())];
    let tables = MaterialTables::minimal(&MaterialCatalog::new(), []).unwrap();
    let rays = vec![Ray::at_source(
        Vec3::new(40.0, 10.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        100.0,
        0.0,
    )];
    let cfg = TraceRawConfig {
        rays: &rays,
        ray_id_start: 0,
        num_rays: 1,
        seed: 1,
        max_events: 3,
        material_tables: &tables,
        elements: &elements,
    };

    let raw = SimpleTracer::new().trace_raw(&cfg).unwrap();
    // the element never registers a hit: no Absorbed, no reflectivity,
    // just the terminal fly-off with full intensity
    assert_eq!(raw[0].event(), Some(EventType::FlyOff));
    assert_eq!(raw[0].intensity(), 1.0);
    assert!((raw[0].direction - Vec3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
    assert_eq!(raw[1].event(), Some(EventType::Uninit));
}

#[test]
fn slit_splits_bundle_into_absorbed_and_passed() {
    let mut beamline = Beamline::new();
    beamline.push_source(Source::Matrix(MatrixSource {
        num_rays: 64,
        source_width: 40.0, // wide flat source, half the rays miss the opening
        source_height: 40.0,
        source_depth: 0.0,
        hor_divergence: 0.0,
        ver_divergence: 0.0,
        energy: EnergyDistribution::Constant(100.0),
        polarization: Polarization::unpolarized(),
    }));
    beamline.push_element(slit(
        Cutout::Rect { width: 20.0, length: 20.0 },
        None,
        Vec3::new(0.0, 0.0, 1000.0),
        facing_beam(),
    ));

    let bundle = SimpleTracer::new().trace(&beamline, 1024, 7).unwrap();
    assert_eq!(bundle.len(), 64);

    let absorbed = bundle
        .iter()
        .filter(|h| h.last().unwrap().event() == Some(EventType::Absorbed))
        .count();
    let flew_off = bundle
        .iter()
        .filter(|h| h.last().unwrap().event() == Some(EventType::FlyOff))
        .count();
    assert_eq!(absorbed + flew_off, 64);
    assert!(absorbed > 0, "wide source must clip on the slit");
    assert!(flew_off > 0, "central rays must pass the opening");

    for hist in &bundle {
        match hist.last().unwrap().event() {
            // absorbed rays end at the slit: one terminal event
            Some(EventType::Absorbed) => assert_eq!(hist.len(), 1),
            // passed rays record the slit hit and the final fly-off
            Some(EventType::FlyOff) => assert_eq!(hist.len(), 2),
            other => panic!("unexpected terminal event {other:?}"),
        }
    }
}

#[test]
fn gold_mirror_attenuates_but_preserves_geometry() {
    let mut catalog = MaterialCatalog::new();
    catalog
        .set_palik(
            79,
            vec![
                PalikEntry { energy: 10.0, n: 0.9, k: 0.2 },
                PalikEntry { energy: 1000.0, n: 0.99, k: 0.01 },
            ],
        )
        .unwrap();

    let mut beamline = Beamline::new();
    beamline.materials = catalog;
    beamline.push_source(single_ray_source());
    beamline.push_element(plane_mirror(
        200.0,
        50.0,
        79,
        Vec3::new(0.0, 0.0, 10_000.0),
        deflect_up(),
    ));

    let bundle = SimpleTracer::new().trace(&beamline, 1024, 42).unwrap();
    let hist = &bundle[0];
    assert_eq!(hist.len(), 2);
    let last = hist.last().unwrap();
    assert_eq!(last.event(), Some(EventType::FlyOff));
    assert!(last.intensity() > 0.0 && last.intensity() < 1.0);
    assert!((last.direction - Vec3::new(0.0, 1.0, 0.0)).norm() < 1e-9);
}

#[test]
fn missing_material_data_is_a_per_ray_fatal_event() {
    // material index is valid but the catalog has no data for it: the
    // trace itself succeeds, the affected ray carries a FatalError
    let mut beamline = Beamline::new();
    beamline.push_source(single_ray_source());
    beamline.push_element(plane_mirror(
        200.0,
        50.0,
        79,
        Vec3::new(0.0, 0.0, 10_000.0),
        deflect_up(),
    ));

    let bundle = SimpleTracer::new().trace(&beamline, 1024, 42).unwrap();
    let hist = &bundle[0];
    assert_eq!(hist.last().unwrap().event(), Some(EventType::FatalError));
}

#[test]
fn invalid_material_index_aborts_the_trace() {
    let mut beamline = Beamline::new();
    beamline.push_source(single_ray_source());
    beamline.push_element(plane_mirror(
        200.0,
        50.0,
        93, // beyond uranium
        Vec3::new(0.0, 0.0, 10_000.0),
        deflect_up(),
    ));

    match SimpleTracer::new().trace(&beamline, 1024, 42) {
        Err(TracerError::Material(_)) => {}
        other => panic!("expected a material configuration error, got {other:?}"),
    }
}
