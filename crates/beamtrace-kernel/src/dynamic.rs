//! The per-ray trace over the element sequence.
//!
//! One invocation walks a single ray through every element in beam-path
//! order, recording events into the ray's output window until a
//! terminal event finalizes the log or the beamline ends.

use beamtrace_beamline::{Element, EventType, Ray};
use beamtrace_material::MaterialTables;

use crate::behave::{behave, Outcome};
use crate::collision::find_collision;
use crate::record::InvocationState;

/// Trace one ray through `elements`, recording its events into `inv`.
///
/// Hit events are recorded in element-local coordinates; the final
/// fly-off (if the ray survives every element) in world coordinates.
pub fn trace_ray(
    input: Ray,
    elements: &[Element],
    tables: &MaterialTables,
    inv: &mut InvocationState<'_>,
) {
    let mut ray = input;

    for (index, element) in elements.iter().enumerate() {
        let local = ray.transformed(&element.in_trans);

        // wastebox: no surface hit inside the cutout means the ray
        // passes this element untouched
        let Some(col) = find_collision(&local, &element.surface, &element.cutout) else {
            continue;
        };

        let mut hit = local;
        hit.position = col.point;
        hit.path_length += col.distance;
        hit.last_element = index as f64;

        match behave(hit, &col.normal, element, tables, &mut inv.rng) {
            Outcome::Continue(out) => {
                inv.record_event(out, EventType::JustHitElem);
                if inv.is_finalized() {
                    // output window overflowed
                    return;
                }
                ray = out.transformed(&element.out_trans);
            }
            Outcome::Terminal(out, event) => {
                inv.record_final_event(out, event);
                return;
            }
        }
    }

    inv.record_final_event(ray, EventType::FlyOff);
}
