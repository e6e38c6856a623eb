#![warn(missing_docs)]

//! Batch scheduler and dispatch for the beamtrace engine.
//!
//! [`Tracer::trace`] bounds peak memory by splitting the input bundle
//! into batches, dispatches the per-ray kernel over each batch and
//! compacts the raw output into one event history per ray. The per-ray
//! RNG stream is derived from the *global* ray index and the run seed
//! only, so splitting the same bundle into different batch sizes (or
//! running it sequentially instead of in parallel) produces
//! bit-identical histories.

use beamtrace_beamline::{Beamline, Element, EventType, Ray};
use beamtrace_kernel::{trace_ray, InvocationState};
use beamtrace_material::MaterialTables;
use beamtrace_math::rng::SquaresRng;
use log::{debug, info};
use rayon::prelude::*;

mod error;
mod history;

pub use error::{Result, TracerError};
pub use history::{bundle_from_rays, extract_last_events, BundleHistory, RayHistory};

/// Everything one raw batch dispatch needs, passed explicitly instead
/// of living in ambient state.
#[derive(Debug)]
pub struct TraceRawConfig<'a> {
    /// The batch's input rays.
    pub rays: &'a [Ray],
    /// Global index of the batch's first ray.
    pub ray_id_start: u64,
    /// Total ray count of the whole run (all batches).
    pub num_rays: u64,
    /// The run seed.
    pub seed: u64,
    /// Output slots per ray.
    pub max_events: usize,
    /// Flattened optical-constant tables.
    pub material_tables: &'a MaterialTables,
    /// The beamline's elements, in beam-path order.
    pub elements: &'a [Element],
}

/// A tracing backend: runs the raw per-batch dispatch, and through the
/// provided [`trace`](Tracer::trace) implementation the full batched
/// trace.
pub trait Tracer {
    /// Trace one batch into a flat `rays.len() * max_events` buffer.
    ///
    /// Slot `i * max_events + j` holds the `j`-th event of batch ray
    /// `i`; unused slots carry [`EventType::Uninit`].
    fn trace_raw(&self, cfg: &TraceRawConfig<'_>) -> Result<Vec<Ray>>;

    /// Trace the whole beamline: generate input rays, split them into
    /// batches of at most `max_batch_size`, dispatch each batch and
    /// assemble the per-ray histories in input order.
    ///
    /// Configuration and backend errors abort the whole trace; no
    /// partial bundle is ever returned.
    fn trace(&self, beamline: &Beamline, max_batch_size: usize, seed: u64) -> Result<BundleHistory> {
        if max_batch_size == 0 {
            return Err(TracerError::InvalidBatchSize);
        }

        let rays = beamline.input_rays(seed);
        // one slot per element plus the start and terminal slack
        let max_events = beamline.elements.len() + 2;
        let material_tables = beamline.minimal_material_tables()?;

        info!(
            "tracing {} rays through {} elements (seed {seed}, batches of {max_batch_size})",
            rays.len(),
            beamline.elements.len(),
        );

        let mut bundle = BundleHistory::with_capacity(rays.len());

        for (batch_id, batch) in rays.chunks(max_batch_size).enumerate() {
            debug!("batch {batch_id}: {} rays", batch.len());

            let cfg = TraceRawConfig {
                rays: batch,
                ray_id_start: (batch_id * max_batch_size) as u64,
                num_rays: rays.len() as u64,
                seed,
                max_events,
                material_tables: &material_tables,
                elements: &beamline.elements,
            };

            let raw = self.trace_raw(&cfg)?;
            let expected = batch.len() * max_events;
            if raw.len() != expected {
                return Err(TracerError::OutputSizeMismatch { got: raw.len(), expected });
            }

            for window in raw.chunks(max_events) {
                let hist: RayHistory = window
                    .iter()
                    .copied()
                    .filter(|r| r.event() != Some(EventType::Uninit))
                    .collect();
                bundle.push(hist);
            }
        }

        Ok(bundle)
    }
}

/// The reference backend: one portable kernel per ray, run either
/// sequentially or on the rayon thread pool. Both modes share the same
/// per-ray code path, so their output is identical.
#[derive(Debug, Clone, Copy)]
pub struct SimpleTracer {
    parallel: bool,
}

impl SimpleTracer {
    /// Backend dispatching rays across the rayon thread pool.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Single-threaded reference backend.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }
}

impl Default for SimpleTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracer for SimpleTracer {
    fn trace_raw(&self, cfg: &TraceRawConfig<'_>) -> Result<Vec<Ray>> {
        if cfg.max_events == 0 {
            return Err(TracerError::InvalidConfig("max_events must be at least 1".into()));
        }
        if cfg.num_rays < cfg.ray_id_start + cfg.rays.len() as u64 {
            return Err(TracerError::InvalidConfig(
                "num_rays smaller than the batch's ray-id range".into(),
            ));
        }

        let mut output = vec![Ray::uninit(); cfg.rays.len() * cfg.max_events];

        // The output buffer is partitioned into disjoint per-ray
        // windows, so rays never contend for a slot.
        if self.parallel {
            output
                .par_chunks_mut(cfg.max_events)
                .zip(cfg.rays.par_iter())
                .enumerate()
                .for_each(|(i, (window, ray))| trace_window(cfg, i, window, ray));
        } else {
            output
                .chunks_mut(cfg.max_events)
                .zip(cfg.rays.iter())
                .enumerate()
                .for_each(|(i, (window, ray))| trace_window(cfg, i, window, ray));
        }

        Ok(output)
    }
}

/// Run the kernel for the batch-local ray `i` inside its own output
/// window.
fn trace_window(cfg: &TraceRawConfig<'_>, i: usize, window: &mut [Ray], ray: &Ray) {
    let ray_id = cfg.ray_id_start + i as u64;
    let rng = SquaresRng::for_ray(ray_id, cfg.num_rays, cfg.seed);
    let mut inv = InvocationState::new(window, rng);
    trace_ray(*ray, cfg.elements, cfg.material_tables, &mut inv);
}
