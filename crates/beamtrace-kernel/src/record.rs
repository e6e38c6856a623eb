//! The per-ray event log and its recording protocol.
//!
//! Each ray owns a fixed window of output slots. Events are appended in
//! traversal order; a terminal event moves the log into the `Finalized`
//! state, after which every further call is a no-op. The two-state
//! machine makes the at-most-one-terminal-event invariant structural
//! instead of a flag checked ad hoc at call sites.

use beamtrace_beamline::{EventType, Ray};
use beamtrace_math::rng::SquaresRng;
use log::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Recording,
    Finalized,
}

/// Ephemeral per-ray execution context: the ray's output window, the
/// append cursor, the recording phase and the ray's RNG stream.
///
/// Created when a ray's kernel invocation starts, discarded when it
/// ends; it never outlives a batch.
#[derive(Debug)]
pub struct InvocationState<'a> {
    output: &'a mut [Ray],
    next_event_index: usize,
    phase: Phase,
    /// The ray's private random-number stream.
    pub rng: SquaresRng,
}

impl<'a> InvocationState<'a> {
    /// Take ownership of a ray's output window, marking every slot as
    /// unused.
    pub fn new(output: &'a mut [Ray], rng: SquaresRng) -> Self {
        for slot in output.iter_mut() {
            slot.event_type = EventType::Uninit.code();
        }
        Self { output, next_event_index: 0, phase: Phase::Recording, rng }
    }

    /// Whether a terminal event has been recorded.
    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Number of events recorded so far.
    pub fn events_recorded(&self) -> usize {
        self.next_event_index
    }

    /// Append `ray` tagged with `event` to the next free output slot.
    ///
    /// No-op once finalized. Recording [`EventType::Uninit`] is a
    /// programming error: it asserts in debug builds and refuses the
    /// write in release builds. If the window is full, the last slot is
    /// rewritten to [`EventType::TooManyEvents`] and the log finalizes;
    /// the rest of the batch is unaffected.
    pub fn record_event(&mut self, mut ray: Ray, event: EventType) {
        if self.phase == Phase::Finalized {
            return;
        }

        if event == EventType::Uninit {
            debug_assert!(false, "recording the Uninit sentinel is forbidden");
            error!("record_event: refusing to record the Uninit sentinel");
            return;
        }

        if self.next_event_index >= self.output.len() {
            if let Some(last) = self.output.last_mut() {
                last.event_type = EventType::TooManyEvents.code();
            }
            self.phase = Phase::Finalized;
            error!("record_event: too many events, ray history truncated");
            return;
        }

        ray.event_type = event.code();
        self.output[self.next_event_index] = ray;
        self.next_event_index += 1;
    }

    /// [`record_event`](Self::record_event) followed by finalization;
    /// used for events terminating the ray's path.
    pub fn record_final_event(&mut self, ray: Ray, event: EventType) {
        self.record_event(ray, event);
        self.phase = Phase::Finalized;
    }
}
