//! Counter-based pseudorandom number generation.
//!
//! The tracing kernel needs a generator that can be seeded statelessly
//! per ray: every ray owns a disjoint slice of the 64-bit counter space,
//! so its stream depends only on the global ray id and the run seed,
//! never on batching or execution order. Widynski's "squares" generator
//! gives exactly that: a stateless map from a counter to a 64-bit word.

/// Key for the squares rounds. Any irregular hex pattern works; this one
/// is fixed so streams are reproducible across versions.
const SQUARES_KEY: u64 = 0xc8e4_fd15_4ce3_2f6d;

/// Counter-based random number generator ("squares", Widynski 2020).
///
/// Cloning the generator forks the stream at the current counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquaresRng {
    ctr: u64,
}

impl SquaresRng {
    /// Generator starting at the given counter value.
    pub fn new(ctr: u64) -> Self {
        Self { ctr }
    }

    /// Counter for the ray with global id `ray_id` out of `num_rays`,
    /// offset by the run seed.
    ///
    /// The 64-bit counter space is divided evenly across all rays of the
    /// run, so per-ray streams never overlap and do not depend on how
    /// the run is split into batches.
    pub fn for_ray(ray_id: u64, num_rays: u64, seed: u64) -> Self {
        let stride = u64::MAX / num_rays.max(1);
        Self::new(ray_id.wrapping_mul(stride).wrapping_add(seed))
    }

    /// The current counter value.
    pub fn counter(&self) -> u64 {
        self.ctr
    }

    /// Next 64-bit word of the stream.
    pub fn next_u64(&mut self) -> u64 {
        let out = squares64(self.ctr);
        self.ctr = self.ctr.wrapping_add(1);
        out
    }

    /// Uniform double in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        // 53 high bits give a uniform double with full mantissa coverage
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Normally distributed double via the Box-Muller transform.
    pub fn normal(&mut self, mu: f64, sigma: f64) -> f64 {
        let mut u1 = self.uniform();
        if u1 == 0.0 {
            u1 = f64::MIN_POSITIVE;
        }
        let u2 = self.uniform();
        let r = (-2.0 * u1.ln()).sqrt();
        mu + sigma * r * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// Four-round squares map with a fifth xor round for full 64-bit output.
fn squares64(ctr: u64) -> u64 {
    let mut x = ctr.wrapping_mul(SQUARES_KEY);
    let y = x;
    let z = y.wrapping_add(SQUARES_KEY);

    x = x.wrapping_mul(x).wrapping_add(y);
    x = (x >> 32) | (x << 32);
    x = x.wrapping_mul(x).wrapping_add(z);
    x = (x >> 32) | (x << 32);
    x = x.wrapping_mul(x).wrapping_add(y);
    x = (x >> 32) | (x << 32);
    let t = x.wrapping_mul(x).wrapping_add(z);
    x = (t >> 32) | (t << 32);

    t ^ (x.wrapping_mul(x).wrapping_add(y) >> 32)
}
