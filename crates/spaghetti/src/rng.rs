//! Injectable random number generation.
//!
//! The walk never touches a global generator: every draw goes through a
//! [`RandomSource`] passed in by the caller, so a fixed seed reproduces a
//! run byte for byte.

use std::f64::consts::TAU;

/// A source of uniform random numbers.
///
/// Only [`RandomSource::next_f64`] is required; range and Gaussian draws are
/// derived from it, so any generator (including a scripted one in tests) can
/// drive the walk.
///
/// ## Rust Lesson #12: Default Methods on Traits
///
/// A trait can ship method bodies. Implementors get `range` and `gaussian`
/// for free and may still override them.
pub trait RandomSource {
    /// A uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// A uniform value between `min` and `max`.
    ///
    /// Like Python's `random.uniform`, `min > max` is accepted and yields a
    /// value between the two.
    #[inline]
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// A normally distributed value (Box-Muller transform).
    ///
    /// `std_dev == 0` returns `mean` but still consumes two draws so the
    /// stream stays aligned regardless of the local density.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // 1 - u maps [0, 1) onto (0, 1], keeping ln() finite
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + z * std_dev
    }
}

/// A fast, deterministic pseudo-random number generator.
///
/// Uses a Linear Congruential Generator (LCG) with the Knuth/PCG multiplier;
/// only the high 53 bits are used for floats.
///
/// # Example
/// ```
/// use spaghetti::rng::{RandomSource, Rng};
///
/// let mut rng = Rng::new(12345);
/// let value = rng.next_f64(); // Returns value in [0, 1)
/// assert!((0.0..1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    /// An independent stream for one strand of a run.
    ///
    /// The run seed and strand index are mixed with SplitMix64 so that
    /// neighbouring indices do not produce correlated LCG sequences.
    pub fn for_strand(seed: u64, index: usize) -> Self {
        let mixed = splitmix64(seed ^ splitmix64(index as u64 ^ 0xA076_1D64_78BD_642F));
        Self::new(mixed)
    }

    /// Get the next raw u64 value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }
}

impl RandomSource for Rng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
