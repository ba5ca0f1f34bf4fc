//! RNG module - injectable random sources
//!
//! Everything random in the game (height samples, star placement, star colours,
//! spawn rolls) draws from a [`RandomSource`] passed in by the owner. Nothing
//! reaches for ambient global randomness, so a seed fully determines a run.
//!
//! Provides a simple LCG for deterministic play and a constant source for tests.

/// A source of uniform random numbers.
pub trait RandomSource {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32 {
        // 24 high bits fit an f32 mantissa exactly, so the result never rounds up to 1.0.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in `[0, max)`.
    fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        self.next_u32() % max
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }

    fn next_range(&mut self, max: u32) -> u32 {
        (**self).next_range(max)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state, usable as a seed to replay from here.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Returns the same unit value forever.
///
/// Handy for pinning a height field to a flat surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSource {
    value: f32,
}

impl ConstantSource {
    /// `value` must lie in `[0, 1)`.
    pub fn new(value: f32) -> Self {
        assert!(
            (0.0..1.0).contains(&value),
            "constant random value {value} is outside [0, 1)"
        );
        Self { value }
    }
}

impl RandomSource for ConstantSource {
    fn next_u32(&mut self) -> u32 {
        ((self.value as f64) * (u32::MAX as f64 + 1.0)) as u32
    }

    fn next_unit(&mut self) -> f32 {
        self.value
    }
}
