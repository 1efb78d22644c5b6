use std::time::Duration;

use rand::Rng;
use rand::rngs::ThreadRng;

/// Randomness the quiz needs: uniform picks and uniform fractions.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

/// [`RandomSource`] over any `rand` generator.
pub struct RngSource<R = ThreadRng> {
    rng: R,
}

impl RngSource<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RngSource<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RngSource<R> {
    #[cfg(test)]
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Pick an excerpt start inside the middle half of the track:
/// `[0.25 * duration, 0.75 * duration)`. Unknown (zero) length gives zero.
pub fn excerpt_start(duration: Duration, random: &mut impl RandomSource) -> Duration {
    let d = duration.as_secs_f64();
    let offset = d * 0.25 + random.unit() * d * 0.5;
    if offset.is_finite() && offset > 0.0 {
        Duration::from_secs_f64(offset)
    } else {
        Duration::ZERO
    }
}
