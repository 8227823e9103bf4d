//! Seeded random source and seed validation
//!
//! Every generation call builds its own `PseudoRandomSource`, so flowers
//! generated side by side never share a random stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::FloraError;

/// Validated generation seed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u64);

impl Seed {
    /// Wrap an integer seed; every `u64` is valid
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Accept a seed that arrived as a float (JSON numbers, UI sliders)
    ///
    /// Rejects NaN, infinities, fractional values, negative values and values
    /// beyond 2^53 where f64 stops representing every integer.
    pub fn from_f64(value: f64) -> Result<Self, FloraError> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

        if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > MAX_EXACT {
            return Err(FloraError::InvalidSeed(value));
        }
        Ok(Self(value as u64))
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for Seed {
    type Err = FloraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.parse::<u64>() {
            return Ok(Self(v));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(|v| Self::from_f64(v).ok())
            .ok_or_else(|| FloraError::InvalidSeedText(trimmed.to_string()))
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic random source for layout jitter and variant draws
#[derive(Clone, Debug)]
pub struct PseudoRandomSource {
    rng: Pcg32,
}

impl PseudoRandomSource {
    pub fn new(seed: Seed) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed.value()),
        }
    }

    /// Derive an independent child stream
    ///
    /// The child depends only on the parent seed and `stream`, not on how many
    /// values the parent has produced, so adding draws to one consumer never
    /// shifts another consumer's values.
    pub fn stream(seed: Seed, stream: u64) -> Self {
        let mixed = seed
            .value()
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .rotate_left(17)
            ^ stream.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        Self {
            rng: Pcg32::seed_from_u64(mixed),
        }
    }

    /// Uniform value in `[0, 1)`
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform value in `[-1, 1)`
    pub fn signed(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Uniform value in `[min, max)`; returns `min` when the range is empty
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_f32()
    }

    /// Uniform index in `[0, bound)`; returns 0 for an empty bound
    pub fn index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PseudoRandomSource::new(Seed::new(42));
        let mut b = PseudoRandomSource::new(Seed::new(42));
        for _ in 0..32 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn test_streams_are_independent() {
        let mut a = PseudoRandomSource::stream(Seed::new(7), 0);
        let mut b = PseudoRandomSource::stream(Seed::new(7), 1);
        let xs: Vec<f32> = (0..8).map(|_| a.next_f32()).collect();
        let ys: Vec<f32> = (0..8).map(|_| b.next_f32()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_ranges() {
        let mut rng = PseudoRandomSource::new(Seed::new(3));
        for _ in 0..200 {
            let v = rng.range(-0.5, 0.25);
            assert!((-0.5..0.25).contains(&v));
            let s = rng.signed();
            assert!((-1.0..1.0).contains(&s));
            assert!(rng.index(5) < 5);
        }
        assert_eq!(rng.index(0), 0);
        assert_eq!(rng.range(1.0, 1.0), 1.0);
    }

    #[test]
    fn test_seed_from_f64() {
        assert_eq!(Seed::from_f64(12.0).unwrap(), Seed::new(12));
        assert!(Seed::from_f64(f64::NAN).is_err());
        assert!(Seed::from_f64(f64::INFINITY).is_err());
        assert!(Seed::from_f64(1.5).is_err());
        assert!(Seed::from_f64(-3.0).is_err());
    }

    #[test]
    fn test_seed_from_str() {
        assert_eq!("99".parse::<Seed>().unwrap(), Seed::new(99));
        assert_eq!("4.0".parse::<Seed>().unwrap(), Seed::new(4));
        assert!("abc".parse::<Seed>().is_err());
        match "rose-7".parse::<Seed>() {
            Err(FloraError::InvalidSeedText(text)) => assert_eq!(text, "rose-7"),
            other => panic!("unexpected {other:?}"),
        }
        let message = " -3 ".parse::<Seed>().unwrap_err().to_string();
        assert!(message.contains("\"-3\""), "{message}");
        assert!("2.5".parse::<Seed>().is_err());
    }
}
