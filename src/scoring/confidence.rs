use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the presentation-only confidence figure.
///
/// The value is an annotation on a result and never takes part in
/// classification.
pub trait ConfidenceSource {
    /// Next sample, uniform in `[0, 1)`.
    fn sample(&mut self) -> f64;

    /// Confidence in `[70, 95]`.
    fn next_confidence(&mut self) -> f64 {
        confidence_from_sample(self.sample())
    }
}

pub fn confidence_from_sample(sample: f64) -> f64 {
    (70.0 + sample * 25.0).min(95.0)
}

/// Reproducible confidence from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededConfidence {
    rng: ChaCha8Rng,
}

impl SeededConfidence {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ConfidenceSource for SeededConfidence {
    fn sample(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Confidence seeded from OS entropy. Not reproducible.
#[derive(Debug, Clone)]
pub struct EntropyConfidence {
    rng: ChaCha8Rng,
}

impl EntropyConfidence {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for EntropyConfidence {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceSource for EntropyConfidence {
    fn sample(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same sample.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfidence(pub f64);

impl ConfidenceSource for FixedConfidence {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(confidence_from_sample(0.0), 70.0);
        assert_eq!(confidence_from_sample(0.5), 82.5);
        assert_eq!(confidence_from_sample(1.0), 95.0);
        assert_eq!(confidence_from_sample(2.0), 95.0);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededConfidence::new(42);
        let mut b = SeededConfidence::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_confidence(), b.next_confidence());
        }
    }

    #[test]
    fn test_entropy_stays_in_range() {
        let mut source = EntropyConfidence::new();
        for _ in 0..1000 {
            let c = source.next_confidence();
            assert!((70.0..=95.0).contains(&c), "out of range: {}", c);
        }
    }

    #[test]
    fn test_fixed_confidence() {
        assert_eq!(FixedConfidence(0.2).next_confidence(), 75.0);
    }
}
