//! Seedable random number generation for deck shuffling.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical shuffles (tests rely on it)
//! - **Unbiased**: Fisher–Yates from the end, one uniform draw per position
//! - **Per-client**: The RNG never travels in a snapshot; every client owns one
//!
//! ```
//! use initiative_deck::core::DeckRng;
//!
//! let mut a = DeckRng::new(7);
//! let mut b = DeckRng::new(7);
//!
//! let mut left: Vec<u8> = (1..=10).collect();
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//! assert_eq!(left, right);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded RNG used by the pool engine.
///
/// Uses ChaCha8 for speed while keeping the statistical quality needed
/// for an unbiased shuffle.
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DeckRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in `0..=max`.
    pub fn gen_index(&mut self, max: usize) -> usize {
        self.inner.gen_range(0..=max)
    }

    /// Shuffle a slice in place (Fisher–Yates, from the end).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

impl Default for DeckRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = DeckRng::new(42);
        let mut rng2 = DeckRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_index(1000), rng2.gen_index(1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = DeckRng::new(1);
        let mut rng2 = DeckRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_index(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_index(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_gen_index_inclusive_bound() {
        let mut rng = DeckRng::new(3);
        let mut seen_max = false;
        for _ in 0..200 {
            let value = rng.gen_index(2);
            assert!(value <= 2);
            seen_max |= value == 2;
        }
        assert!(seen_max);
    }

    #[test]
    fn test_shuffle() {
        let mut rng = DeckRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);

        // Should be same elements, different order (very likely)
        assert_eq!(data.len(), original.len());
        assert_ne!(data, original);

        data.sort();
        assert_eq!(data, original);
    }

    #[test]
    fn test_shuffle_trivial_slices() {
        let mut rng = DeckRng::new(9);
        let mut empty: Vec<u8> = Vec::new();
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![5];
        rng.shuffle(&mut single);
        assert_eq!(single, vec![5]);
    }

    #[test]
    fn test_shuffle_has_no_position_bias() {
        // Count how often each value lands in each position.
        const VALUES: usize = 6;
        const TRIALS: usize = 60_000;
        let mut rng = DeckRng::new(2024);
        let mut counts = [[0usize; VALUES]; VALUES];

        for _ in 0..TRIALS {
            let mut data: Vec<usize> = (0..VALUES).collect();
            rng.shuffle(&mut data);
            for (position, value) in data.into_iter().enumerate() {
                counts[position][value] += 1;
            }
        }

        let expected = TRIALS as f64 / VALUES as f64;
        for row in &counts {
            for &count in row {
                let deviation = (count as f64 - expected).abs() / expected;
                assert!(deviation < 0.05, "position bias: {count} vs {expected}");
            }
        }
    }
}
