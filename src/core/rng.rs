//! Deterministic random number generation.
//!
//! Only game setup consumes randomness (library shuffles). Each player's
//! library gets its own context stream, so adding or removing a player never
//! changes another player's shuffle for the same seed.
//!
//! ```
//! use rust_mtg::core::GameRng;
//!
//! let mut a = GameRng::new(42).for_context("library:0");
//! let mut b = GameRng::new(42).for_context("library:0");
//!
//! let mut left = vec![1, 2, 3, 4, 5];
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//! assert_eq!(left, right);
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Seeded ChaCha8 RNG.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = rustc_hash::FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
        }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);

        let mut left: Vec<u32> = (0..40).collect();
        let mut right = left.clone();
        a.shuffle(&mut left);
        b.shuffle(&mut right);

        assert_eq!(left, right);
    }

    #[test]
    fn test_contexts_are_independent() {
        let base = GameRng::new(7);
        let mut a = base.for_context("library:0");
        let mut b = base.for_context("library:1");

        let mut left: Vec<u32> = (0..40).collect();
        let mut right = left.clone();
        a.shuffle(&mut left);
        b.shuffle(&mut right);

        assert_ne!(left, right);
    }
}
