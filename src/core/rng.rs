//! Deterministic random number generation with forking for search.
//!
//! All randomness in the crate flows through `GameRng`: dice draws during
//! play, playouts in Monte Carlo search, and the random fallback strategy.
//!
//! ```
//! use rust_ur::core::{DiceSource, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let mut playout = rng.fork();
//!
//! let mut again = GameRng::new(42);
//! let mut playout_again = again.fork();
//! assert_eq!(playout.next_bit(), playout_again.next_bit());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::dice::DiceSource;

/// Deterministic RNG with forking.
///
/// ChaCha8 keeps it fast while giving well-distributed bits.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork an independent, deterministic stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

impl DiceSource for GameRng {
    fn next_bit(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(rng: &mut GameRng, n: usize) -> Vec<bool> {
        (0..n).map(|_| rng.next_bit()).collect()
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        assert_eq!(bits(&mut rng1, 64), bits(&mut rng2, 64));
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);
        assert_ne!(bits(&mut rng1, 64), bits(&mut rng2, 64));
    }

    #[test]
    fn test_fork_differs_from_parent() {
        let mut rng = GameRng::new(42);
        let mut forked = rng.fork();
        assert_ne!(bits(&mut rng, 64), bits(&mut forked, 64));
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        let mut f1 = rng1.fork();
        let mut f2 = rng2.fork();
        assert_eq!(bits(&mut f1, 32), bits(&mut f2, 32));
    }

    #[test]
    fn test_bits_are_balanced() {
        let mut rng = GameRng::new(7);
        let ones = bits(&mut rng, 10_000).into_iter().filter(|&b| b).count();
        assert!((4_500..5_500).contains(&ones), "ones = {ones}");
    }

    #[test]
    fn test_gen_index_in_range() {
        let mut rng = GameRng::new(3);
        for _ in 0..100 {
            assert!(rng.gen_index(5) < 5);
        }
    }
}
