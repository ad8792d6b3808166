//! Seedable random number generation for shuffling and sound selection.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical deals
//! - **Context streams**: Independent sequences for different purposes, so
//!   picking a game-over sound never perturbs the next shuffle
//!
//! ```
//! use memory_flip::core::GameRng;
//!
//! let rng = GameRng::new(42);
//! let mut deal = rng.for_context("shuffle");
//!
//! let mut cards = vec![1, 2, 3, 4];
//! deal.shuffle(&mut cards);
//! cards.sort();
//! assert_eq!(cards, vec![1, 2, 3, 4]);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Seedable RNG backed by ChaCha8.
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

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The stream seed is an FNV-1a hash of the seed and the context name,
    /// so the same seed and context give the same stream on every platform
    /// and toolchain.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let bytes = self.seed.to_le_bytes().into_iter().chain(context.bytes());
        let context_seed = bytes.fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        });
        Self::new(context_seed)
    }

    /// Generate a random usize in `[0, upper]`.
    pub fn gen_index(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..=upper)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    ///
    /// Walks from the last index down to 1, swapping each slot with a
    /// uniformly chosen slot at or below it.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_index(i);
            slice.swap(i, j);
        }
    }
}
