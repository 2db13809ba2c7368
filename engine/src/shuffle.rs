// ═══════════════════════════════════════════════════════════════════════
// Shuffling primitives — tier groups and team draw order
// ═══════════════════════════════════════════════════════════════════════

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator for one draw: seeded when a seed is given, otherwise from OS entropy.
pub fn draw_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Uniform random permutation of `items` (Fisher–Yates, last index first).
pub fn shuffled<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items
}

/// Random permutation of `0..team_count`, drawn fresh for every group so
/// that no team systematically picks first.
pub fn team_order<R: Rng + ?Sized>(team_count: usize, rng: &mut R) -> Vec<usize> {
    shuffled((0..team_count).collect(), rng)
}
