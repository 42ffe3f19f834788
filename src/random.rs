// Randomization primitives shared by every generator.
//
// All of these take the rng as an explicit argument rather than consulting
// a global source, so any caller that seeds its rng gets reproducible
// output. The sampling helpers deliberately clamp out-of-range requests
// instead of failing: asking for more elements than exist returns the
// whole population, shuffled.

use rand::Rng;
use rand::seq::SliceRandom;

/// Pick one element uniformly at random.
///
/// Panics on an empty slice; callers guarantee non-emptiness (the catalog
/// is validated once at the boundary, see [`crate::config::Catalog::validate`]).
pub fn choice<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> &'a T {
    assert!(!items.is_empty(), "choice: empty slice");
    &items[rng.random_range(0..items.len())]
}

/// Uniform integer in the closed interval `[low, high]`.
///
/// Panics if `low > high`.
pub fn random_int(rng: &mut impl Rng, low: usize, high: usize) -> usize {
    assert!(low <= high, "random_int: low must be <= high");
    rng.random_range(low..=high)
}

/// Sample `k` distinct elements in randomized order.
///
/// If `k` exceeds the population size, returns the whole population
/// (shuffled) rather than erroring.
pub fn sample<T: Clone>(rng: &mut impl Rng, items: &[T], k: usize) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    pool.shuffle(rng);
    pool.truncate(k.min(items.len()));
    pool
}

/// Mint a unique record identifier: 128 random bits as lowercase hex.
///
/// Used as the persistence key for saved ideas and rhythms, so that two
/// records created in the same millisecond never collide. The creation
/// timestamp stays on the record purely for display and sorting.
pub fn record_id(rng: &mut impl Rng) -> String {
    format!("{:032x}", rng.random::<u128>())
}
