// ============================================================
// Layer 4: Train/Validation/Test Splitter
// ============================================================
// Two-stage seeded partition:
//
//   1. Shuffle everything, take the first round(N * test)
//      items as the test set. The rest is the pool (size M).
//   2. Shuffle the pool with a freshly seeded generator, take
//      the first round(M * valid / (1 - test)) items as the
//      validation set. The rest is train.
//
// Rounding is half-away-from-zero (f64::round). Each cut is
// clamped to the slice it cuts and train always takes the
// remainder, so the three sizes sum to N for every N.
//
// The generator type is a parameter. split_dataset pins it to
// ChaCha8Rng::seed_from_u64(seed), and the shuffle is rand's
// Fisher-Yates SliceRandom::shuffle, so a given (N, seed,
// fractions) produces the same partition on every platform.
//
// Reference: rand / rand_chacha crate documentation

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::data::dataset::Splits;
use crate::domain::error::Result;
use crate::domain::split::SplitConfig;

/// Split `items` with the pinned ChaCha8 generator.
pub fn split_dataset<T>(items: Vec<T>, cfg: &SplitConfig) -> Result<Splits<T>> {
    split_dataset_with::<T, ChaCha8Rng>(items, cfg)
}

/// Split `items` with any seedable generator `R`.
/// Both stages seed a new `R` from `cfg.seed`.
pub fn split_dataset_with<T, R>(mut items: Vec<T>, cfg: &SplitConfig) -> Result<Splits<T>>
where
    R: Rng + SeedableRng,
{
    cfg.validate()?;
    let total = items.len();

    // ── Stage 1: carve out the test set ──────────────────────────────────────
    let mut rng = R::seed_from_u64(cfg.seed);
    items.shuffle(&mut rng);
    let n_test   = cut_point(total, cfg.test_fraction);
    let mut pool = items.split_off(n_test);
    let test     = items;

    // ── Stage 2: carve validation out of the pool ────────────────────────────
    let mut rng = R::seed_from_u64(cfg.seed);
    pool.shuffle(&mut rng);
    let n_valid = cut_point(pool.len(), cfg.adjusted_valid_fraction());
    let train   = pool.split_off(n_valid);
    let valid   = pool;

    tracing::debug!(
        "Dataset split: {} train, {} valid, {} test (seed {})",
        train.len(),
        valid.len(),
        test.len(),
        cfg.seed,
    );

    Ok(Splits { train, valid, test })
}

fn cut_point(len: usize, fraction: f64) -> usize {
    (((len as f64) * fraction).round() as usize).min(len)
}
