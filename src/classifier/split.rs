use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SplitOptions;
use crate::error::Result;

/// Shuffled hold-out split of `0..n`.
///
/// Returns `(train, test)` index sets; the test side holds
/// `ceil(n * test_ratio)` indices (capped at `n`). The same seed always
/// gives the same split.
pub fn train_test_split(n: usize, options: &SplitOptions) -> Result<(Vec<usize>, Vec<usize>)> {
    options.validate()?;
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(options.seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64) * options.test_ratio).ceil() as usize;
    let test = indices.split_off(n - test_len.min(n));
    Ok((indices, test))
}

/// Pick the items at `indices`, in index order
pub fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().filter_map(|&i| items.get(i).cloned()).collect()
}
