/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Select `k` distinct indices from `0..n` using a partial Fisher-Yates shuffle.
pub(crate) fn partial_shuffle(n: usize, k: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let k = k.min(n);
    for i in 0..k {
        let j = rng.usize(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}

/// Draw `n` indices from `0..n` with replacement.
pub(crate) fn bootstrap(n: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    (0..n).map(|_| rng.usize(0..n)).collect()
}
