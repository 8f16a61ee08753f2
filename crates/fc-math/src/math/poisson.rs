//! Single-channel Poisson primitives for the Feldman-Cousins ordering.
//!
//! Every function here works on one channel: an observed count `n`, a signal
//! expectation `s` and a background expectation `b`. Multi-channel scores are
//! formed by the caller as sums (`llratio`) or products (`pmf`, `partial`)
//! over independent channels.
//!
//! Counts are integral but the ordering statistic mixes them with real-valued
//! expectations, so conversions to `f64` happen inside each function.

/// Log-likelihood ratio of observing `n` events under `s + b` against the
/// best physically allowed signal `max(n - b, 0)`.
///
/// Lower is more compatible with the `s + b` hypothesis; the minimum sits at
/// `n ≈ s + b`. The `n == 0` branch avoids evaluating `ln(0)`.
pub fn llratio(n: u64, s: f64, b: f64) -> f64 {
    let nf = n as f64;
    let fit = 2.0 * (s - (nf - b).max(0.0));
    if n == 0 {
        return fit;
    }
    fit - 2.0 * nf * ((s + b).ln() - nf.max(b).ln())
}

/// Poisson probability mass of `n` events given mean `mu`.
///
/// Evaluated as `∏_{k=1..n} (step / k)` with `step = mu · exp(-mu / n)`, so
/// that neither `mu^n` nor `n!` is formed explicitly. Factors above one
/// (small `k`) and below one (large `k`) are interleaved so the running
/// product stays near one; only the final value may underflow.
pub fn pmf(n: u64, mu: f64) -> f64 {
    if n == 0 {
        return (-mu).exp();
    }
    let step = (-mu / n as f64).exp() * mu;
    let (mut lo, mut hi) = (1u64, n);
    let mut acc = 1.0_f64;
    while lo <= hi {
        if acc >= 1.0 {
            acc *= step / hi as f64;
            hi -= 1;
        } else {
            acc *= step / lo as f64;
            lo += 1;
        }
    }
    acc
}

/// Ratio `pmf(n, mu) / pmf(n0, mu)` as a telescoping product.
///
/// Only the factors `mu / k` for `k` strictly above `min(n0, n)` and up to
/// `max(n0, n)` are multiplied, so the cost is `O(|n - n0|)`. When `n < n0`
/// the same product is inverted, which makes
/// `partial(n0, n, mu) == 1.0 / partial(n, n0, mu)` hold bit-for-bit.
pub fn partial(n0: u64, n: u64, mu: f64) -> f64 {
    let (lo, hi) = if n >= n0 { (n0, n) } else { (n, n0) };
    let ratio = (lo + 1..=hi)
        .rev()
        .fold(1.0_f64, |acc, k| acc * (mu / k as f64));
    if n >= n0 {
        ratio
    } else {
        1.0 / ratio
    }
}

/// Natural log of `n!` by direct summation.
pub fn log_factorial(n: u64) -> f64 {
    (2..=n).map(|k| (k as f64).ln()).sum()
}

/// Log-domain Poisson mass, `n·ln(mu) - mu - ln(n!)`.
///
/// Reference form used to cross-check [`pmf`].
pub fn log_pmf(n: u64, mu: f64) -> f64 {
    if n == 0 {
        return -mu;
    }
    if mu == 0.0 {
        return f64::NEG_INFINITY;
    }
    (n as f64) * mu.ln() - mu - log_factorial(n)
}

/// Cumulative mass `P(X <= n)` for `X ~ Poisson(mu)`.
pub fn cdf(n: u64, mu: f64) -> f64 {
    interval_mass(0, n, mu)
}

/// Mass of the closed interval `[lo, hi]`. Empty when `lo > hi`.
pub fn interval_mass(lo: u64, hi: u64, mu: f64) -> f64 {
    if lo > hi {
        return 0.0;
    }
    (lo..=hi).map(|k| pmf(k, mu)).sum()
}
