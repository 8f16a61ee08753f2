//! Multi-channel scores built from the single-channel Poisson primitives.
//!
//! Channels are independent: log-likelihood ratios add, probabilities
//! multiply.

use fc_common::{Error, Point, Rate, Result};
use fc_math::{llratio, partial, pmf};

/// Combined Feldman-Cousins ordering statistic of `point`.
pub fn hood(point: &Point, rates: &[Rate]) -> Result<f64> {
    Error::check_dim(point.dim(), rates.len())?;
    Ok(point
        .coords()
        .iter()
        .zip(rates)
        .map(|(&n, r)| llratio(n, r.signal, r.background))
        .sum())
}

/// Joint Poisson probability of `point`.
pub fn prob(point: &Point, rates: &[Rate]) -> Result<f64> {
    Error::check_dim(point.dim(), rates.len())?;
    Ok(point
        .coords()
        .iter()
        .zip(rates)
        .map(|(&n, r)| pmf(n, r.mean()))
        .product())
}

/// Joint probability of `point` relative to `origin`, `prob(point) / prob(origin)`.
pub fn part(origin: &Point, point: &Point, rates: &[Rate]) -> Result<f64> {
    Error::check_dim(origin.dim(), point.dim())?;
    Error::check_dim(point.dim(), rates.len())?;
    Ok(origin
        .coords()
        .iter()
        .zip(point.coords())
        .zip(rates)
        .map(|((&n0, &n), r)| partial(n0, n, r.mean()))
        .product())
}
