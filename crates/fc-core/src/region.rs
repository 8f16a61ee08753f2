//! Feldman-Cousins region expansion.
//!
//! A [`Region`] grows a fresh [`Belt`] from the rounded expectation point,
//! always admitting the outside candidate with the smallest combined
//! log-likelihood ratio, until the admitted Poisson mass reaches the
//! requested confidence level. The result is the Feldman-Cousins acceptance
//! region for the given per-channel rates.
//!
//! Mass is tracked relative to the start point: each admitted point adds
//! `part(start, point)` and the loop stops once `sum >= cl / prob(start)`.
//! This keeps each step `O(distance)` instead of re-evaluating full Poisson
//! terms.
//!
//! Exact ties between candidates are broken uniformly at random with the
//! region's own random source. Seed it for reproducible belts.

use crate::belt::Belt;
use crate::score;
use fc_common::{Error, Point, Rate, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, debug_span, trace, warn};

/// Default cap on admitted points per expansion.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

/// Expansion engine for belts of a fixed order.
#[derive(Debug, Clone)]
pub struct Region<R = StdRng> {
    order: usize,
    rng: R,
    max_iterations: usize,
}

impl Region<StdRng> {
    /// Region seeded from OS entropy.
    pub fn new(order: usize) -> Self {
        Self::with_rng(order, StdRng::from_os_rng())
    }

    /// Region with a reproducible tie-break sequence.
    pub fn seeded(order: usize, seed: u64) -> Self {
        Self::with_rng(order, StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn from_seed(order: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(order, seed),
            None => Self::new(order),
        }
    }
}

impl<R: Rng> Region<R> {
    /// Region drawing tie-breaks from `rng`.
    pub fn with_rng(order: usize, rng: R) -> Self {
        Region {
            order,
            rng,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Grow the acceptance belt for `rates` until it holds at least `cl` of
    /// the joint Poisson mass.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if `rates.len()` differs from the order
    /// - [`Error::InvalidConfidenceLevel`] unless `0 < cl < 1`
    /// - [`Error::InvalidRate`] for negative or non-finite expectations
    /// - [`Error::NoCandidates`] / [`Error::NonTermination`] if the loop
    ///   cannot converge
    pub fn expand(&mut self, cl: f64, rates: &[Rate]) -> Result<Belt> {
        Error::check_dim(self.order, rates.len())?;
        if !(cl > 0.0 && cl < 1.0) {
            return Err(Error::InvalidConfidenceLevel(cl));
        }
        for rate in rates {
            rate.validate()?;
        }

        let _span = debug_span!("expand", order = self.order, cl).entered();

        let start = start_point(rates);
        let mut belt = Belt::from_point(&start)?;
        let target = cl / score::prob(&start, rates)?;
        let mut sum = 1.0;
        let mut iterations = 0usize;

        while sum < target {
            if iterations >= self.max_iterations {
                warn!(iterations, sum, target, "expansion hit iteration cap");
                return Err(Error::NonTermination { iterations });
            }
            let next = self.next(&belt, rates)?;
            sum += score::part(&start, &next, rates)?;
            belt.add(&next)?;
            iterations += 1;
            trace!(point = %next, sum, "admitted");
        }

        debug!(
            start = %start,
            iterations,
            capacity = belt.capacity(),
            "belt converged"
        );
        Ok(belt)
    }

    /// Lowest-ratio candidate outside `belt`; ties go to the random source.
    fn next(&mut self, belt: &Belt, rates: &[Rate]) -> Result<Point> {
        let mut candidates = belt.closest();
        if candidates.is_empty() {
            return Err(Error::NoCandidates);
        }

        let scores = candidates
            .iter()
            .map(|p| score::hood(p, rates))
            .collect::<Result<Vec<f64>>>()?;
        let best = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let tied: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == best)
            .map(|(i, _)| i)
            .collect();

        let pick = match tied.as_slice() {
            [only] => *only,
            [] => 0,
            many => {
                trace!(ties = many.len(), score = best, "breaking tie");
                many[self.rng.random_range(0..many.len())]
            }
        };
        Ok(candidates.swap_remove(pick))
    }
}

/// Rounded expectation point, one coordinate per channel.
pub fn start_point(rates: &[Rate]) -> Point {
    Point::new(
        rates
            .iter()
            .map(|r| r.mean().round() as u64)
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_math::interval_mass;

    fn rate(s: f64, b: f64) -> Rate {
        Rate::new(s, b).unwrap()
    }

    #[test]
    fn start_point_rounds_expectation() {
        let rates = [rate(2.5, 0.0), rate(1.2, 0.2), rate(0.0, 0.4)];
        assert_eq!(start_point(&rates), Point::from([3, 1, 0]));
    }

    #[test]
    fn single_channel_ninety_percent() {
        let mut region = Region::seeded(1, 1);
        let belt = region.expand(0.90, &[rate(3.0, 0.0)]).unwrap();
        let pts: Vec<u64> = belt.points().iter().map(|p| p[0]).collect();
        assert_eq!(pts, vec![1, 2, 3, 4, 5, 6]);

        // Closed-form mass reaches the target only with the last point.
        assert!(interval_mass(1, 6, 3.0) >= 0.90);
        assert!(interval_mass(1, 5, 3.0) < 0.90);
    }

    #[test]
    fn very_large_mean_keeps_full_mass() {
        // Past mu ~ 1930 exp(-mu) alone is below the normal f64 range.
        let mut region = Region::seeded(1, 1);
        let belt = region.expand(0.90, &[rate(2500.0, 0.0)]).unwrap();
        assert_eq!(belt.bounds(), Some((2418, 2582)));
        assert_eq!(belt.capacity(), 165);
        assert!(interval_mass(2418, 2582, 2500.0) >= 0.90);

        let belt = region.expand(0.90, &[rate(2100.0, 0.0)]).unwrap();
        assert_eq!(belt.capacity(), 151);
    }

    #[test]
    fn belt_holds_lowest_ratio_points() {
        let rates = [rate(2.0, 1.5)];
        let belt = Region::seeded(1, 3).expand(0.95, &rates).unwrap();
        let worst_inside = belt
            .points()
            .iter()
            .map(|p| score::hood(p, &rates).unwrap())
            .fold(f64::NEG_INFINITY, f64::max);
        for n in 0..40u64 {
            let p = Point::from([n]);
            if !belt.contains(&p).unwrap() {
                assert!(score::hood(&p, &rates).unwrap() >= worst_inside);
            }
        }
    }

    #[test]
    fn rejects_bad_confidence_level() {
        let mut region = Region::seeded(1, 0);
        let r = [rate(3.0, 0.0)];
        for cl in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(matches!(
                region.expand(cl, &r),
                Err(Error::InvalidConfidenceLevel(_))
            ));
        }
    }

    #[test]
    fn rejects_wrong_rate_count() {
        let mut region = Region::seeded(2, 0);
        assert!(matches!(
            region.expand(0.9, &[rate(3.0, 0.0)]),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn rejects_invalid_rate() {
        let mut region = Region::seeded(1, 0);
        let bad = Rate {
            signal: -1.0,
            background: 0.0,
        };
        assert!(matches!(
            region.expand(0.9, &[bad]),
            Err(Error::InvalidRate { .. })
        ));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let mut region = Region::seeded(1, 0).with_max_iterations(2);
        let err = region.expand(0.99, &[rate(3.0, 0.0)]).unwrap_err();
        assert!(matches!(err, Error::NonTermination { iterations: 2 }));
        assert!(err.is_internal());
    }

    #[test]
    fn low_confidence_keeps_start_point_only() {
        // pmf(3, 3) is about 0.224, already above the target.
        let belt = Region::seeded(1, 0).expand(0.2, &[rate(3.0, 0.0)]).unwrap();
        assert_eq!(belt.points(), vec![Point::from([3])]);
    }

    #[test]
    fn same_seed_same_belt() {
        let rates = [rate(3.0, 0.0), rate(3.0, 0.0)];
        let a = Region::seeded(2, 42).expand(0.9, &rates).unwrap();
        let b = Region::seeded(2, 42).expand(0.9, &rates).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tie_break_is_roughly_uniform() {
        // Symmetric channels: <3,4> and <4,3> tie exactly for the first step,
        // and a confidence level of 0.07 admits exactly one of them.
        let rates = [rate(3.0, 0.0), rate(3.0, 0.0)];
        let right = Point::from([4, 3]);
        let up = Point::from([3, 4]);
        let trials = 400;
        let mut right_count = 0;
        for seed in 0..trials {
            let belt = Region::seeded(2, seed).expand(0.07, &rates).unwrap();
            assert_eq!(belt.capacity(), 2);
            let has_right = belt.contains(&right).unwrap();
            let has_up = belt.contains(&up).unwrap();
            assert!(has_right ^ has_up);
            if has_right {
                right_count += 1;
            }
        }
        assert!(
            (140..=260).contains(&right_count),
            "right chosen {} of {} times",
            right_count,
            trials
        );
    }

    #[test]
    fn region_is_reusable_across_calls() {
        let mut region = Region::seeded(1, 9);
        let first = region.expand(0.9, &[rate(3.0, 0.0)]).unwrap();
        let _ = region.expand(0.68, &[rate(10.0, 2.0)]).unwrap();
        let again = region.expand(0.9, &[rate(3.0, 0.0)]).unwrap();
        assert_eq!(first.points(), again.points());
    }
}
