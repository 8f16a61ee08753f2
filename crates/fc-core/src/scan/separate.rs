//! Separability of two two-channel hypotheses.
//!
//! Both hypotheses produce the same total signal `s` over a conserving and a
//! violating channel with identical background `b`:
//!
//! - asymmetric: `(s, b)` and `(s * scale, b)`
//! - symmetric: `(s * (1 + scale) / 2, b)` in both channels
//!
//! For each signal in the scan the two acceptance belts are built and
//! compared. When they share no point, any single observation is compatible
//! with at most one hypothesis at the chosen confidence level.

use super::check_positive;
use crate::belt::Belt;
use crate::config::ScanConfig;
use crate::region::Region;
use fc_common::{Error, Rate, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Inputs of a separation scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeparationOptions {
    /// Background per channel.
    pub background: f64,
    /// Target confidence level in (0, 1).
    pub confidence_level: f64,
    /// Violating-to-conserving signal ratio of the asymmetric hypothesis.
    pub scale: f64,
    /// First signal of the scan.
    pub start: f64,
    /// Signals stay strictly below this value.
    pub stop: f64,
    /// Signal increment.
    pub step: f64,
}

impl SeparationOptions {
    /// Signals 1, 2, ... 99 with settings taken from `config`.
    pub fn from_config(background: f64, config: &ScanConfig) -> Self {
        SeparationOptions {
            background,
            confidence_level: config.confidence_level,
            scale: config.scale,
            start: 1.0,
            stop: 100.0,
            step: 1.0,
        }
    }

    /// Rates of the asymmetric hypothesis at `signal`.
    pub fn asymmetric_rates(&self, signal: f64) -> Result<[Rate; 2]> {
        Ok([
            Rate::new(signal, self.background)?,
            Rate::new(signal * self.scale, self.background)?,
        ])
    }

    /// Rates of the symmetric hypothesis at `signal`.
    pub fn symmetric_rates(&self, signal: f64) -> Result<[Rate; 2]> {
        let half = Rate::new(signal * (1.0 + self.scale) / 2.0, self.background)?;
        Ok([half, half])
    }

    /// Signals visited by the scan.
    pub fn signals(&self) -> impl Iterator<Item = f64> + '_ {
        (0u64..)
            .map(move |i| self.start + i as f64 * self.step)
            .take_while(move |s| *s < self.stop)
    }
}

/// One signal of the scan.
#[derive(Debug, Clone)]
pub struct SeparationRow {
    pub signal: f64,
    /// True when the two belts are disjoint.
    pub distinguishable: bool,
    pub asymmetric: Belt,
    pub symmetric: Belt,
}

/// Build both belts at every signal and record whether they overlap.
pub fn scan<R: Rng, Q: Rng>(
    asymmetric: &mut Region<R>,
    symmetric: &mut Region<Q>,
    opts: &SeparationOptions,
) -> Result<Vec<SeparationRow>> {
    Error::check_dim(2, asymmetric.order())?;
    Error::check_dim(2, symmetric.order())?;
    check_positive("signal step", opts.step)?;
    if !(opts.scale.is_finite() && opts.scale >= 0.0) {
        return Err(Error::Config(format!(
            "scale must be finite and non-negative, got {}",
            opts.scale
        )));
    }

    let mut rows = Vec::new();
    for signal in opts.signals() {
        let a = asymmetric.expand(opts.confidence_level, &opts.asymmetric_rates(signal)?)?;
        let b = symmetric.expand(opts.confidence_level, &opts.symmetric_rates(signal)?)?;
        let distinguishable = !a.share(&b)?;
        debug!(
            signal,
            distinguishable,
            asymmetric = a.capacity(),
            symmetric = b.capacity(),
            "separation step"
        );
        rows.push(SeparationRow {
            signal,
            distinguishable,
            asymmetric: a,
            symmetric: b,
        });
    }

    info!(
        rows = rows.len(),
        first_separated = ?rows.iter().find(|r| r.distinguishable).map(|r| r.signal),
        "separation scan finished"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(stop: f64) -> SeparationOptions {
        SeparationOptions {
            background: 1.0,
            confidence_level: 0.90,
            scale: 0.2,
            start: 1.0,
            stop,
            step: 1.0,
        }
    }

    #[test]
    fn signals_are_half_open() {
        let got: Vec<f64> = opts(4.0).signals().collect();
        assert_eq!(got, vec![1.0, 2.0, 3.0]);
        let mut empty = opts(1.0);
        empty.start = 1.0;
        assert_eq!(empty.signals().count(), 0);
    }

    #[test]
    fn hypotheses_share_total_signal() {
        let o = opts(10.0);
        let a = o.asymmetric_rates(10.0).unwrap();
        let s = o.symmetric_rates(10.0).unwrap();
        let total_a: f64 = a.iter().map(|r| r.signal).sum();
        let total_s: f64 = s.iter().map(|r| r.signal).sum();
        assert!((total_a - total_s).abs() < 1e-12);
    }

    #[test]
    fn weak_signals_overlap_strong_ones_separate() {
        let mut a = Region::seeded(2, 1);
        let mut s = Region::seeded(2, 2);
        let mut o = opts(61.0);
        o.step = 20.0;
        let rows = scan(&mut a, &mut s, &o).unwrap();
        let signals: Vec<f64> = rows.iter().map(|r| r.signal).collect();
        assert_eq!(signals, vec![1.0, 21.0, 41.0]);
        assert!(!rows[0].distinguishable);
        assert!(rows[2].distinguishable);
        for row in &rows {
            assert_eq!(
                row.distinguishable,
                !row.asymmetric.share(&row.symmetric).unwrap()
            );
        }
    }

    #[test]
    fn rejects_wrong_order() {
        let mut a = Region::seeded(1, 1);
        let mut s = Region::seeded(2, 2);
        assert!(matches!(
            scan(&mut a, &mut s, &opts(3.0)),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
