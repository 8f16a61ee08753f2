//! Minimum signal needed to reject the background-only hypothesis.
//!
//! For a known background `b`, the signal is raised from `sqrt(b)` in fixed
//! steps, rebuilding the single-channel belt each time, until the count
//! `floor(b)` is no longer accepted. The first such signal is the smallest
//! mean for which an observation at the background level would exclude the
//! signal at the requested confidence level.

use super::check_positive;
use crate::belt::Belt;
use crate::config::ScanConfig;
use crate::region::Region;
use fc_common::{Error, Point, Rate, Result};
use fc_math::interval_mass;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Inputs of a rejection scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RejectOptions {
    /// Expected background count.
    pub background: f64,
    /// Target confidence level in (0, 1).
    pub confidence_level: f64,
    /// Signal increment per step.
    pub step: f64,
    /// Maximum number of increments before giving up.
    pub max_steps: usize,
}

impl RejectOptions {
    /// Options for `background` with scan settings taken from `config`.
    pub fn from_config(background: f64, config: &ScanConfig) -> Self {
        RejectOptions {
            background,
            confidence_level: config.confidence_level,
            step: config.signal_step,
            max_steps: config.max_steps,
        }
    }
}

/// Outcome of a rejection scan.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub background: f64,
    /// First signal whose belt excludes the background count.
    pub signal: f64,
    /// Number of signal increments taken.
    pub steps: usize,
    /// Acceptance belt at `signal`.
    pub belt: Belt,
    /// Smallest accepted count.
    pub lower: u64,
    /// Largest accepted count.
    pub upper: u64,
    /// Poisson mass of `[lower, upper]` at `signal + background`.
    pub mass: f64,
}

/// Run the rejection scan on a single-channel region.
pub fn minimum_signal<R: Rng>(region: &mut Region<R>, opts: &RejectOptions) -> Result<Rejection> {
    Error::check_dim(1, region.order())?;
    check_positive("signal step", opts.step)?;
    let mut rate = Rate::new(opts.background.sqrt(), opts.background)?;

    let null = Point::from([opts.background.floor() as u64]);
    let mut belt = Belt::from_point(&null)?;
    let mut steps = 0usize;

    while belt.contains(&null)? {
        if steps >= opts.max_steps {
            return Err(Error::NonTermination { iterations: steps });
        }
        rate.set_signal(rate.signal + opts.step)?;
        belt = region.expand(opts.confidence_level, &[rate])?;
        steps += 1;
        if steps % 1000 == 0 {
            debug!(steps, signal = rate.signal, "rejection scan progress");
        }
    }

    let (lower, upper) = belt.bounds().ok_or(Error::NoCandidates)?;
    let mass = interval_mass(lower, upper, rate.mean());
    info!(
        background = opts.background,
        signal = rate.signal,
        steps,
        lower,
        upper,
        "background rejected"
    );

    Ok(Rejection {
        background: opts.background,
        signal: rate.signal,
        steps,
        belt,
        lower,
        upper,
        mass,
    })
}
