//! Expected event rates for a single channel.

use crate::error::{Error, Result};
use std::fmt;

/// Expected signal and background counts for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    pub signal: f64,
    pub background: f64,
}

impl Rate {
    /// Create a rate, rejecting negative or non-finite expectations.
    pub fn new(signal: f64, background: f64) -> Result<Self> {
        let rate = Rate { signal, background };
        rate.validate()?;
        Ok(rate)
    }

    /// Signal with no background.
    pub fn signal_only(signal: f64) -> Result<Self> {
        Self::new(signal, 0.0)
    }

    /// Total expectation `signal + background`.
    pub fn mean(&self) -> f64 {
        self.signal + self.background
    }

    /// Replace the signal expectation, keeping the background.
    ///
    /// The rate is untouched when the new value is invalid.
    pub fn set_signal(&mut self, signal: f64) -> Result<()> {
        Rate::new(signal, self.background)?;
        self.signal = signal;
        Ok(())
    }

    /// Check that both expectations are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let ok = |v: f64| v.is_finite() && v >= 0.0;
        if ok(self.signal) && ok(self.background) {
            Ok(())
        } else {
            Err(Error::InvalidRate {
                signal: self.signal,
                background: self.background,
            })
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.signal, self.background)
    }
}
