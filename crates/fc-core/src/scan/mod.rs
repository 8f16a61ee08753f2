//! Parameter scans driven through the expansion engine.
//!
//! - [`reject`]: smallest mean signal whose belt excludes the
//!   background-only count
//! - [`separate`]: whether two competing two-channel hypotheses produce
//!   disjoint belts across a range of signals

pub mod reject;
pub mod separate;

pub use reject::{minimum_signal, RejectOptions, Rejection};
pub use separate::{SeparationOptions, SeparationRow};

use fc_common::{Error, Result};

/// Require a finite, strictly positive scan parameter.
fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be finite and positive, got {}",
            name, value
        )))
    }
}
