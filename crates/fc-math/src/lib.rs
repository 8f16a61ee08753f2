//! Feldman-Cousins math utilities.

pub mod math;

pub use math::poisson::*;
