//! Feldman-Cousins confidence belts over Poisson count spaces.
//!
//! This library provides:
//! - The recursive [`Belt`] container for irregular integer regions
//! - The [`Region`] expansion engine applying the unified ordering rule
//! - Multi-channel scores built on `fc-math`
//! - Rejection and separation scans driven through the engine
//! - Configuration, logging and exit codes for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod belt;
pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod region;
pub mod scan;
pub mod score;

pub use belt::Belt;
pub use region::{start_point, Region};

pub use fc_common::{Error, Point, Rate, Result};
