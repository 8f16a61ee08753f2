//! Feldman-Cousins common types and errors.
//!
//! This crate provides foundational types shared by the belt engine:
//! - Points in the integer event-count space
//! - Per-channel signal/background rates
//! - Common error types with stable codes
//! - Output format specifications

pub mod error;
pub mod output;
pub mod point;
pub mod rate;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
pub use point::Point;
pub use rate::Rate;
