//! Error types for the belt engine.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 10,
//!   "category": "input",
//!   "message": "dimension mismatch: expected 2, got 3",
//!   "recoverable": false,
//!   "context": { "expected": 2, "actual": 3 }
//! }
//! ```

use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for belt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller supplied inconsistent or out-of-range inputs.
    Input,
    /// Belt growth rule violations.
    Growth,
    /// Internal invariant violations in the expansion loop.
    Internal,
    /// Configuration file errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Growth => write!(f, "growth"),
            ErrorCategory::Internal => write!(f, "internal"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for belts, regions and scans.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("confidence level {0} is outside (0, 1)")]
    InvalidConfidenceLevel(f64),

    #[error("invalid rate {{signal: {signal}, background: {background}}}")]
    InvalidRate { signal: f64, background: f64 },

    // Growth errors (20-29)
    #[error("non-adjacent growth: {point} is not one unit step from the belt")]
    NonAdjacentGrowth { point: Point },

    // Internal errors (30-39)
    #[error("expansion produced no candidate points")]
    NoCandidates,

    #[error("expansion did not converge after {iterations} iterations")]
    NonTermination { iterations: usize },

    // Configuration errors (40-49)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Growth errors
    /// - 30-39: Internal errors
    /// - 40-49: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::DimensionMismatch { .. } => 10,
            Error::InvalidConfidenceLevel(_) => 11,
            Error::InvalidRate { .. } => 12,
            Error::NonAdjacentGrowth { .. } => 20,
            Error::NoCandidates => 30,
            Error::NonTermination { .. } => 31,
            Error::Config(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::DimensionMismatch { .. }
            | Error::InvalidConfidenceLevel(_)
            | Error::InvalidRate { .. } => ErrorCategory::Input,

            Error::NonAdjacentGrowth { .. } => ErrorCategory::Growth,

            Error::NoCandidates | Error::NonTermination { .. } => ErrorCategory::Internal,

            Error::Config(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Every failure is a deterministic function of the input, so retrying the
    /// same call never helps. Only config and I/O problems can be fixed
    /// outside the process and retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Io(_) | Error::Json(_))
    }

    /// Whether this error signals a broken internal invariant rather than a
    /// caller mistake.
    pub fn is_internal(&self) -> bool {
        self.category() == ErrorCategory::Internal
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::DimensionMismatch { .. } => {
                "Pass exactly one coordinate or rate per channel of the belt."
            }
            Error::InvalidConfidenceLevel(_) => {
                "Choose a confidence level strictly between 0 and 1 (e.g. 0.90)."
            }
            Error::InvalidRate { .. } => "Signal and background must be finite and non-negative.",
            Error::NonAdjacentGrowth { .. } => {
                "Belts grow one unit step at a time; add the intermediate points first."
            }
            Error::NoCandidates | Error::NonTermination { .. } => {
                "Internal expansion failure. Check that channel rates are positive and report with the inputs used."
            }
            Error::Config(_) => "Check the syntax and values in the configuration file.",
            Error::Io(_) => "Check that the output path exists and is writable.",
            Error::Json(_) => "Output could not be serialized; report as a bug.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::DimensionMismatch { .. } => "Dimension Mismatch",
            Error::InvalidConfidenceLevel(_) => "Invalid Confidence Level",
            Error::InvalidRate { .. } => "Invalid Rate",
            Error::NonAdjacentGrowth { .. } => "Non-Adjacent Growth",
            Error::NoCandidates => "No Candidate Points",
            Error::NonTermination { .. } => "Expansion Did Not Converge",
            Error::Config(_) => "Configuration Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }

    /// Shorthand for the common length check against a fixed order.
    pub fn check_dim(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Error::DimensionMismatch { expected, actual })
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::DimensionMismatch { expected, actual } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            Error::InvalidConfidenceLevel(cl) => {
                context.insert("confidence_level".to_string(), serde_json::json!(cl));
            }
            Error::NonAdjacentGrowth { point } => {
                context.insert("point".to_string(), serde_json::json!(point));
            }
            Error::NonTermination { iterations } => {
                context.insert("iterations".to_string(), serde_json::json!(iterations));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
