//! Payload rendering for the CLI.
//!
//! TSV blocks are one point per line with tab-separated coordinates, each
//! block followed by two newlines so plotting tools can index blocks.

use crate::belt::Belt;
use crate::scan::{Rejection, SeparationRow};
use fc_common::Point;
use serde::Serialize;
use std::io::{self, Write};

/// Write `points` as one TSV block.
pub fn write_block<W: Write>(out: &mut W, points: &[Point]) -> io::Result<()> {
    for point in points {
        let mut first = true;
        for c in point.coords() {
            if !first {
                out.write_all(b"\t")?;
            }
            write!(out, "{}", c)?;
            first = false;
        }
        out.write_all(b"\n")?;
    }
    out.write_all(b"\n\n")
}

/// JSON view of a belt.
#[derive(Debug, Clone, Serialize)]
pub struct BeltReport {
    pub order: usize,
    pub capacity: u64,
    pub size: usize,
    pub bounds: Option<(u64, u64)>,
    /// Lexicographic extremes.
    pub first: Option<Point>,
    pub last: Option<Point>,
    pub points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest: Option<Vec<Point>>,
}

impl BeltReport {
    pub fn new(belt: &Belt, with_closest: bool) -> Self {
        BeltReport {
            order: belt.order(),
            capacity: belt.capacity(),
            size: belt.size(),
            bounds: belt.bounds(),
            first: belt.first(),
            last: belt.last(),
            points: belt.points(),
            closest: with_closest.then(|| belt.closest()),
        }
    }
}

/// JSON view of a rejection scan.
#[derive(Debug, Clone, Serialize)]
pub struct RejectionReport {
    pub background: f64,
    pub signal: f64,
    pub confidence_level: f64,
    pub steps: usize,
    pub lower: u64,
    pub upper: u64,
    pub mass: f64,
}

impl RejectionReport {
    pub fn new(rejection: &Rejection, confidence_level: f64) -> Self {
        RejectionReport {
            background: rejection.background,
            signal: rejection.signal,
            confidence_level,
            steps: rejection.steps,
            lower: rejection.lower,
            upper: rejection.upper,
            mass: rejection.mass,
        }
    }
}

/// JSON view of one separation scan row.
#[derive(Debug, Clone, Serialize)]
pub struct SeparationReport {
    pub signal: f64,
    pub distinguishable: bool,
    pub asymmetric: BeltReport,
    pub symmetric: BeltReport,
}

impl From<&SeparationRow> for SeparationReport {
    fn from(row: &SeparationRow) -> Self {
        SeparationReport {
            signal: row.signal,
            distinguishable: row.distinguishable,
            asymmetric: BeltReport::new(&row.asymmetric, true),
            symmetric: BeltReport::new(&row.symmetric, true),
        }
    }
}
