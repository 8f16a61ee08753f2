//! Points in the N-dimensional space of observed event counts.
//!
//! One coordinate per channel. Points order lexicographically so they can be
//! deduplicated in ordered sets and compared across belts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// An integer point, one non-negative count per channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point(Vec<u64>);

impl Point {
    /// Build a point from explicit coordinates.
    pub fn new(coords: impl Into<Vec<u64>>) -> Self {
        Point(coords.into())
    }

    /// Number of channels.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn coords(&self) -> &[u64] {
        &self.0
    }

    /// Drop the leading coordinate.
    pub fn tail(&self) -> Point {
        Point(self.0.iter().skip(1).copied().collect())
    }

    /// Drop the trailing coordinate.
    pub fn head(&self) -> Point {
        let keep = self.0.len().saturating_sub(1);
        Point(self.0[..keep].to_vec())
    }

    /// New point with `lead` inserted in front.
    pub fn prefixed(&self, lead: u64) -> Point {
        let mut coords = Vec::with_capacity(self.0.len() + 1);
        coords.push(lead);
        coords.extend_from_slice(&self.0);
        Point(coords)
    }
}

impl From<Vec<u64>> for Point {
    fn from(coords: Vec<u64>) -> Self {
        Point(coords)
    }
}

impl From<&[u64]> for Point {
    fn from(coords: &[u64]) -> Self {
        Point(coords.to_vec())
    }
}

impl<const N: usize> From<[u64; N]> for Point {
    fn from(coords: [u64; N]) -> Self {
        Point(coords.to_vec())
    }
}

impl Index<usize> for Point {
    type Output = u64;

    fn index(&self, index: usize) -> &u64 {
        &self.0[index]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ">")
    }
}
