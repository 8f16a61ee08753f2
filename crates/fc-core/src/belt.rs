//! Recursive belt container for irregular regions of the count lattice.
//!
//! A belt of order N stores a contiguous span `[lo, hi]` along its leading
//! axis and, for N > 1, exactly one order-(N-1) sub-belt per leading
//! coordinate. Only the leading span is guaranteed contiguous; each slice
//! keeps its own inner bounds, so the region need not be a box.
//!
//! Storage and every query scale with the surface of the region (number of
//! spans) rather than its volume, except [`Belt::points`] which materializes
//! everything on purpose.
//!
//! Growth happens one point at a time through [`Belt::add`]; a point is
//! accepted when its leading coordinate extends the span by one unit or lands
//! inside it and the remainder is accepted by the matching slice.

use fc_common::{Error, Point, Result};
use std::collections::VecDeque;

/// N-dimensional belt with its order fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Belt {
    order: usize,
    root: Option<Span>,
}

/// One recursion level: a leading interval plus aligned slices.
///
/// `slices` is empty at the innermost level and holds `hi - lo + 1` entries
/// everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    lo: u64,
    hi: u64,
    slices: VecDeque<Span>,
}

impl Belt {
    /// Empty belt over `order` channels.
    pub fn empty(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(Error::DimensionMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Belt { order, root: None })
    }

    /// Degenerate belt holding only `point`; the order is `point.dim()`.
    pub fn from_point(point: &Point) -> Result<Self> {
        let mut belt = Belt::empty(point.dim())?;
        belt.root = Some(Span::seed(point.coords()));
        Ok(belt)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Leading-axis span `[lo, hi]`, if any point is present.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        self.root.as_ref().map(|s| (s.lo, s.hi))
    }

    /// Whether `point` lies inside the belt.
    pub fn contains(&self, point: &Point) -> Result<bool> {
        Error::check_dim(self.order, point.dim())?;
        Ok(self
            .root
            .as_ref()
            .is_some_and(|span| span.contains(point.coords())))
    }

    /// Grow the belt by `point`.
    ///
    /// Returns `Ok(false)` when the point was already inside. An empty belt
    /// accepts any point as its seed. Points that are not one unit step from
    /// the current region fail with [`Error::NonAdjacentGrowth`] and leave the
    /// belt untouched.
    pub fn add(&mut self, point: &Point) -> Result<bool> {
        Error::check_dim(self.order, point.dim())?;
        match self.root.as_mut() {
            None => {
                self.root = Some(Span::seed(point.coords()));
                Ok(true)
            }
            Some(span) => span
                .add(point.coords())
                .ok_or_else(|| Error::NonAdjacentGrowth {
                    point: point.clone(),
                }),
        }
    }

    /// Number of lattice points inside the belt.
    pub fn capacity(&self) -> u64 {
        self.root.as_ref().map_or(0, Span::capacity)
    }

    /// Number of points needed to draw the belt's extent.
    ///
    /// Each innermost interval contributes one point when degenerate and two
    /// otherwise.
    pub fn size(&self) -> usize {
        self.root.as_ref().map_or(0, Span::size)
    }

    /// Every point of the belt, in lexicographic order.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(usize::try_from(self.capacity()).unwrap_or(0));
        if let Some(span) = &self.root {
            span.collect_points(&mut Vec::with_capacity(self.order), &mut out);
        }
        out
    }

    /// Points on the outer edge of the belt.
    ///
    /// The first and last leading slices are materialized in full; interior
    /// slices contribute only their own boundary.
    pub fn boundary(&self) -> Vec<Point> {
        let mut out = Vec::new();
        if let Some(span) = &self.root {
            span.collect_boundary(&mut Vec::with_capacity(self.order), &mut out);
        }
        out
    }

    /// Candidate points for the next growth step.
    ///
    /// Every returned point is outside the belt, one unit away from it along a
    /// single axis, and accepted by [`Belt::add`]. Interior points are never
    /// visited. No point appears twice.
    pub fn closest(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(2 * self.size());
        if let Some(span) = &self.root {
            span.collect_closest(&mut Vec::with_capacity(self.order), &mut out);
        }
        out
    }

    /// Whether the two belts have at least one point in common.
    ///
    /// Only the overlapping leading range is scanned and only aligned slices
    /// are compared; neither belt is materialized.
    pub fn share(&self, other: &Belt) -> Result<bool> {
        Error::check_dim(self.order, other.order)?;
        Ok(match (&self.root, &other.root) {
            (Some(a), Some(b)) => a.shares(b),
            _ => false,
        })
    }

    /// Lexicographically smallest point.
    pub fn first(&self) -> Option<Point> {
        let mut coords = Vec::with_capacity(self.order);
        let mut span = self.root.as_ref()?;
        loop {
            coords.push(span.lo);
            match span.slices.front() {
                Some(next) => span = next,
                None => return Some(Point::new(coords)),
            }
        }
    }

    /// Lexicographically largest point.
    pub fn last(&self) -> Option<Point> {
        let mut coords = Vec::with_capacity(self.order);
        let mut span = self.root.as_ref()?;
        loop {
            coords.push(span.hi);
            match span.slices.back() {
                Some(next) => span = next,
                None => return Some(Point::new(coords)),
            }
        }
    }
}

impl Span {
    /// Degenerate span chain through `coords` (must be non-empty).
    fn seed(coords: &[u64]) -> Span {
        let (lead, rest) = match coords.split_first() {
            Some((&lead, rest)) => (lead, rest),
            None => (0, &[][..]),
        };
        let mut slices = VecDeque::with_capacity(1);
        if !rest.is_empty() {
            slices.push_back(Span::seed(rest));
        }
        Span {
            lo: lead,
            hi: lead,
            slices,
        }
    }

    fn is_leaf(&self) -> bool {
        self.slices.is_empty()
    }

    fn slice(&self, lead: u64) -> Option<&Span> {
        let idx = usize::try_from(lead.checked_sub(self.lo)?).ok()?;
        self.slices.get(idx)
    }

    fn contains(&self, coords: &[u64]) -> bool {
        let Some((&lead, rest)) = coords.split_first() else {
            return true;
        };
        if lead < self.lo || lead > self.hi {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        self.slice(lead).is_some_and(|s| s.contains(rest))
    }

    /// `Some(grew)` on success, `None` when `coords` is not adjacent.
    ///
    /// All checks run before the single mutation, so a rejected point leaves
    /// the span as it was.
    fn add(&mut self, coords: &[u64]) -> Option<bool> {
        let (&lead, rest) = coords.split_first()?;
        if (self.lo..=self.hi).contains(&lead) {
            if rest.is_empty() {
                return Some(false);
            }
            let idx = usize::try_from(lead - self.lo).ok()?;
            return self.slices.get_mut(idx)?.add(rest);
        }

        if self.lo.checked_sub(1) == Some(lead) {
            self.lo = lead;
            if !rest.is_empty() {
                self.slices.push_front(Span::seed(rest));
            }
            Some(true)
        } else if self.hi.checked_add(1) == Some(lead) {
            self.hi = lead;
            if !rest.is_empty() {
                self.slices.push_back(Span::seed(rest));
            }
            Some(true)
        } else {
            None
        }
    }

    fn capacity(&self) -> u64 {
        if self.is_leaf() {
            self.hi - self.lo + 1
        } else {
            self.slices.iter().map(Span::capacity).sum()
        }
    }

    fn size(&self) -> usize {
        if self.is_leaf() {
            if self.lo == self.hi {
                1
            } else {
                2
            }
        } else {
            self.slices.iter().map(Span::size).sum()
        }
    }

    fn collect_points(&self, prefix: &mut Vec<u64>, out: &mut Vec<Point>) {
        if self.is_leaf() {
            for x in self.lo..=self.hi {
                out.push(with_lead(prefix, x));
            }
            return;
        }
        for (x, slice) in (self.lo..).zip(&self.slices) {
            prefix.push(x);
            slice.collect_points(prefix, out);
            prefix.pop();
        }
    }

    fn collect_boundary(&self, prefix: &mut Vec<u64>, out: &mut Vec<Point>) {
        if self.is_leaf() {
            out.push(with_lead(prefix, self.lo));
            if self.hi != self.lo {
                out.push(with_lead(prefix, self.hi));
            }
            return;
        }
        for (x, slice) in (self.lo..).zip(&self.slices) {
            prefix.push(x);
            if x == self.lo || x == self.hi {
                slice.collect_points(prefix, out);
            } else {
                slice.collect_boundary(prefix, out);
            }
            prefix.pop();
        }
    }

    fn collect_closest(&self, prefix: &mut Vec<u64>, out: &mut Vec<Point>) {
        let below = self.lo.checked_sub(1);
        let above = self.hi.checked_add(1);

        if self.is_leaf() {
            out.extend(below.map(|x| with_lead(prefix, x)));
            out.extend(above.map(|x| with_lead(prefix, x)));
            return;
        }

        if let (Some(x), Some(face)) = (below, self.slices.front()) {
            prefix.push(x);
            face.collect_points(prefix, out);
            prefix.pop();
        }
        for (x, slice) in (self.lo..).zip(&self.slices) {
            prefix.push(x);
            slice.collect_closest(prefix, out);
            prefix.pop();
        }
        if let (Some(x), Some(face)) = (above, self.slices.back()) {
            prefix.push(x);
            face.collect_points(prefix, out);
            prefix.pop();
        }
    }

    fn shares(&self, other: &Span) -> bool {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        if lo > hi {
            return false;
        }
        if self.is_leaf() || other.is_leaf() {
            return true;
        }
        (lo..=hi).any(|x| match (self.slice(x), other.slice(x)) {
            (Some(a), Some(b)) => a.shares(b),
            _ => false,
        })
    }
}

fn with_lead(prefix: &[u64], lead: u64) -> Point {
    let mut coords = Vec::with_capacity(prefix.len() + 1);
    coords.extend_from_slice(prefix);
    coords.push(lead);
    Point::new(coords)
}
