//! Property-based tests for points and rates.

use fc_common::{Error, Point, Rate};
use proptest::prelude::*;

fn coords() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..20, 0..5)
}

/// Any f64, weighted toward the edges validation cares about.
fn expectation() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(-0.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        -1e6..1e6f64,
    ]
}

proptest! {
    /// Point order is the lexicographic order of the coordinates.
    #[test]
    fn point_order_is_lexicographic(a in coords(), b in coords()) {
        prop_assert_eq!(Point::new(a.clone()).cmp(&Point::new(b.clone())), a.cmp(&b));
    }

    /// Dropping the lead and putting it back restores the point.
    #[test]
    fn tail_and_prefixed_invert(lead in 0u64..50, rest in coords()) {
        let point = Point::new(rest.clone()).prefixed(lead);
        prop_assert_eq!(point.dim(), rest.len() + 1);
        prop_assert_eq!(point[0], lead);
        prop_assert_eq!(point.tail(), Point::new(rest));
    }

    /// Prefixing preserves order among points with the same lead.
    #[test]
    fn prefixed_preserves_order(lead in 0u64..50, a in coords(), b in coords()) {
        let (pa, pb) = (Point::new(a), Point::new(b));
        prop_assert_eq!(pa.prefixed(lead).cmp(&pb.prefixed(lead)), pa.cmp(&pb));
    }

    #[test]
    fn head_drops_last(c in coords()) {
        let head = Point::new(c.clone()).head();
        prop_assert_eq!(head.coords(), &c[..c.len().saturating_sub(1)]);
    }

    /// A rate exists exactly when both expectations are finite and non-negative.
    #[test]
    fn rate_validation(signal in expectation(), background in expectation()) {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        match Rate::new(signal, background) {
            Ok(rate) => {
                prop_assert!(valid(signal) && valid(background));
                prop_assert!(rate.mean() >= 0.0 && rate.mean().is_finite());
            }
            Err(Error::InvalidRate { .. }) => prop_assert!(!valid(signal) || !valid(background)),
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    /// A rejected signal update leaves the rate as it was.
    #[test]
    fn set_signal_is_atomic(start in 0.0..100.0f64, next in expectation()) {
        let mut rate = Rate::new(start, 1.0).unwrap();
        let before = rate;
        match rate.set_signal(next) {
            Ok(()) => prop_assert_eq!(rate.signal, next),
            Err(_) => prop_assert_eq!(rate, before),
        }
    }
}
