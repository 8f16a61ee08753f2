//! Property-based tests for belts and expansion.

use fc_core::{Belt, Point, Rate, Region};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Grow a belt from `start` by repeatedly admitting one of its candidates.
fn grow(start: Vec<u64>, picks: &[usize]) -> Belt {
    let mut belt = Belt::from_point(&Point::new(start)).unwrap();
    for &pick in picks {
        let candidates = belt.closest();
        if candidates.is_empty() {
            break;
        }
        let next = &candidates[pick % candidates.len()];
        assert!(belt.add(next).unwrap(), "candidate {} rejected", next);
    }
    belt
}

fn start_strategy(order: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..6, order)
}

fn grown_belt() -> impl Strategy<Value = Belt> {
    (1usize..=3)
        .prop_flat_map(|order| {
            (
                start_strategy(order),
                prop::collection::vec(any::<usize>(), 0..40),
            )
        })
        .prop_map(|(start, picks)| grow(start, &picks))
}

proptest! {
    #[test]
    fn capacity_counts_points(belt in grown_belt()) {
        let points = belt.points();
        prop_assert_eq!(belt.capacity(), points.len() as u64);
    }

    #[test]
    fn points_are_sorted_and_contained(belt in grown_belt()) {
        let points = belt.points();
        prop_assert!(points.windows(2).all(|w| w[0] < w[1]));
        for p in &points {
            prop_assert!(belt.contains(p).unwrap());
        }
        prop_assert_eq!(belt.first(), points.first().cloned());
        prop_assert_eq!(belt.last(), points.last().cloned());
    }

    #[test]
    fn closest_points_are_outside_and_addable(belt in grown_belt()) {
        let candidates = belt.closest();
        let unique: BTreeSet<_> = candidates.iter().cloned().collect();
        prop_assert_eq!(unique.len(), candidates.len());
        for c in &candidates {
            prop_assert!(!belt.contains(c).unwrap());
            let mut grown = belt.clone();
            prop_assert!(grown.add(c).unwrap());
            prop_assert_eq!(grown.capacity(), belt.capacity() + 1);
        }
    }

    #[test]
    fn readding_is_a_no_op(belt in grown_belt()) {
        let mut copy = belt.clone();
        for p in belt.points() {
            prop_assert!(!copy.add(&p).unwrap());
        }
        prop_assert_eq!(copy, belt);
    }

    #[test]
    fn boundary_is_subset_of_points(belt in grown_belt()) {
        let points: BTreeSet<_> = belt.points().into_iter().collect();
        for b in belt.boundary() {
            prop_assert!(points.contains(&b));
        }
    }

    #[test]
    fn share_matches_brute_force(
        (a, b) in (1usize..=2).prop_flat_map(|order| (
            (start_strategy(order), prop::collection::vec(any::<usize>(), 0..25)),
            (start_strategy(order), prop::collection::vec(any::<usize>(), 0..25)),
        ))
        .prop_map(|((sa, pa), (sb, pb))| (grow(sa, &pa), grow(sb, &pb)))
    ) {
        let left: BTreeSet<_> = a.points().into_iter().collect();
        let expected = b.points().iter().any(|p| left.contains(p));
        prop_assert_eq!(a.share(&b).unwrap(), expected);
        prop_assert_eq!(b.share(&a).unwrap(), expected);
    }

    #[test]
    fn expansion_reaches_confidence_level(
        signal in 0.0f64..12.0,
        background in 0.0f64..4.0,
        cl in 0.05f64..0.95,
        seed in any::<u64>(),
    ) {
        let rates = [Rate::new(signal, background).unwrap()];
        let belt = Region::seeded(1, seed).expand(cl, &rates).unwrap();
        let mean = signal + background;
        let mass: f64 = belt.points().iter().map(|p| fc_math::pmf(p[0], mean)).sum();
        prop_assert!(mass >= cl - 1e-9, "mass {} below {}", mass, cl);
    }

    #[test]
    fn higher_confidence_extends_belt(
        signal in 0.5f64..6.0,
        background in 0.0f64..2.0,
        low in 0.1f64..0.5,
        gap in 0.05f64..0.45,
        seed in any::<u64>(),
    ) {
        let rates = [
            Rate::new(signal, background).unwrap(),
            Rate::new(signal * 0.5, background).unwrap(),
        ];
        let small = Region::seeded(2, seed).expand(low, &rates).unwrap();
        let large = Region::seeded(2, seed).expand(low + gap, &rates).unwrap();
        for p in small.points() {
            prop_assert!(large.contains(&p).unwrap(), "{} dropped", p);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn large_means_reach_confidence_level(
        signal in 1500.0f64..6000.0,
        background in 0.0f64..500.0,
        cl in 0.5f64..0.95,
    ) {
        let rates = [Rate::new(signal, background).unwrap()];
        let belt = Region::seeded(1, 11).expand(cl, &rates).unwrap();
        let mean = signal + background;
        let (lo, hi) = belt.bounds().unwrap();
        // Log-domain reference so the check does not reuse the product form.
        let mass: f64 = (lo..=hi).map(|n| fc_math::log_pmf(n, mean).exp()).sum();
        prop_assert!(mass >= cl - 1e-6, "mass {} below {} for mean {}", mass, cl, mean);
        prop_assert!(belt.capacity() > 1);
    }
}
