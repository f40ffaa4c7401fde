//! Property-based tests for descriptor matching.

use proptest::prelude::*;

use super::matcher::{best_score, euclidean_distance, similarity};
use super::types::{DESCRIPTOR_LEN, Descriptor};

fn arb_descriptor() -> impl Strategy<Value = Descriptor> {
    prop::collection::vec(-1.0f64..1.0, DESCRIPTOR_LEN)
        .prop_map(|v| Descriptor::try_from(v).unwrap())
}

/// Moves `probe` a fraction `t` of the way toward `target`.
fn toward(probe: &Descriptor, target: &Descriptor, t: f64) -> Descriptor {
    let values = probe
        .as_slice()
        .iter()
        .zip(target.as_slice())
        .map(|(p, q)| p + (q - p) * t)
        .collect::<Vec<_>>();
    Descriptor::try_from(values).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Scores stay in [0, 1].
    #[test]
    fn prop_score_is_bounded(a in arb_descriptor(), b in arb_descriptor()) {
        let score = best_score(&a, [&b]);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// Similarity never increases with distance.
    #[test]
    fn prop_similarity_monotone(d1 in 0.0f64..10.0, d2 in 0.0f64..10.0) {
        let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        prop_assert!(similarity(near) >= similarity(far));
    }

    /// Moving the probe toward a stored template never lowers its score
    /// against that template, and the best-of-N score never drops below it.
    #[test]
    fn prop_approaching_template_never_lowers_score(
        probe in arb_descriptor(),
        template in arb_descriptor(),
        other in arb_descriptor(),
        t1 in 0.0f64..=1.0,
        t2 in 0.0f64..=1.0,
    ) {
        let (less, more) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let near = toward(&probe, &template, more);
        let far = toward(&probe, &template, less);

        let before = best_score(&far, [&template]);
        let after = best_score(&near, [&template]);
        prop_assert!(after + 1e-9 >= before);

        let stored = [template.clone(), other];
        prop_assert!(best_score(&near, &stored) + 1e-9 >= after);
    }

    /// Reaching the template gives a perfect score.
    #[test]
    fn prop_zero_distance_scores_one(template in arb_descriptor()) {
        prop_assert!(euclidean_distance(template.as_slice(), template.as_slice()).abs() < f64::EPSILON);
        prop_assert!((best_score(&template, [&template]) - 1.0).abs() < 1e-12);
    }
}
