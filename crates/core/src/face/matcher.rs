//! Descriptor comparison.

use super::types::Descriptor;

/// Euclidean distance between two vectors of equal length.
#[must_use]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Maps a distance to a similarity in `[0, 1]`: `max(0, 1 - d / 2)`.
#[must_use]
pub fn similarity(distance: f64) -> f64 {
    (1.0 - distance / 2.0).max(0.0)
}

/// Best similarity between the probe and any stored template; 0 when there
/// are none.
#[must_use]
pub fn best_score<'a, I>(probe: &Descriptor, stored: I) -> f64
where
    I: IntoIterator<Item = &'a Descriptor>,
{
    stored
        .into_iter()
        .map(|d| similarity(euclidean_distance(probe.as_slice(), d.as_slice())))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A descriptor `distance` away from the origin along one axis.
    fn along_axis(axis: usize, distance: f64) -> Descriptor {
        let mut values = vec![0.0; 128];
        values[axis] = distance;
        Descriptor::try_from(values).unwrap()
    }

    #[test]
    fn test_identical_descriptors_score_one() {
        let d = along_axis(0, 0.4);
        assert!((best_score(&d, [&d]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_clamps_at_zero() {
        assert!(similarity(2.0).abs() < f64::EPSILON);
        assert!(similarity(5.0).abs() < f64::EPSILON);
        assert!((similarity(0.3) - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_best_of_n_picks_closest_template() {
        let probe = along_axis(0, 0.0);
        let stored = [along_axis(1, 1.4), along_axis(2, 0.3), along_axis(3, 1.4)];

        let score = best_score(&probe, &stored);
        assert!((score - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_no_templates_scores_zero() {
        let probe = along_axis(0, 0.0);
        assert!(best_score(&probe, &Vec::<Descriptor>::new()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = along_axis(0, 0.7);
        let b = along_axis(9, 0.2);
        let ab = euclidean_distance(a.as_slice(), b.as_slice());
        let ba = euclidean_distance(b.as_slice(), a.as_slice());
        assert!((ab - ba).abs() < f64::EPSILON);
    }
}
