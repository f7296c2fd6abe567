//! Population distribution → integer survey counts.
//!
//! Two modes:
//! - [`simulate_survey`]: deterministic apportionment (round, then settle the
//!   rounding error on the largest bucket). This is the default.
//! - [`draw_survey`]: seeded random draws, one per simulated respondent.
//!
//! Both guarantee the counts sum exactly to the requested sample size whenever
//! there is something to sample.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, WeightedIndex};
use tracing::{debug, warn};

use crate::domain::{PopulationDistribution, SimulatedSample};

/// Apportion `sample_size` responses across ratings.
///
/// Each rating gets `round(p × N)` (half away from zero). The remainder
/// `N − Σ counts` is settled on the rating holding the largest count, ties
/// going to the smaller rating. A negative remainder larger than that count
/// carries over to the next largest, so no count drops below zero.
pub fn simulate_survey(distribution: &PopulationDistribution, sample_size: u64) -> SimulatedSample {
    if sample_size == 0 {
        return distribution.iter().map(|(rating, _)| (rating, 0)).collect();
    }

    let n = sample_size as f64;
    let mut counts: BTreeMap<u8, u64> = distribution
        .iter()
        .map(|(rating, p)| (rating, raw_count(p, n)))
        .collect();

    // Rounded counts can exceed u64 in total when N is close to u64::MAX.
    let assigned: u128 = counts.values().map(|&c| u128::from(c)).sum();
    let target = u128::from(sample_size);
    if assigned < target {
        if let Some(slot) = largest(&counts).and_then(|r| counts.get_mut(&r)) {
            // The slot is part of `assigned`, so the result is at most N.
            *slot += (target - assigned) as u64;
        }
    } else {
        let mut excess = assigned - target;
        while excess > 0 {
            let Some(slot) = largest(&counts).and_then(|r| counts.get_mut(&r)) else {
                break;
            };
            let take = excess.min(u128::from(*slot)) as u64;
            *slot -= take;
            excess -= u128::from(take);
        }
    }

    debug!(sample_size, ?counts, "apportioned survey sample");
    SimulatedSample::new(counts)
}

/// Draw `sample_size` responses at random from the distribution.
///
/// Reproducible for a given `seed`. The "no data" distribution yields all-zero
/// counts since there is nothing to draw from.
pub fn draw_survey(distribution: &PopulationDistribution, sample_size: u64, seed: u64) -> SimulatedSample {
    let mut counts: BTreeMap<u8, u64> = distribution.iter().map(|(rating, _)| (rating, 0)).collect();
    if sample_size == 0 {
        return SimulatedSample::new(counts);
    }

    let (ratings, weights): (Vec<u8>, Vec<f64>) = distribution
        .iter()
        .map(|(rating, p)| (rating, if p.is_finite() && p > 0.0 { p } else { 0.0 }))
        .unzip();

    let index = match WeightedIndex::new(&weights) {
        Ok(index) => index,
        Err(e) => {
            warn!(error = %e, "distribution has no drawable mass, returning empty sample");
            return SimulatedSample::new(counts);
        }
    };

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..sample_size {
        let rating = ratings[index.sample(&mut rng)];
        *counts.entry(rating).or_insert(0) += 1;
    }

    debug!(sample_size, seed, ?counts, "drew survey sample");
    SimulatedSample::new(counts)
}

fn raw_count(p: f64, n: f64) -> u64 {
    if !(p.is_finite() && p > 0.0) {
        return 0;
    }
    (p * n).round() as u64
}

/// Rating with the largest count; ties go to the smaller rating.
fn largest(counts: &BTreeMap<u8, u64>) -> Option<u8> {
    let mut best: Option<(u8, u64)> = None;
    for (&rating, &count) in counts {
        match best {
            Some((_, c)) if count <= c => {}
            _ => best = Some((rating, count)),
        }
    }
    best.map(|(r, _)| r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RatingDistribution;

    #[test]
    fn zero_sample_size_is_all_zero() {
        let d = RatingDistribution::from_probabilities([(10, 1.0)]);
        let s = simulate_survey(&d, 0);
        assert_eq!(s.total(), 0);
        assert_eq!(s.iter().count(), 10);
    }

    #[test]
    fn exact_apportionment() {
        let d = RatingDistribution::from_probabilities([(10, 0.5), (9, 0.3), (1, 0.2)]);
        let s = simulate_survey(&d, 10);
        assert_eq!(s.get(10), 5);
        assert_eq!(s.get(9), 3);
        assert_eq!(s.get(1), 2);
        assert_eq!(s.total(), 10);
    }

    #[test]
    fn deficit_goes_to_largest_bucket() {
        // round(0.1 × 1) = 0 everywhere; the whole deficit lands on the tie winner.
        let d = RatingDistribution::from_probabilities((1..=10).map(|r| (r, 0.1)));
        let s = simulate_survey(&d, 1);
        assert_eq!(s.get(1), 1);
        assert_eq!(s.total(), 1);
    }

    #[test]
    fn overshoot_never_goes_negative() {
        // round(0.25 × 2) = 1 for four ratings: assigned 4, target 2.
        let d = RatingDistribution::from_probabilities([(2, 0.25), (4, 0.25), (6, 0.25), (8, 0.25)]);
        let s = simulate_survey(&d, 2);
        assert_eq!(s.total(), 2);
        assert_eq!(s.get(2), 0);
        assert_eq!(s.get(4), 0);
        assert_eq!(s.get(6), 1);
        assert_eq!(s.get(8), 1);
    }

    #[test]
    fn sums_to_n_for_many_sizes() {
        let d = RatingDistribution::from_probabilities([
            (1, 0.05),
            (3, 0.115),
            (5, 0.135),
            (7, 0.2),
            (8, 0.125),
            (9, 0.125),
            (10, 0.25),
        ]);
        for n in 0..=500 {
            assert_eq!(simulate_survey(&d, n).total(), n, "n={n}");
        }
    }

    #[test]
    fn sums_to_n_at_u64_max() {
        let d = RatingDistribution::from_probabilities([(9, 0.5), (10, 0.5)]);
        let s = simulate_survey(&d, u64::MAX);
        assert_eq!(s.total(), u64::MAX);
        assert_eq!(s.get(9) + 1, s.get(10));

        let all = simulate_survey(&RatingDistribution::from_probabilities([(10, 1.0)]), u64::MAX);
        assert_eq!(all.get(10), u64::MAX);
    }

    #[test]
    fn no_data_distribution_still_sums_to_n() {
        let s = simulate_survey(&RatingDistribution::zero(), 7);
        assert_eq!(s.total(), 7);
        assert_eq!(s.get(1), 7);
    }

    #[test]
    fn largest_breaks_ties_by_smaller_rating() {
        let counts = BTreeMap::from([(3, 4), (5, 4), (1, 2)]);
        assert_eq!(largest(&counts), Some(3));
        assert_eq!(largest(&BTreeMap::new()), None);
    }

    #[test]
    fn draw_is_seeded_and_sums_to_n() {
        let d = RatingDistribution::from_probabilities([(10, 0.6), (7, 0.3), (2, 0.1)]);
        let a = draw_survey(&d, 250, 42);
        let b = draw_survey(&d, 250, 42);
        assert_eq!(a, b);
        assert_eq!(a.total(), 250);
        assert_eq!(a.get(5), 0);
    }

    #[test]
    fn draw_from_no_data_is_empty() {
        let s = draw_survey(&RatingDistribution::zero(), 10, 1);
        assert_eq!(s.total(), 0);
    }
}
