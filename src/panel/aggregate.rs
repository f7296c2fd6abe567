//! Merge respondent distributions into one population distribution.

use tracing::warn;

use crate::domain::{MAX_RATING, MIN_RATING, PopulationDistribution, RatingDistribution};

/// Sum each rating's probability across respondents and renormalize.
///
/// Empty input, or input whose accumulated mass is zero, yields the all-zero
/// distribution. Aggregating a single distribution returns it unchanged.
pub fn aggregate_distributions(distributions: &[RatingDistribution]) -> PopulationDistribution {
    if distributions.is_empty() {
        warn!("no respondent distributions, returning empty population distribution");
        return RatingDistribution::zero();
    }

    let mut sums = [0.0_f64; (MAX_RATING - MIN_RATING + 1) as usize];
    for distribution in distributions {
        for (rating, p) in distribution.iter() {
            sums[usize::from(rating - MIN_RATING)] += p;
        }
    }

    let total: f64 = sums.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        warn!(respondents = distributions.len(), "population mass is zero after aggregation");
        return RatingDistribution::zero();
    }

    RatingDistribution::from_probabilities(
        (MIN_RATING..=MAX_RATING).zip(sums.iter().map(|s| s / total)),
    )
}
