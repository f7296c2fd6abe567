//! Net Promoter Score from survey counts.

use tracing::warn;

use crate::domain::{DETRACTOR_MAX, PROMOTER_MIN, SimulatedSample};

/// `(promoters − detractors) / total × 100`, in `[-100, 100]`.
///
/// Promoters rate `>= 9`, detractors `<= 6`. An empty sample scores 0.
pub fn net_promoter_score(sample: &SimulatedSample) -> f64 {
    let total = sample.total();
    if total == 0 {
        warn!("empty survey sample, NPS defaults to 0");
        return 0.0;
    }

    let (promoters, detractors) = sample.iter().fold((0u64, 0u64), |(p, d), (rating, count)| {
        if rating >= PROMOTER_MIN {
            (p + count, d)
        } else if rating <= DETRACTOR_MAX {
            (p, d + count)
        } else {
            (p, d)
        }
    });

    (promoters as f64 - detractors as f64) / total as f64 * 100.0
}
