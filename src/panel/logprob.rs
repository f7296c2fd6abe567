//! Token log-probabilities → calibrated rating distribution.
//!
//! The respondent is asked for a `0..=9` answer; the last token's top-k
//! log-probabilities are the only signal we get. Digit tokens are shifted by
//! +1 onto the `1..=10` panel scale, temperature-scaled, and normalized.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::{RatingDistribution, RespondentReading};

/// Flattens the model's (usually over-confident) answer distribution.
pub const DEFAULT_TEMPERATURE: f64 = 1.5;

/// Normalize one respondent's reading into a rating distribution.
///
/// Returns the all-zero distribution when no digit token survives or the
/// surviving mass is zero. An invalid temperature falls back to
/// [`DEFAULT_TEMPERATURE`].
pub fn normalize_logprobs(reading: &RespondentReading, temperature: f64) -> RatingDistribution {
    let temperature = if temperature.is_finite() && temperature > 0.0 {
        temperature
    } else {
        warn!(temperature, "invalid temperature, using default");
        DEFAULT_TEMPERATURE
    };

    let mut scaled: Vec<(u8, f64)> = Vec::with_capacity(reading.len());
    for (token, logprob) in reading {
        let Some(rating) = token_rating(token) else {
            continue;
        };
        let value = logprob / temperature;
        if value.is_nan() || value == f64::INFINITY {
            warn!(token = token.as_str(), logprob, "non-finite token log-probability skipped");
            continue;
        }
        scaled.push((rating, value));
    }

    // Shift by the largest scaled value so very negative log-probabilities
    // do not all underflow to zero.
    let shift = scaled.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    // Tokens that only differ by whitespace ("7" vs " 7") name the same rating,
    // so their mass is summed.
    let mut weights: BTreeMap<u8, f64> = BTreeMap::new();
    if shift.is_finite() {
        for (rating, value) in scaled {
            *weights.entry(rating).or_insert(0.0) += (value - shift).exp();
        }
    }

    let total: f64 = weights.values().sum();
    if weights.is_empty() || total <= 0.0 {
        warn!(tokens = reading.len(), "no usable digit tokens, returning empty distribution");
        return RatingDistribution::zero();
    }

    let distribution =
        RatingDistribution::from_probabilities(weights.into_iter().map(|(r, w)| (r, w / total)));
    debug!(temperature, ?distribution, "normalized respondent reading");
    distribution
}

/// Map a single ASCII digit token onto the panel scale.
///
/// Anything else (including `"10"`) is not a rating.
fn token_rating(token: &str) -> Option<u8> {
    match token.trim().as_bytes() {
        [b @ b'0'..=b'9'] => Some(b - b'0' + 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(pairs: &[(&str, f64)]) -> RespondentReading {
        pairs.iter().map(|(t, lp)| (t.to_string(), *lp)).collect()
    }

    #[test]
    fn sums_to_one_and_shifts_digits() {
        let d = normalize_logprobs(&reading(&[("9", -0.1), ("8", -1.0), ("5", -3.0)]), 1.5);
        assert!((d.total() - 1.0).abs() < 1e-9);
        assert!(d.iter().all(|(_, p)| p >= 0.0));
        assert_eq!(d.peak(), Some(10));
        assert!(d.get(9) > 0.0);
        assert!(d.get(6) > 0.0);
        assert_eq!(d.get(1), 0.0);
    }

    #[test]
    fn temperature_scaling_matches_formula() {
        let d = normalize_logprobs(&reading(&[("0", -1.0), ("1", -2.0)]), 2.0);
        let a = (-0.5f64).exp();
        let b = (-1.0f64).exp();
        assert!((d.get(1) - a / (a + b)).abs() < 1e-12);
        assert!((d.get(2) - b / (a + b)).abs() < 1e-12);
    }

    #[test]
    fn higher_temperature_flattens() {
        let r = reading(&[("9", -0.1), ("2", -3.0)]);
        let sharp = normalize_logprobs(&r, 0.5);
        let flat = normalize_logprobs(&r, 3.0);
        assert!(sharp.get(10) > flat.get(10));
    }

    #[test]
    fn non_digit_tokens_and_ten_are_dropped() {
        let d = normalize_logprobs(&reading(&[("10", -0.01), ("Rating", -0.2), ("x", -0.3)]), 1.5);
        assert!(d.is_empty());
        assert_eq!(d.iter().count(), 10);
    }

    #[test]
    fn very_negative_logprobs_still_sum_to_one() {
        let d = normalize_logprobs(&reading(&[("9", -1200.0), ("8", -1201.0)]), 1.5);
        assert!((d.total() - 1.0).abs() < 1e-9);
        let a = 1.0;
        let b = (-1.0f64 / 1.5).exp();
        assert!((d.get(10) - a / (a + b)).abs() < 1e-12);
        assert!((d.get(9) - b / (a + b)).abs() < 1e-12);
    }

    #[test]
    fn only_negative_infinity_is_no_data() {
        let d = normalize_logprobs(&reading(&[("3", f64::NEG_INFINITY), ("4", f64::NAN)]), 1.5);
        assert!(d.is_empty());
    }

    #[test]
    fn empty_reading_is_no_data() {
        assert!(normalize_logprobs(&RespondentReading::new(), 1.5).is_empty());
    }

    #[test]
    fn whitespace_variants_share_mass() {
        let d = normalize_logprobs(&reading(&[("7", -1.0), (" 7", -1.0), ("3", -1.0)]), 1.0);
        assert!((d.get(8) - 2.0 / 3.0).abs() < 1e-12);
        assert!((d.get(4) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_temperature_uses_default() {
        let r = reading(&[("4", -0.3), ("6", -1.1)]);
        assert_eq!(normalize_logprobs(&r, 0.0), normalize_logprobs(&r, DEFAULT_TEMPERATURE));
        assert_eq!(normalize_logprobs(&r, f64::NAN), normalize_logprobs(&r, DEFAULT_TEMPERATURE));
    }

    #[test]
    fn order_independent() {
        let a = reading(&[("1", -0.5), ("2", -0.7), ("3", -2.0)]);
        let b = reading(&[("3", -2.0), ("1", -0.5), ("2", -0.7)]);
        assert_eq!(normalize_logprobs(&a, 1.5), normalize_logprobs(&b, 1.5));
    }

    #[test]
    fn token_rating_only_accepts_single_digit() {
        assert_eq!(token_rating("0"), Some(1));
        assert_eq!(token_rating(" 9\n"), Some(10));
        assert_eq!(token_rating("10"), None);
        assert_eq!(token_rating("٣"), None);
        assert_eq!(token_rating(""), None);
    }
}
