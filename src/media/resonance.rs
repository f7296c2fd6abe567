//! Heuristic message/audience resonance.
//!
//! ```text
//! base       = 60 + round(sentiment × 30) + min(volume / 30, 10)
//! score      = clamp(base + audience_bias, 0, 100)
//! confidence = min(0.95, 0.4 + 0.01 × volume + 0.03 × |topics|)
//! ```
//!
//! Confidence is rounded to 2 decimals and then held to the shared reported
//! confidence domain.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{ArticleRecord, AudienceBias, Decision, MediaSnapshot, ResonanceAssessment};
use crate::verdict::clamp_confidence;
use crate::verdict::reviews::round2;

pub const BASE_SCORE: i64 = 60;
pub const SENTIMENT_WEIGHT: f64 = 30.0;
pub const SENTIMENT_RANGE: f64 = 0.2;
pub const ARTICLES_PER_VOLUME_POINT: u32 = 30;
pub const MAX_VOLUME_POINTS: u32 = 10;
pub const CONFIDENCE_CEILING: f64 = 0.95;

impl MediaSnapshot {
    /// Snapshot whose volume is the number of ranked articles.
    pub fn from_ranked(topics: Vec<String>, ranked: &[ArticleRecord], sentiment: f64, tone: impl Into<String>) -> Self {
        Self {
            topics,
            sentiment,
            volume: u32::try_from(ranked.len()).unwrap_or(u32::MAX),
            tone: tone.into(),
        }
    }
}

/// Score one target audience against the media snapshot.
pub fn score_resonance(audience: &str, snapshot: &MediaSnapshot, bias: &AudienceBias) -> ResonanceAssessment {
    let sentiment = if snapshot.sentiment.is_nan() {
        0.0
    } else {
        snapshot.sentiment.clamp(-SENTIMENT_RANGE, SENTIMENT_RANGE)
    };

    let base = BASE_SCORE
        + (sentiment * SENTIMENT_WEIGHT).round() as i64
        + i64::from((snapshot.volume / ARTICLES_PER_VOLUME_POINT).min(MAX_VOLUME_POINTS));
    let audience_bias = bias.get(audience);
    let score = (base + i64::from(audience_bias)).clamp(0, 100) as u8;

    let raw_confidence = (0.4 + 0.01 * f64::from(snapshot.volume) + 0.03 * snapshot.topics.len() as f64)
        .min(CONFIDENCE_CEILING);
    let confidence = clamp_confidence(round2(raw_confidence));

    let assessment = ResonanceAssessment {
        audience: audience.to_string(),
        score,
        decision: Decision::from_score(score),
        confidence,
    };
    debug!(audience, base, audience_bias, ?assessment, "scored resonance");
    assessment
}

/// Score every audience, in input order.
pub fn score_audiences<S: AsRef<str> + Sync>(
    audiences: &[S],
    snapshot: &MediaSnapshot,
    bias: &AudienceBias,
) -> Vec<ResonanceAssessment> {
    audiences
        .par_iter()
        .map(|a| score_resonance(a.as_ref(), snapshot, bias))
        .collect()
}

/// Display order: lowest score first, ties by audience label.
pub fn worst_first(mut assessments: Vec<ResonanceAssessment>) -> Vec<ResonanceAssessment> {
    assessments.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.audience.cmp(&b.audience)));
    assessments
}
