//! Scores embedded in free-text reviewer comments.
//!
//! Persona reviewers answer in prose and are asked to include one `0-10`
//! rating somewhere in it. We pull the first standalone number out and average
//! what we find across the panel.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static RE_SCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(10|[0-9])\b").unwrap());

/// One reviewer's reaction to the submitted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerComment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredComment {
    pub name: String,
    pub text: String,
    pub score: Option<u8>,
}

/// Panel-level roll-up of reviewer comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub comments: Vec<ScoredComment>,
    /// Mean of the present scores, rounded to 2 decimals; `None` if no
    /// reviewer gave one.
    pub average: Option<f64>,
}

/// First standalone integer in `0..=10` within `text`.
pub fn extract_score(text: &str) -> Option<u8> {
    RE_SCORE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn summarize_reviews(comments: &[ReviewerComment]) -> ReviewSummary {
    let comments: Vec<ScoredComment> = comments
        .iter()
        .map(|c| ScoredComment {
            name: c.name.clone(),
            text: c.text.clone(),
            score: extract_score(&c.text),
        })
        .collect();

    let scores: Vec<f64> = comments.iter().filter_map(|c| c.score).map(f64::from).collect();
    let average = (!scores.is_empty())
        .then(|| round2(scores.iter().sum::<f64>() / scores.len() as f64));

    debug!(reviewers = comments.len(), scored = scores.len(), ?average, "summarized reviews");
    ReviewSummary { comments, average }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
