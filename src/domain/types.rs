//! Shared domain types.
//!
//! Everything here is a value object: built by one computation step, never
//! mutated afterwards, and serializable so the caller can render or persist it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

/// Lowest rating on the panel scale (raw digit `0` shifted by +1).
pub const MIN_RATING: u8 = 1;
/// Highest rating on the panel scale (raw digit `9` shifted by +1).
pub const MAX_RATING: u8 = 10;

/// NPS promoter threshold (inclusive).
pub const PROMOTER_MIN: u8 = 9;
/// NPS detractor threshold (inclusive).
pub const DETRACTOR_MAX: u8 = 6;

/// One simulated panelist's answer: token → natural-log probability.
///
/// Produced by an external completion call; never persisted.
pub type RespondentReading = HashMap<String, f64>;

/// Probability per rating on the `1..=10` scale.
///
/// Invariant: either the values sum to 1.0 (within floating tolerance) or every
/// value is zero, which is the explicit "no usable signal" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingDistribution {
    probs: BTreeMap<u8, f64>,
}

/// Same shape as [`RatingDistribution`]; owned by the aggregation step.
pub type PopulationDistribution = RatingDistribution;

impl RatingDistribution {
    /// The all-zero "no data" distribution.
    pub fn zero() -> Self {
        Self {
            probs: (MIN_RATING..=MAX_RATING).map(|r| (r, 0.0)).collect(),
        }
    }

    /// Build from per-rating values, zero-filling missing ratings.
    ///
    /// Values outside `1..=10` are ignored. The caller is responsible for the
    /// sum-to-one invariant.
    pub fn from_probabilities(values: impl IntoIterator<Item = (u8, f64)>) -> Self {
        let mut out = Self::zero();
        for (rating, p) in values {
            if let Some(slot) = out.probs.get_mut(&rating) {
                *slot = p;
            }
        }
        out
    }

    pub fn get(&self, rating: u8) -> f64 {
        self.probs.get(&rating).copied().unwrap_or(0.0)
    }

    /// Iterate `(rating, probability)` in ascending rating order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.probs.iter().map(|(r, p)| (*r, *p))
    }

    pub fn total(&self) -> f64 {
        self.probs.values().sum()
    }

    /// True for the explicit "no usable signal" state.
    pub fn is_empty(&self) -> bool {
        self.probs.values().all(|p| *p == 0.0)
    }

    /// Rating with the highest probability (ties go to the smaller rating).
    pub fn peak(&self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let mut best: Option<(u8, f64)> = None;
        for (rating, p) in self.iter() {
            match best {
                Some((_, bp)) if p <= bp => {}
                _ => best = Some((rating, p)),
            }
        }
        best.map(|(r, _)| r)
    }
}

impl Default for RatingDistribution {
    fn default() -> Self {
        Self::zero()
    }
}

/// Integer response counts per rating.
///
/// Invariant (when produced by the survey simulator): counts sum exactly to the
/// requested sample size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulatedSample {
    counts: BTreeMap<u8, u64>,
}

impl SimulatedSample {
    pub fn new(counts: BTreeMap<u8, u64>) -> Self {
        Self { counts }
    }

    /// All ratings of the panel scale mapped to zero.
    pub fn zero() -> Self {
        Self {
            counts: (MIN_RATING..=MAX_RATING).map(|r| (r, 0)).collect(),
        }
    }

    pub fn get(&self, rating: u8) -> u64 {
        self.counts.get(&rating).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(r, c)| (*r, *c))
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl FromIterator<(u8, u64)> for SimulatedSample {
    fn from_iter<T: IntoIterator<Item = (u8, u64)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// An article as delivered by the news-search collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "publisher_name")]
    pub publisher: String,
    /// Free-form timestamp; may be empty or unparseable.
    #[serde(default, alias = "published date")]
    pub published: String,
    #[serde(default)]
    pub url: String,
}

/// News search results sometimes nest the publisher as `{ "title": ... }`.
fn publisher_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Publisher {
        Name(String),
        Nested {
            #[serde(default)]
            title: String,
        },
        Missing(Option<()>),
    }

    Ok(match Publisher::deserialize(deserializer)? {
        Publisher::Name(name) => name,
        Publisher::Nested { title } => title,
        Publisher::Missing(_) => String::new(),
    })
}

/// A ranked article with its derived scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub publisher: String,
    pub published: String,
    pub url: String,
    /// Number of topic keywords found in the title.
    pub relevance_score: u32,
    /// Fraction of the recency window elapsed at publication, in `[0, 1]`.
    pub recency_bonus: f64,
}

impl ArticleRecord {
    pub fn total_score(&self) -> f64 {
        f64::from(self.relevance_score) + self.recency_bonus
    }
}

/// Media climate around a message: the evidence the resonance heuristic uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSnapshot {
    /// Topic keywords, most important first.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Expected in `[-0.2, 0.2]`.
    #[serde(default)]
    pub sentiment: f64,
    /// Number of related articles.
    #[serde(default)]
    pub volume: u32,
    #[serde(default)]
    pub tone: String,
}

/// Launch recommendation for a message/audience pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "TWEAK")]
    Tweak,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl Decision {
    pub const GO_MIN_SCORE: u8 = 70;
    pub const TWEAK_MIN_SCORE: u8 = 50;

    /// Derive the decision from a `0..=100` score.
    pub fn from_score(score: u8) -> Self {
        if score >= Self::GO_MIN_SCORE {
            Decision::Go
        } else if score >= Self::TWEAK_MIN_SCORE {
            Decision::Tweak
        } else {
            Decision::NoGo
        }
    }

    /// Parse an upstream label (case and surrounding whitespace are ignored).
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase().replace('_', "-");
        match label.as_str() {
            "GO" => Some(Decision::Go),
            "TWEAK" => Some(Decision::Tweak),
            "NO-GO" => Some(Decision::NoGo),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::Go => "GO",
            Decision::Tweak => "TWEAK",
            Decision::NoGo => "NO-GO",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Heuristic resonance of a message with one target audience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceAssessment {
    pub audience: String,
    /// `0..=100`.
    pub score: u8,
    pub decision: Decision,
    /// `[0.5, 0.98]`.
    pub confidence: f64,
}

/// A scoring response from an external reviewer after coercion and clamping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub score: u8,
    pub decision: Decision,
    pub confidence: f64,
    pub reason: String,
}

/// Operator-configured integer bias per audience label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudienceBias {
    table: HashMap<String, i32>,
}

impl AudienceBias {
    pub fn new(table: HashMap<String, i32>) -> Self {
        Self {
            table: table
                .into_iter()
                .map(|(label, bias)| (label.trim().to_string(), bias))
                .collect(),
        }
    }

    /// Bias for `label`; unknown labels get 0.
    pub fn get(&self, label: &str) -> i32 {
        self.table.get(label.trim()).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A full run's configuration: the context object threaded through every
/// pipeline call.
///
/// Derived from environment variables, then overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Temperature applied to log-probabilities before exponentiating (> 0).
    pub temperature: f64,
    /// Number of simulated survey responses.
    pub sample_size: u64,
    /// Articles published before `now - horizon_days` are dropped.
    pub horizon_days: i64,
    pub audience_bias: AudienceBias,
    /// When set, responses are drawn at random with this seed instead of
    /// being apportioned deterministically.
    pub draw_seed: Option<u64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            temperature: 1.5,
            sample_size: 1000,
            horizon_days: 14,
            audience_bias: AudienceBias::default(),
            draw_seed: None,
        }
    }
}
