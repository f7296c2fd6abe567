//! Shared pipelines used by every front-end command.
//!
//! Two independent branches:
//!
//! - panel: readings → per-respondent distributions → population → sample → NPS
//! - media: articles → ranked list → snapshot → per-audience resonance
//!
//! Both take the run's `PanelConfig` explicitly and never fail: missing data
//! resolves to the documented empty defaults.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{
    ArticleRecord, MediaSnapshot, PanelConfig, PopulationDistribution, RawArticle, RatingDistribution,
    RespondentReading, ResonanceAssessment, SimulatedSample,
};
use crate::media::{ArticleRanker, derive_topics, news_query, score_audiences, worst_first};
use crate::panel::{aggregate_distributions, draw_survey, net_promoter_score, normalize_logprobs, simulate_survey};

/// Topics derived from the message when none are given explicitly.
pub const DERIVED_TOPIC_LIMIT: usize = 5;

/// How the survey counts were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SurveyMode {
    Apportioned,
    Drawn { seed: u64 },
}

/// All computed outputs of a single panel scoring request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelReport {
    pub respondents: usize,
    /// Respondents whose reading carried at least one digit token.
    pub usable_respondents: usize,
    pub temperature: f64,
    pub sample_size: u64,
    pub mode: SurveyMode,
    pub population: PopulationDistribution,
    pub sample: SimulatedSample,
    pub nps: f64,
}

/// Score a panel of respondent readings.
pub fn run_panel(readings: &[RespondentReading], config: &PanelConfig) -> PanelReport {
    // Respondents are independent; normalize them in parallel.
    let distributions: Vec<RatingDistribution> = readings
        .par_iter()
        .map(|r| normalize_logprobs(r, config.temperature))
        .collect();
    let usable_respondents = distributions.iter().filter(|d| !d.is_empty()).count();

    let population = aggregate_distributions(&distributions);
    let mode = match config.draw_seed {
        Some(seed) => SurveyMode::Drawn { seed },
        None => SurveyMode::Apportioned,
    };

    let sample = if population.is_empty() {
        warn!(respondents = readings.len(), "no usable panel signal, reporting empty sample");
        SimulatedSample::zero()
    } else {
        match mode {
            SurveyMode::Apportioned => simulate_survey(&population, config.sample_size),
            SurveyMode::Drawn { seed } => draw_survey(&population, config.sample_size, seed),
        }
    };
    let nps = net_promoter_score(&sample);

    info!(
        respondents = readings.len(),
        usable_respondents,
        sample_size = config.sample_size,
        nps,
        "panel scored"
    );

    PanelReport {
        respondents: readings.len(),
        usable_respondents,
        temperature: config.temperature,
        sample_size: config.sample_size,
        mode,
        population,
        sample,
        nps,
    }
}

/// Inputs for the media branch.
#[derive(Debug, Clone)]
pub struct MediaRequest<'a> {
    /// The operator's message.
    pub text: &'a str,
    pub articles: &'a [RawArticle],
    /// Explicit topic keywords; derived from `text` when empty.
    pub topics: &'a [String],
    pub audiences: &'a [String],
    pub sentiment: f64,
    pub tone: &'a str,
    pub now: DateTime<Utc>,
}

/// All computed outputs of a news comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaReport {
    pub query: String,
    pub topics: Vec<String>,
    pub articles: Vec<ArticleRecord>,
    pub snapshot: MediaSnapshot,
    /// Worst first.
    pub assessments: Vec<ResonanceAssessment>,
}

/// Rank the articles and score every audience against the resulting snapshot.
pub fn run_media(request: &MediaRequest<'_>, config: &PanelConfig) -> MediaReport {
    let topics = if request.topics.is_empty() {
        derive_topics(request.text, DERIVED_TOPIC_LIMIT)
    } else {
        request.topics.to_vec()
    };

    let articles = ArticleRanker::new(&topics)
        .with_horizon_days(config.horizon_days)
        .rank(request.articles, request.now);
    let snapshot = MediaSnapshot::from_ranked(topics.clone(), &articles, request.sentiment, request.tone);
    let assessments = run_resonance(request.audiences, &snapshot, config);

    info!(
        topics = topics.len(),
        articles = articles.len(),
        audiences = assessments.len(),
        "media compared"
    );

    MediaReport {
        query: news_query(request.text),
        topics,
        articles,
        snapshot,
        assessments,
    }
}

/// Score audiences against a snapshot, worst first.
pub fn run_resonance(audiences: &[String], snapshot: &MediaSnapshot, config: &PanelConfig) -> Vec<ResonanceAssessment> {
    worst_first(score_audiences(audiences, snapshot, &config.audience_bias))
}
