//! Time-filtered, relevance-ordered article ranking.
//!
//! Relevance is a literal keyword count over the title; recency is the fraction
//! of the look-back window elapsed at publication. Articles dated before the
//! horizon are dropped outright. Undated articles are kept with no bonus.
//!
//! The ordering is fully deterministic: total score descending, then the raw
//! `published` string ascending, then title ascending.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::domain::{ArticleRecord, RawArticle};

pub const DEFAULT_HORIZON_DAYS: i64 = 14;
pub const MAX_HORIZON_DAYS: i64 = 36_500;

/// Timestamp formats tried in order before the ISO-8601 fallback.
///
/// The first is what the news-search collaborator emits
/// (`Mon, 07 Oct 2024 12:00:00 GMT`).
pub const ACCEPTED_FORMATS: [&str; 6] = [
    "%a, %d %b %Y %H:%M:%S GMT",
    "%a, %d %b %Y %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y",
];

#[derive(Debug, Clone)]
pub struct ArticleRanker {
    /// Lowercased, non-empty keywords, most important first.
    keywords: Vec<String>,
    horizon: Duration,
}

impl ArticleRanker {
    pub fn new<S: AsRef<str>>(topics: &[S]) -> Self {
        let keywords = topics
            .iter()
            .map(|t| t.as_ref().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            keywords,
            horizon: Duration::days(DEFAULT_HORIZON_DAYS),
        }
    }

    /// Override the look-back window (held to `1..=MAX_HORIZON_DAYS`).
    pub fn with_horizon_days(mut self, days: i64) -> Self {
        self.horizon = Duration::days(days.clamp(1, MAX_HORIZON_DAYS));
        self
    }

    /// Rank `articles` as of `now`.
    pub fn rank(&self, articles: &[RawArticle], now: DateTime<Utc>) -> Vec<ArticleRecord> {
        let horizon = now - self.horizon;
        let window_ms = self.horizon.num_milliseconds() as f64;

        let mut dropped = 0usize;
        let mut ranked: Vec<ArticleRecord> = Vec::with_capacity(articles.len());
        for article in articles {
            let recency_bonus = match parse_published(&article.published) {
                Some(ts) if ts < horizon => {
                    dropped += 1;
                    continue;
                }
                Some(ts) => ((ts - horizon).num_milliseconds() as f64 / window_ms).clamp(0.0, 1.0),
                None => 0.0,
            };

            ranked.push(ArticleRecord {
                title: article.title.clone(),
                publisher: article.publisher.clone(),
                published: article.published.clone(),
                url: article.url.clone(),
                relevance_score: self.relevance(&article.title),
                recency_bonus,
            });
        }

        ranked.sort_by(|a, b| {
            b.total_score()
                .total_cmp(&a.total_score())
                .then_with(|| a.published.cmp(&b.published))
                .then_with(|| a.title.cmp(&b.title))
        });

        debug!(
            input = articles.len(),
            kept = ranked.len(),
            dropped,
            %horizon,
            "ranked articles"
        );
        ranked
    }

    /// Number of keywords occurring (case-insensitively) in `title`.
    pub fn relevance(&self, title: &str) -> u32 {
        let title = title.to_lowercase();
        self.keywords.iter().filter(|k| title.contains(k.as_str())).count() as u32
    }
}

/// Parse a `published` value; `None` means "unknown date".
///
/// Naive timestamps are taken as UTC; a bare date means midnight UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| parse_with_format(raw, fmt))
        .or_else(|| parse_iso8601(raw))
}

fn parse_with_format(raw: &str, fmt: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}
