//! Formatted terminal output.
//!
//! We keep formatting code in one place so the scoring code stays clean and
//! output changes are localized.

use crate::app::pipeline::{MediaReport, PanelReport, SurveyMode};
use crate::domain::{ArticleRecord, ResonanceAssessment, Verdict};
use crate::verdict::ReviewSummary;

/// Distribution, sample and NPS for a panel run.
pub fn format_panel_report(report: &PanelReport) -> String {
    let mut out = String::new();

    out.push_str("=== panel - Synthetic Panel NPS ===\n");
    out.push_str(&format!(
        "Respondents: {} ({} usable) | temperature={:.2}\n",
        report.respondents, report.usable_respondents, report.temperature
    ));
    let mode = match report.mode {
        SurveyMode::Apportioned => "apportioned".to_string(),
        SurveyMode::Drawn { seed } => format!("drawn (seed {seed})"),
    };
    out.push_str(&format!("Sample: n={} | {mode}\n\n", report.sample_size));

    out.push_str(&format!("{:>6} {:>10} {:>8}\n", "rating", "p", "count"));
    out.push_str(&format!("{:-<6} {:-<10} {:-<8}\n", "", "", ""));
    for (rating, p) in report.population.iter() {
        out.push_str(&format!(
            "{:>6} {:>10.4} {:>8}\n",
            rating,
            p,
            report.sample.get(rating)
        ));
    }

    out.push_str(&format!("\nNPS: {:+.1}\n", report.nps));
    out
}

/// Ranked articles, truncated to `top` with a note about the rest.
pub fn format_articles(articles: &[ArticleRecord], top: usize) -> String {
    let mut out = String::new();
    if articles.is_empty() {
        out.push_str("No related articles within the recency window.\n");
        return out;
    }

    out.push_str(
        format!(
            "{:<4} {:<48} {:<16} {:>5} {:>7}\n",
            "#", "title", "publisher", "hits", "recency"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<4} {:-<48} {:-<16} {:-<5} {:-<7}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for (i, a) in articles.iter().take(top).enumerate() {
        out.push_str(
            format!(
                "{:<4} {:<48} {:<16} {:>5} {:>7.3}\n",
                i + 1,
                truncate(&a.title, 48),
                truncate(&a.publisher, 16),
                a.relevance_score,
                a.recency_bonus
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if articles.len() > top {
        out.push_str(&format!("(+{} more)\n", articles.len() - top));
    }
    out
}

/// Per-audience assessments in the order given (callers pass worst first).
pub fn format_assessments(assessments: &[ResonanceAssessment]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<24} {:>5} {:<6} {:>10}\n", "audience", "score", "call", "confidence").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<5} {:-<6} {:-<10}\n", "", "", "", "").trim_end());
    out.push('\n');
    for a in assessments {
        out.push_str(&format!(
            "{:<24} {:>5} {:<6} {:>10.2}\n",
            truncate(&a.audience, 24),
            a.score,
            a.decision.label(),
            a.confidence
        ));
    }
    out
}

pub fn format_media_report(report: &MediaReport, top: usize) -> String {
    let mut out = String::new();
    out.push_str("=== panel - News Comparison ===\n");
    if !report.query.is_empty() {
        out.push_str(&format!("Query: {}\n", report.query));
    }
    out.push_str(&format!("Topics: {}\n\n", report.topics.join(", ")));
    out.push_str(&format_articles(&report.articles, top));
    if !report.assessments.is_empty() {
        out.push('\n');
        out.push_str(&format_assessments(&report.assessments));
    }
    out
}

pub fn format_verdict(verdict: &Verdict) -> String {
    let mut out = format!(
        "score={} decision={} confidence={:.2}\n",
        verdict.score,
        verdict.decision.label(),
        verdict.confidence
    );
    if !verdict.reason.is_empty() {
        out.push_str(&format!("reason: {}\n", verdict.reason));
    }
    out
}

pub fn format_reviews(summary: &ReviewSummary) -> String {
    let mut out = String::new();
    for c in &summary.comments {
        let score = c.score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:<24} {:>3}\n", truncate(&c.name, 24), score));
    }
    match summary.average {
        Some(avg) => out.push_str(&format!("\nAverage: {avg:.2}\n")),
        None => out.push_str("\nAverage: n/a\n"),
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, RatingDistribution, SimulatedSample};

    fn article(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            publisher: "Wire".to_string(),
            published: String::new(),
            url: String::new(),
            relevance_score: 1,
            recency_bonus: 0.25,
        }
    }

    #[test]
    fn panel_report_lists_every_rating() {
        let report = PanelReport {
            respondents: 2,
            usable_respondents: 1,
            temperature: 1.5,
            sample_size: 4,
            mode: SurveyMode::Apportioned,
            population: RatingDistribution::from_probabilities([(10, 1.0)]),
            sample: [(10, 4u64)].into_iter().collect::<SimulatedSample>(),
            nps: 100.0,
        };
        let text = format_panel_report(&report);
        assert!(text.contains("NPS: +100.0"));
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with(char::is_numeric)).count(), 10);
    }

    #[test]
    fn articles_truncate_with_more_note() {
        let articles: Vec<_> = ["a", "b", "c", "d"].into_iter().map(article).collect();
        let text = format_articles(&articles, 3);
        assert!(text.contains("(+1 more)"));
        assert!(!text.contains(" d "));
        assert!(format_articles(&[], 3).contains("No related articles"));
    }

    #[test]
    fn verdict_line() {
        let v = Verdict {
            score: 55,
            decision: Decision::Tweak,
            confidence: 0.64,
            reason: String::new(),
        };
        assert_eq!(format_verdict(&v), "score=55 decision=TWEAK confidence=0.64\n");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
