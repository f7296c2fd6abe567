//! Coercion and clamping for externally produced scores.
//!
//! Every code path that consumes a score, confidence or decision it did not
//! compute itself goes through here, so the fallbacks live in one place:
//!
//! - score: integer, default 60, clamped to `[0, 100]`
//! - confidence: float, percentages rescaled, default 0.64, clamped to `[0.5, 0.98]`
//! - decision: one of GO / TWEAK / NO-GO, else derived from the score

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Decision, Verdict};

pub const DEFAULT_SCORE: u8 = 60;
pub const DEFAULT_CONFIDENCE: f64 = 0.64;
pub const MIN_CONFIDENCE: f64 = 0.5;
pub const MAX_CONFIDENCE: f64 = 0.98;

/// Coerce an upstream score to `0..=100`.
///
/// Floats are truncated; strings must hold an integer.
pub fn coerce_score(value: Option<&Value>) -> u8 {
    let raw = match value {
        // `as` saturates, so huge floats still clamp to 100 below.
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match raw {
        Some(score) => score.clamp(0, 100) as u8,
        None => {
            warn!(?value, "unusable score, using default");
            DEFAULT_SCORE
        }
    }
}

/// Coerce an upstream confidence to `[0.5, 0.98]`.
///
/// Values in `(1, 100]` are read as percentages.
pub fn coerce_confidence(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw.filter(|c| !c.is_nan()) {
        Some(c) if c > 1.0 && c <= 100.0 => clamp_confidence(c / 100.0),
        Some(c) => clamp_confidence(c),
        None => {
            warn!(?value, "unusable confidence, using default");
            DEFAULT_CONFIDENCE
        }
    }
}

/// Clamp an already numeric confidence into the reported domain.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return DEFAULT_CONFIDENCE;
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Accept a known decision label, otherwise derive one from `score`.
pub fn resolve_decision(value: Option<&Value>, score: u8) -> Decision {
    match value.and_then(Value::as_str).and_then(Decision::parse) {
        Some(decision) => decision,
        None => {
            let derived = Decision::from_score(score);
            debug!(?value, score, %derived, "decision derived from score");
            derived
        }
    }
}

/// Normalize a decoded scoring object `{score, decision, confidence, reason}`.
pub fn normalize_verdict(value: &Value) -> Verdict {
    let score = coerce_score(value.get("score"));
    let confidence = coerce_confidence(value.get("confidence"));
    let decision = resolve_decision(value.get("decision"), score);
    let reason = match value.get("reason") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Verdict {
        score,
        decision,
        confidence,
        reason,
    }
}

/// Normalize a raw scoring response as returned by the reviewer.
///
/// Code fences and surrounding prose are tolerated; anything undecodable
/// yields the all-default verdict.
pub fn parse_verdict(raw: &str) -> Verdict {
    let decoded = extract_json_object(raw).and_then(|body| serde_json::from_str::<Value>(body).ok());
    match decoded {
        Some(value) if value.is_object() => normalize_verdict(&value),
        _ => {
            warn!(len = raw.len(), "undecodable scoring response, using defaults");
            normalize_verdict(&Value::Null)
        }
    }
}

/// Strip markdown code fences from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// The outermost `{ ... }` span of a response, if any.
fn extract_json_object(raw: &str) -> Option<&str> {
    let body = strip_code_blocks(raw);
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (end > start).then(|| &body[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn score_coercion() {
        assert_eq!(coerce_score(Some(&json!(72))), 72);
        assert_eq!(coerce_score(Some(&json!(72.9))), 72);
        assert_eq!(coerce_score(Some(&json!(" 85 "))), 85);
        assert_eq!(coerce_score(Some(&json!(140))), 100);
        assert_eq!(coerce_score(Some(&json!(-3))), 0);
        assert_eq!(coerce_score(Some(&json!("high"))), DEFAULT_SCORE);
        assert_eq!(coerce_score(Some(&json!("72.5"))), DEFAULT_SCORE);
        assert_eq!(coerce_score(Some(&json!(null))), DEFAULT_SCORE);
        assert_eq!(coerce_score(None), DEFAULT_SCORE);
    }

    #[test]
    fn confidence_coercion() {
        assert!((coerce_confidence(Some(&json!(0.8))) - 0.8).abs() < 1e-12);
        assert!((coerce_confidence(Some(&json!(80))) - 0.8).abs() < 1e-12);
        assert!((coerce_confidence(Some(&json!("75%"))) - 0.75).abs() < 1e-12);
        assert_eq!(coerce_confidence(Some(&json!(0.1))), MIN_CONFIDENCE);
        assert_eq!(coerce_confidence(Some(&json!(1.0))), MAX_CONFIDENCE);
        assert_eq!(coerce_confidence(Some(&json!(250))), MAX_CONFIDENCE);
        assert_eq!(coerce_confidence(Some(&json!(-4))), MIN_CONFIDENCE);
        assert_eq!(coerce_confidence(Some(&json!("NaN"))), DEFAULT_CONFIDENCE);
        assert_eq!(coerce_confidence(Some(&json!("sure"))), DEFAULT_CONFIDENCE);
        assert_eq!(coerce_confidence(None), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn decision_falls_back_to_score() {
        assert_eq!(resolve_decision(Some(&json!("go")), 10), Decision::Go);
        assert_eq!(resolve_decision(Some(&json!("LAUNCH")), 75), Decision::Go);
        assert_eq!(resolve_decision(Some(&json!(1)), 55), Decision::Tweak);
        assert_eq!(resolve_decision(None, 20), Decision::NoGo);
    }

    #[test]
    fn parses_fenced_response() {
        let raw = "Here you go:\n```json\n{\"score\": \"81\", \"decision\": \"GO\", \"confidence\": 90, \"reason\": \" fits \"}\n```";
        let v = parse_verdict(raw);
        assert_eq!(v.score, 81);
        assert_eq!(v.decision, Decision::Go);
        assert!((v.confidence - 0.9).abs() < 1e-12);
        assert_eq!(v.reason, "fits");
    }

    #[test]
    fn garbage_response_is_all_default() {
        let v = parse_verdict("the model timed out");
        assert_eq!(v.score, DEFAULT_SCORE);
        assert_eq!(v.decision, Decision::Tweak);
        assert_eq!(v.confidence, DEFAULT_CONFIDENCE);
        assert!(v.reason.is_empty());

        assert_eq!(parse_verdict("{not json}"), v);
        assert_eq!(parse_verdict(""), v);
        assert_eq!(parse_verdict("[1, 2]"), v);
    }

    #[test]
    fn decision_always_consistent_with_missing_label() {
        for score in [0, 49, 50, 69, 70, 100] {
            let v = normalize_verdict(&json!({ "score": score }));
            assert_eq!(v.decision, Decision::from_score(score));
        }
    }

    #[test]
    fn strip_code_blocks_variants() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("{}"), "{}");
    }
}
