//! Operator input files.
//!
//! Only the *outer* shape of these files is enforced (a readings file must be a
//! JSON array, an articles file a list of objects, ...). Errors here are the
//! operator's and carry exit code 2. Inside that shape, upstream data is taken
//! as-is and resolved by the core.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{AudienceBias, MediaSnapshot, RawArticle, RespondentReading};
use crate::error::AppError;
use crate::io::completion::reading_from_value;
use crate::verdict::ReviewerComment;

/// Read a file into a string with a descriptive error.
pub fn read_text(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))
}

/// Readings file: a JSON array with one entry per respondent (or a single
/// entry). Each entry may be any payload shape `reading_from_value` accepts.
pub fn parse_readings(text: &str) -> Result<Vec<RespondentReading>, AppError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::input(format!("Readings file is not valid JSON: {e}")))?;

    match value {
        Value::Array(entries) => Ok(entries.iter().map(reading_from_value).collect()),
        Value::Object(_) => Ok(vec![reading_from_value(&value)]),
        _ => Err(AppError::input(
            "Readings file must be a JSON array of respondent payloads.",
        )),
    }
}

pub fn load_readings(path: &Path) -> Result<Vec<RespondentReading>, AppError> {
    parse_readings(&read_text(path)?)
}

pub fn load_articles(path: &Path) -> Result<Vec<RawArticle>, AppError> {
    load_json(path, "articles")
}

pub fn load_snapshot(path: &Path) -> Result<MediaSnapshot, AppError> {
    load_json(path, "media snapshot")
}

pub fn load_reviews(path: &Path) -> Result<Vec<ReviewerComment>, AppError> {
    load_json(path, "reviewer comments")
}

/// Audience bias table: `{ "label": int, ... }`.
pub fn load_bias_table(path: &Path) -> Result<AudienceBias, AppError> {
    let table: HashMap<String, i32> = load_json(path, "audience bias table")?;
    Ok(AudienceBias::new(table))
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, AppError> {
    let text = read_text(path)?;
    parse_json(&text, what)
}

pub(crate) fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, AppError> {
    serde_json::from_str(text).map_err(|e| AppError::input(format!("Invalid {what} JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_array_with_mixed_shapes() {
        let text = r#"[
            {"9": -0.1, "8": -1.0},
            {"choices": [{"logprobs": {"top_logprobs": [{"5": -0.2}]}}]},
            "garbage"
        ]"#;
        let readings = parse_readings(text).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[1]["5"], -0.2);
        assert!(readings[2].is_empty());
    }

    #[test]
    fn single_object_is_one_reading() {
        assert_eq!(parse_readings(r#"{"3": -0.5}"#).unwrap().len(), 1);
    }

    #[test]
    fn non_json_readings_is_input_error() {
        let err = parse_readings("not json").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(parse_readings("42").unwrap_err().exit_code(), 2);
    }

    #[test]
    fn articles_default_missing_fields() {
        let articles: Vec<RawArticle> =
            parse_json(r#"[{"title": "A"}, {"title": "B", "published": "2025-01-01"}]"#, "articles").unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].published, "");
        assert_eq!(articles[1].url, "");
    }

    #[test]
    fn snapshot_defaults() {
        let snap: MediaSnapshot = parse_json(r#"{"topics": ["rent"], "volume": 12}"#, "snapshot").unwrap();
        assert_eq!(snap.sentiment, 0.0);
        assert_eq!(snap.volume, 12);
        assert!(snap.tone.is_empty());
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = read_text(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
