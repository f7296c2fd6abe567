//! Completion payloads → respondent readings.
//!
//! A reading is the top-k log-probabilities of the *last* token of the
//! respondent's reply (the rating digit). Three shapes are accepted:
//!
//! - a plain `{ "token": logprob, ... }` map
//! - a legacy completion: `choices[0].logprobs.top_logprobs[-1]` is such a map
//! - a chat completion: `choices[0].logprobs.content[-1].top_logprobs` is a
//!   list of `{ "token", "logprob" }`
//!
//! Malformed payloads become an empty reading; the normalizer turns that into
//! the "no data" distribution.

use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::RespondentReading;

/// Extract a reading from any supported payload shape.
pub fn reading_from_value(value: &Value) -> RespondentReading {
    let reading = if value.get("choices").is_some() {
        reading_from_completion(value)
    } else {
        value.as_object().map(reading_from_map)
    };

    reading.unwrap_or_else(|| {
        warn!("unrecognized respondent payload, treating as empty reading");
        RespondentReading::new()
    })
}

fn reading_from_completion(value: &Value) -> Option<RespondentReading> {
    let logprobs = value.pointer("/choices/0/logprobs")?;

    if let Some(content) = logprobs.get("content").and_then(Value::as_array) {
        let top = content.last()?.get("top_logprobs")?.as_array()?;
        return Some(
            top.iter()
                .filter_map(|entry| {
                    let token = entry.get("token")?.as_str()?;
                    let logprob = entry.get("logprob")?.as_f64()?;
                    Some((token.to_string(), logprob))
                })
                .collect(),
        );
    }

    let last = logprobs.get("top_logprobs")?.as_array()?.last()?;
    last.as_object().map(reading_from_map)
}

fn reading_from_map(map: &Map<String, Value>) -> RespondentReading {
    map.iter()
        .filter_map(|(token, lp)| lp.as_f64().map(|lp| (token.clone(), lp)))
        .collect()
}
