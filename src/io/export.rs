//! Export computed results as JSON.
//!
//! Meant for downstream persistence or rendering; the structure mirrors the
//! serialized domain types one-to-one.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Pretty-printed JSON for stdout.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::output(format!("Failed to serialize results: {e}")))
}

/// Write `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let body = to_json(value)?;
    let mut file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export '{}': {e}", path.display())))?;
    writeln!(file, "{body}")
        .map_err(|e| AppError::output(format!("Failed to write export '{}': {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SimulatedSample;

    #[test]
    fn round_trips_through_file() {
        let sample: SimulatedSample = [(9, 3u64), (10, 7)].into_iter().collect();
        let file = tempfile::NamedTempFile::new().unwrap();
        write_json(file.path(), &sample).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let back: SimulatedSample = serde_json::from_str(&text).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn unwritable_path_is_output_error() {
        let err = write_json(Path::new("/definitely/not/here/out.json"), &1).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
