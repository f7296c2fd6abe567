//! Run configuration from the environment (`.env` supported).
//!
//! | variable              | default | meaning                                  |
//! |-----------------------|---------|------------------------------------------|
//! | `PANEL_TEMPERATURE`   | 1.5     | log-probability temperature (> 0)        |
//! | `PANEL_SAMPLE_SIZE`   | 1000    | simulated survey responses               |
//! | `PANEL_HORIZON_DAYS`  | 14      | article look-back window (>= 1)          |
//! | `PANEL_BIAS_FILE`     | unset   | JSON audience bias table                 |
//! | `PANEL_DRAW_SEED`     | unset   | draw responses at random with this seed  |
//!
//! CLI flags override these (see `app`).

use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::domain::PanelConfig;
use crate::error::AppError;
use crate::io::load_bias_table;

impl PanelConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = PanelConfig::default();

        if let Some(t) = parse_var(&lookup, "PANEL_TEMPERATURE")? {
            config.temperature = t;
        }
        if let Some(n) = parse_var(&lookup, "PANEL_SAMPLE_SIZE")? {
            config.sample_size = n;
        }
        if let Some(days) = parse_var(&lookup, "PANEL_HORIZON_DAYS")? {
            config.horizon_days = days;
        }
        if let Some(seed) = parse_var(&lookup, "PANEL_DRAW_SEED")? {
            config.draw_seed = Some(seed);
        }
        if let Some(path) = lookup("PANEL_BIAS_FILE").filter(|p| !p.trim().is_empty()) {
            config.audience_bias = load_bias_table(Path::new(path.trim()))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(AppError::input(format!(
                "Invalid temperature {} (must be finite and > 0).",
                self.temperature
            )));
        }
        if self.horizon_days < 1 {
            return Err(AppError::input(format!(
                "Invalid horizon {} days (must be >= 1).",
                self.horizon_days
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| AppError::input(format!("Invalid {key}='{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = PanelConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.temperature, 1.5);
        assert_eq!(config.sample_size, 1000);
        assert_eq!(config.horizon_days, 14);
        assert!(config.audience_bias.is_empty());
        assert_eq!(config.draw_seed, None);
    }

    #[test]
    fn reads_overrides() {
        let config = PanelConfig::from_lookup(lookup(&[
            ("PANEL_TEMPERATURE", "0.8"),
            ("PANEL_SAMPLE_SIZE", " 250 "),
            ("PANEL_HORIZON_DAYS", "7"),
            ("PANEL_DRAW_SEED", "42"),
            ("PANEL_BIAS_FILE", ""),
        ]))
        .unwrap();
        assert_eq!(config.temperature, 0.8);
        assert_eq!(config.sample_size, 250);
        assert_eq!(config.horizon_days, 7);
        assert_eq!(config.draw_seed, Some(42));
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            ("PANEL_TEMPERATURE", "0"),
            ("PANEL_TEMPERATURE", "warm"),
            ("PANEL_SAMPLE_SIZE", "-5"),
            ("PANEL_HORIZON_DAYS", "0"),
        ] {
            let err = PanelConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{key}={value}");
        }
    }

    #[test]
    fn missing_bias_file_is_input_error() {
        let err = PanelConfig::from_lookup(lookup(&[("PANEL_BIAS_FILE", "/no/such/bias.json")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
