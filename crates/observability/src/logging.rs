//! Tracing subscriber configuration.
//!
//! The filter comes from `RUST_LOG` (default `info`); the output format from
//! `PLANBOARD_LOG_FORMAT` (`json`, the default, or `pretty`).

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const FILTER_VAR: &str = "RUST_LOG";
pub const FORMAT_VAR: &str = "PLANBOARD_LOG_FORMAT";
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservabilityError {
    #[error("unknown log format '{0}' (expected json or pretty)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self, ObservabilityError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ObservabilityError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter = lookup(FILTER_VAR)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let format = match lookup(FORMAT_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => LogFormat::default(),
        };

        Ok(Self { filter, format })
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

pub(crate) fn init(config: &ObservabilityConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    // A subscriber may already be installed (tests, embedding apps).
    let _ = match config.format {
        LogFormat::Json => builder.json().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ObservabilityConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ObservabilityConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn reads_filter_and_format() {
        let config = ObservabilityConfig::from_lookup(lookup(&[
            (FILTER_VAR, "planboard_infra=debug"),
            (FORMAT_VAR, " Pretty "),
        ]))
        .unwrap();
        assert_eq!(config.filter, "planboard_infra=debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = ObservabilityConfig::from_lookup(lookup(&[(FORMAT_VAR, "xml")])).unwrap_err();
        assert_eq!(err, ObservabilityError::UnknownFormat("xml".to_string()));
    }

    #[test]
    fn init_twice_is_a_no_op() {
        let config = ObservabilityConfig {
            filter: "not a [valid filter".to_string(),
            format: LogFormat::Pretty,
        };
        init(&config);
        init(&ObservabilityConfig::default());
        tracing::info!("still logging");
    }
}
