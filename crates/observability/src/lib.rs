//! Logging setup shared by every planboard binary and test harness.

pub mod logging;

pub use logging::{LogFormat, ObservabilityConfig, ObservabilityError, FORMAT_VAR};

/// Install the process-wide subscriber described by `config`.
///
/// Safe to call multiple times; only the first call installs anything.
pub fn init(config: &ObservabilityConfig) {
    logging::init(config);
}

/// [`init`] with configuration read from the environment.
///
/// An unreadable configuration falls back to the defaults.
pub fn init_from_env() {
    let config = ObservabilityConfig::from_env().unwrap_or_else(|err| {
        eprintln!("planboard-observability: {err}; using defaults");
        ObservabilityConfig::default()
    });
    init(&config);
}
