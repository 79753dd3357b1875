//! Tracing subscriber initialisation.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt as subscriber_fmt, EnvFilter};

use crate::config;

// Crates whose events are shown when no override filter is configured.
const MODULE_WHITELIST: &[&str] = &["soli_graph", "tower_http"];

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub enum LogLevel {
    /// The "off" level.
    #[serde(rename = "off")]
    Off,
    /// The "trace" level.
    #[serde(rename = "trace")]
    Trace,
    /// The "debug" level.
    #[serde(rename = "debug")]
    Debug,
    /// The "info" level.
    #[serde(rename = "info")]
    #[default]
    Info,
    /// The "warn" level.
    #[serde(rename = "warn")]
    Warn,
    /// The "error" level.
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub enum Format {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// Builds the filter used by [`init`].
///
/// `RUST_LOG` wins when set, then `override_filter`, then the configured
/// level applied to this crate and the HTTP tracing layer.
#[must_use]
pub fn env_filter(config: &config::Logger) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directives = config.override_filter.clone().unwrap_or_else(|| {
        MODULE_WHITELIST
            .iter()
            .map(|module| format!("{module}={}", config.level))
            .collect::<Vec<_>>()
            .join(",")
    });
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
}

/// Installs the global subscriber.
///
/// Calling it again, or after another subscriber was installed, is a no-op.
pub fn init(config: &config::Logger) {
    if !config.enable {
        return;
    }

    let builder = subscriber_fmt().with_env_filter(env_filter(config));
    let result = match config.format {
        Format::Compact => builder.compact().with_ansi(true).try_init(),
        Format::Pretty => builder.pretty().with_ansi(true).try_init(),
        Format::Json => builder.json().with_ansi(false).try_init(),
    };
    if result.is_ok() {
        tracing::debug!(level = %config.level, format = ?config.format, "logger_initialized");
    }
}
