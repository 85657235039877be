//! Tracing setup for the `mgmt-introspect` binary

mod lazy_file_writer;

use std::path::Path;
use std::str::FromStr;

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use lazy_file_writer::LazyFileWriter;

use crate::error::{Error, Result};

/// Drops events from HTTP internals
#[derive(Debug, Clone, Copy)]
pub struct NoiseFilter;

impl NoiseFilter {
    const NOISY_TARGETS: [&str; 5] = ["reqwest", "hyper", "h2", "rustls", "want"];

    fn is_noise(target: &str) -> bool {
        Self::NOISY_TARGETS.iter().any(|noisy| {
            target
                .strip_prefix(noisy)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::") || rest.starts_with('_'))
        })
    }
}

impl<S: Subscriber> Layer<S> for NoiseFilter {
    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        !Self::is_noise(metadata.target())
    }
}

/// Verbosity selectable on the command line
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    #[default]
    Warn,
    /// Progress per target
    Info,
    /// Progress per request
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// The level name as used in filter directives
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Filter for this level; `RUST_LOG` wins when set
    pub fn env_filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.as_str()))
    }
}

/// Parse a level name, for `clap`
pub fn parse_level(text: &str) -> core::result::Result<TracingLevel, String> {
    TracingLevel::from_str(text).map_err(|_| {
        format!("Invalid tracing level '{text}'. Valid levels are: error, warn, info, debug, trace")
    })
}

/// Install the global subscriber, writing to stderr or to `log_file`
pub fn init_tracing(level: TracingLevel, log_file: Option<&Path>) -> Result<()> {
    let registry = Registry::default().with(NoiseFilter).with(level.env_filter());

    let installed = match log_file {
        Some(path) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(LazyFileWriter::new(path.to_path_buf()))
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        None => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
    };

    installed.map_err(|e| {
        error_stack::Report::new(Error::invalid_config("tracing subscriber", e))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!(parse_level("debug"), Ok(TracingLevel::Debug));
        assert_eq!(parse_level("WARN"), Ok(TracingLevel::Warn));
        assert!(parse_level("verbose").is_err());
        assert_eq!(TracingLevel::default().as_str(), "warn");
        assert_eq!(TracingLevel::Trace.to_string(), "trace");
    }

    #[test]
    fn test_noise_targets() {
        assert!(NoiseFilter::is_noise("hyper_util::client::legacy"));
        assert!(NoiseFilter::is_noise("reqwest::connect"));
        assert!(NoiseFilter::is_noise("h2"));
        assert!(!NoiseFilter::is_noise("mgmt_model::schema::introspector"));
        assert!(!NoiseFilter::is_noise("h2o"));
    }
}
