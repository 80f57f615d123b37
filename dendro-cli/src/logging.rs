//! Diagnostics for the `dendro` binary.
//!
//! The record stream owns `stdout`, so every diagnostic goes to `stderr`.
//! `DENDRO_LOG_FORMAT` picks between plain lines and JSON objects and
//! `RUST_LOG` picks the verbosity; without it only warnings and errors are
//! shown. Records from crates that still use the `log` facade are forwarded
//! into `tracing`.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt::format::FmtSpan, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Variable selecting the diagnostic format.
pub const LOG_FORMAT_VAR: &str = "DENDRO_LOG_FORMAT";

/// Filter applied when `RUST_LOG` is unset or unparsable.
const FALLBACK_DIRECTIVE: &str = "warn";

static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Failures while setting up diagnostics.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `DENDRO_LOG_FORMAT` held bytes that are not UTF-8.
    #[error("`DENDRO_LOG_FORMAT` is not valid UTF-8")]
    FormatNotUnicode {
        /// Error reported by the environment lookup.
        #[source]
        source: env::VarError,
    },
    /// `DENDRO_LOG_FORMAT` named a format this binary does not emit.
    #[error("`DENDRO_LOG_FORMAT={value}` is not supported; use `human` or `json`")]
    UnknownFormat {
        /// Normalised value that was rejected.
        value: String,
    },
}

/// Shape of each diagnostic line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain text for terminals.
    #[default]
    Human,
    /// One JSON object per event, with the enclosing span list.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnknownFormat { value }),
        }
    }
}

impl LogFormat {
    /// Interprets the outcome of looking up [`LOG_FORMAT_VAR`].
    ///
    /// # Errors
    /// Returns [`LoggingError::FormatNotUnicode`] or
    /// [`LoggingError::UnknownFormat`] for values that cannot be used.
    pub fn from_lookup(lookup: Result<String, env::VarError>) -> Result<Self, LoggingError> {
        match lookup {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source) => Err(LoggingError::FormatNotUnicode { source }),
        }
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE);
        match self {
            Self::Human => base.boxed(),
            Self::Json => base
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        }
    }
}

/// Installs the process-wide subscriber once.
///
/// Later calls return the format chosen by the first. When some other
/// subscriber already owns the global slot it is left in place.
///
/// # Errors
/// Returns [`LoggingError`] when `DENDRO_LOG_FORMAT` cannot be used.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = INSTALLED.get() {
        return Ok(*format);
    }
    let format = LogFormat::from_lookup(env::var(LOG_FORMAT_VAR))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE));

    // The `log` bridge is optional; a host may have claimed it.
    let _ = LogTracer::init();
    if let Err(err) = tracing_subscriber::registry()
        .with(format.layer())
        .with(filter)
        .try_init()
    {
        tracing::debug!(error = %err, "keeping existing subscriber");
    }
    Ok(*INSTALLED.get_or_init(|| format))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::ffi::OsString;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("Json", LogFormat::Json)]
    #[case("  json\n", LogFormat::Json)]
    fn formats_parse_case_insensitively(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>().expect("format is known"), expected);
    }

    #[rstest]
    fn unknown_formats_report_the_normalised_value() {
        let err = " XML ".parse::<LogFormat>().expect_err("xml is not emitted");
        assert!(matches!(err, LoggingError::UnknownFormat { ref value } if value == "xml"));
        assert_eq!(
            err.to_string(),
            "`DENDRO_LOG_FORMAT=xml` is not supported; use `human` or `json`"
        );
    }

    #[rstest]
    fn unset_variable_selects_human_output() {
        let format = LogFormat::from_lookup(Err(env::VarError::NotPresent))
            .expect("absence is not an error");
        assert_eq!(format, LogFormat::Human);
    }

    #[rstest]
    fn non_unicode_variable_is_rejected() {
        let lookup = Err(env::VarError::NotUnicode(OsString::from("json")));
        let err = LogFormat::from_lookup(lookup).expect_err("bytes are not UTF-8");
        assert!(matches!(err, LoggingError::FormatNotUnicode { .. }));
    }

    #[rstest]
    fn repeated_initialisation_keeps_the_first_format() {
        let first = init_logging().expect("logging must initialise");
        let second = init_logging().expect("second call is a no-op");
        assert_eq!(first, second);
    }
}
