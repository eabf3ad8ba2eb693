#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the `tracing` macros are re-exported here (and
//! from the crate root). With `tracing-json` the crate can also install a
//! global `tracing-subscriber` according to [`LogConfig`], writing to any
//! [`MakeWriter`] the host provides.
//!
//! [`LogConfig`]: crate::config::LogConfig

use std::fmt;

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Errors from installing the global subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// The filter directive did not parse.
    Filter(String),
    /// A global subscriber is already installed.
    AlreadyInitialized,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(msg) => write!(f, "invalid log filter: {msg}"),
            Self::AlreadyInitialized => write!(f, "global subscriber already installed"),
        }
    }
}

impl std::error::Error for LoggingError {}

#[cfg(feature = "tracing-json")]
pub use tracing_subscriber::fmt::MakeWriter;

/// Install the global subscriber described by `config`, writing formatted
/// events to `writer`.
///
/// Output carries no timestamps or ANSI colors: hosts such as the browser
/// console add their own and have no system clock to read.
#[cfg(feature = "tracing-json")]
pub fn init<W>(config: &crate::config::LogConfig, writer: W) -> Result<(), LoggingError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    use crate::config::LogFormat;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| LoggingError::Filter(e.to_string()))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .without_time();
    let result = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|_| LoggingError::AlreadyInitialized)
}
