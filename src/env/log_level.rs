//! Log verbosity from the `LOG_LEVEL` variable.

use std::fmt;
use std::str::FromStr;

use log::LevelFilter;
use thiserror::Error;

use super::os::ProcessEnv;
use super::set::EnvSet;

/// Variable read by [`EnvSet::apply_log_level`].
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Severity threshold, from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
    Disabled,
}

impl LogLevel {
    /// The `log` facade has no fatal or panic level; both keep errors only.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::Debug,
            Self::Info => LevelFilter::Info,
            Self::Warn => LevelFilter::Warn,
            Self::Error | Self::Fatal | Self::Panic => LevelFilter::Error,
            Self::Disabled => LevelFilter::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
            Self::Disabled => "off",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("invalid log level '{0}'")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    /// Case-insensitive; an empty string disables logging.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "d" => Ok(Self::Debug),
            "info" | "i" => Ok(Self::Info),
            "warn" | "warning" | "w" => Ok(Self::Warn),
            "error" | "err" | "e" => Ok(Self::Error),
            "fatal" | "f" => Ok(Self::Fatal),
            "panic" | "p" => Ok(Self::Panic),
            "off" | "no" | "none" | "" => Ok(Self::Disabled),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

impl<E: ProcessEnv> EnvSet<E> {
    /// Resolves [`LOG_LEVEL_VAR`] and applies it as the global `log` max level.
    ///
    /// An unset or empty variable disables logging. An unrecognized value
    /// is reported with a warning and `default` is used instead.
    pub fn apply_log_level(&self, default: LogLevel) -> LogLevel {
        let level = self.log_level(default);
        log::set_max_level(level.to_level_filter());
        level
    }

    /// Resolves the level like [`apply_log_level`](Self::apply_log_level)
    /// without touching the global max level.
    pub fn log_level(&self, default: LogLevel) -> LogLevel {
        let (token, _) = self.string(LOG_LEVEL_VAR, "");

        match token.parse::<LogLevel>() {
            Ok(level) => level,
            Err(_) => {
                log::warn!("Log level \"{token}\" invalid.");
                default
            }
        }
    }
}
