use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvError {
    #[error("env file was loaded already and a variable was set since then, refusing to reload")]
    AlreadyLoaded,

    #[error("failed to resolve absolute path of env file '{path}': {source}")]
    PathResolution {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read env file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("environment variable '{0}' is unset")]
    NotSet(String),

    #[error("environment variable '{0}' is set, but empty")]
    Empty(String),

    #[error("environment variable '{key}' overflows the target integer")]
    Overflow { key: String, value: i64 },

    #[error("environment variable '{key}' is not a valid integer: {source}")]
    InvalidInt {
        key: String,
        source: ParseIntError,
    },

    #[error("environment variable '{0}' is not a valid boolean")]
    InvalidBool(String),

    #[error("cannot modify environment variable '{key}': {reason}")]
    Platform { key: String, reason: &'static str },

    #[error("failed to deserialize environment: {0}")]
    Deserialize(#[from] serde::de::value::Error),
}

impl EnvError {
    /// Returns true for the errors a caller usually treats as "use the default".
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NotSet(_) | Self::Empty(_))
    }
}
